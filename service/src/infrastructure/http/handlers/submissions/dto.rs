use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::domain::entity::{Entity, EntityRef};
use crate::domain::identifiers::{DraftId, OwnerId, ScopeId, SiteId};
use crate::domain::submission::Submission;
use crate::domain::submission::lifecycle::{SubmissionStatus, WorkflowAction};

/// Identifies the entity version, used as body and as query string
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerRequest {
    owner_id: OwnerId,
    owner_site_id: SiteId,
    #[serde(default)]
    draft_id: Option<DraftId>,
}

impl From<OwnerRequest> for EntityRef {
    fn from(value: OwnerRequest) -> Self {
        EntityRef::new(value.owner_id, value.owner_site_id, value.draft_id)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RejectRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

/// Entry content saved along with a submission
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryRequest {
    #[serde(flatten)]
    owner: OwnerRequest,
    section: ScopeId,
    #[serde(default)]
    title: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

impl From<EntryRequest> for Entity {
    fn from(value: EntryRequest) -> Self {
        Entity {
            reference: value.owner.into(),
            section: value.section,
            title: value.title,
            fields: value.fields,
            enabled: false,
        }
    }
}

/// Body of the action endpoint, which fields are needed depends on the action
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowActionRequest {
    #[serde(rename = "workflow-action")]
    pub action: WorkflowAction,
    pub submission_id: Option<Uuid>,
    pub entry: Option<EntryRequest>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    id: String,
    owner_id: String,
    owner_site_id: String,
    draft_id: Option<String>,
    status: SubmissionStatus,
    submitted_by: Option<String>,
    reviewed_by: Option<String>,
    reason: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<Submission> for SubmissionResponse {
    fn from(value: Submission) -> Self {
        let owner = value.owner;
        Self {
            id: value.id.to_string(),
            owner_id: owner.owner_id.into_inner(),
            owner_site_id: owner.site_id.into_inner(),
            draft_id: owner.draft_id.map(DraftId::into_inner),
            status: value.status,
            submitted_by: value.submitted_by.map(|a| a.into_inner()),
            reviewed_by: value.reviewed_by.map(|a| a.into_inner()),
            reason: value.reason,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
