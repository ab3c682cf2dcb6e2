use std::fmt::Display;

use serde_json::{Map, Value};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{Decode, Postgres, Row, Type};
use uuid::Uuid;
use workflow_common::{
    CANONICAL_DRAFT_ID, CREATED_FIELD_NAME, DRAFT_ID_FIELD_NAME, ENABLED_FIELD_NAME,
    FIELDS_FIELD_NAME, ID_FIELD_NAME, OWNER_ID_FIELD_NAME, OWNER_SITE_ID_FIELD_NAME,
    REASON_FIELD_NAME, REVIEWED_BY_FIELD_NAME, SECTION_FIELD_NAME, SITE_ID_FIELD_NAME,
    STATUS_FIELD_NAME, SUBMITTED_BY_FIELD_NAME, TITLE_FIELD_NAME, UPDATED_FIELD_NAME,
};

use crate::domain::entity::{Entity, EntityRef};
use crate::domain::identifiers::{ActorId, DraftId, OwnerId, ScopeId, SiteId};
use crate::domain::repository::RepositoryError;
use crate::domain::submission::Submission;
use crate::domain::submission::lifecycle::SubmissionStatus;

pub const SUBMISSION_COLUMNS: &str = "id, owner_id, owner_site_id, draft_id, status, submitted_by, reviewed_by, reason, created_at, updated_at";

pub const ENTRY_COLUMNS: &str = "owner_id, site_id, draft_id, section, title, fields, enabled";

/// Value stored in `draft_id`, the canonical version has no draft id
pub fn draft_column(draft_id: &Option<DraftId>) -> &str {
    draft_id.as_ref().map_or(CANONICAL_DRAFT_ID, |d| d.as_ref())
}

impl TryFrom<&PgRow> for Submission {
    type Error = RepositoryError;

    fn try_from(row: &PgRow) -> Result<Self, Self::Error> {
        let id: Uuid = column(row, ID_FIELD_NAME)?;
        let owner = entity_ref(row, OWNER_SITE_ID_FIELD_NAME)?;
        let status: String = column(row, STATUS_FIELD_NAME)?;
        let submitted_by: Option<String> = column(row, SUBMITTED_BY_FIELD_NAME)?;
        let reviewed_by: Option<String> = column(row, REVIEWED_BY_FIELD_NAME)?;

        Ok(Submission {
            id: id.into(),
            owner,
            status: status
                .parse::<SubmissionStatus>()
                .map_err(|e| invalid(STATUS_FIELD_NAME, e))?,
            submitted_by: submitted_by.map(actor).transpose()?,
            reviewed_by: reviewed_by.map(actor).transpose()?,
            reason: column(row, REASON_FIELD_NAME)?,
            created_at: column(row, CREATED_FIELD_NAME)?,
            updated_at: column(row, UPDATED_FIELD_NAME)?,
        })
    }
}

impl TryFrom<&PgRow> for Entity {
    type Error = RepositoryError;

    fn try_from(row: &PgRow) -> Result<Self, Self::Error> {
        let section: String = column(row, SECTION_FIELD_NAME)?;
        let fields: Json<Map<String, Value>> = column(row, FIELDS_FIELD_NAME)?;

        Ok(Entity {
            reference: entity_ref(row, SITE_ID_FIELD_NAME)?,
            section: ScopeId::try_new(section).map_err(|e| invalid(SECTION_FIELD_NAME, e))?,
            title: column(row, TITLE_FIELD_NAME)?,
            fields: fields.0,
            enabled: column(row, ENABLED_FIELD_NAME)?,
        })
    }
}

/// submissions and entries name the site column differently
fn entity_ref(row: &PgRow, site_column: &str) -> Result<EntityRef, RepositoryError> {
    let owner_id: String = column(row, OWNER_ID_FIELD_NAME)?;
    let site_id: String = column(row, site_column)?;
    let draft_id: String = column(row, DRAFT_ID_FIELD_NAME)?;

    let draft_id = if draft_id == CANONICAL_DRAFT_ID {
        None
    } else {
        Some(DraftId::try_new(draft_id).map_err(|e| invalid(DRAFT_ID_FIELD_NAME, e))?)
    };

    Ok(EntityRef::new(
        OwnerId::try_new(owner_id).map_err(|e| invalid(OWNER_ID_FIELD_NAME, e))?,
        SiteId::try_new(site_id).map_err(|e| invalid(site_column, e))?,
        draft_id,
    ))
}

fn actor(value: String) -> Result<ActorId, RepositoryError> {
    ActorId::try_new(value).map_err(|e| invalid("actor", e))
}

fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, RepositoryError>
where
    T: Decode<'r, Postgres> + Type<Postgres>,
{
    row.try_get(name)
        .map_err(|e| RepositoryError::DatabaseError(format!("Failed to parse {}: {}", name, e)))
}

fn invalid(name: &str, cause: impl Display) -> RepositoryError {
    RepositoryError::DatabaseError(format!("Invalid value in {}: {}", name, cause))
}
