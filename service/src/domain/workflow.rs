use chrono::Utc;

use crate::domain::config::WorkflowConfig;
use crate::domain::entity::{Entity, EntityRef};
use crate::domain::identifiers::{ActorId, Capability, ScopeId, SubmissionId};
use crate::domain::notification::{NotificationSink, WorkflowEvent, WorkflowEventKind};
use crate::domain::repository::{
    EntityStore, SubmissionRepository, WorkflowStore, WorkflowTransaction,
};
use crate::domain::roles::RoleResolver;
use crate::domain::submission::error::WorkflowError;
use crate::domain::submission::lifecycle::{SubmissionStatus, Transition};
use crate::domain::submission::{Submission, pick_current};

/// Editorial approval workflow: editors submit entries, publishers approve or reject them.
///
/// Every transition runs in one store transaction together with its entity side effect.
/// Events are emitted only after commit.
pub struct WorkflowStateMachine<S, R, N> {
    config: WorkflowConfig,
    store: S,
    roles: R,
    notifications: N,
}

impl<S, R, N> WorkflowStateMachine<S, R, N>
where
    S: WorkflowStore,
    R: RoleResolver,
    N: NotificationSink,
{
    pub fn new(config: WorkflowConfig, store: S, roles: R, notifications: N) -> Self {
        Self {
            config,
            store,
            roles,
            notifications,
        }
    }

    /// Submit stored entity version for review
    pub async fn submit(
        &self,
        owner: EntityRef,
        actor: &ActorId,
    ) -> Result<Submission, WorkflowError> {
        let mut tx = self.store.begin().await?;

        let entity = tx
            .load(&owner)
            .await?
            .ok_or_else(|| WorkflowError::NotFound(format!("entry {}", owner)))?;
        self.authorize(actor, &entity.section, &self.config.editor_capability)
            .await?;

        let submission = self.create_submission(&mut tx, owner, actor).await?;
        tx.commit().await?;

        tracing::info!(submission = %submission.id, owner = %submission.owner, %actor, "submitted for review");
        self.notify(WorkflowEventKind::Submitted, actor, &submission)
            .await;

        Ok(submission)
    }

    /// Store new entity content and submit it in the same transaction
    pub async fn save_and_submit(
        &self,
        entity: Entity,
        actor: &ActorId,
    ) -> Result<Submission, WorkflowError> {
        let mut tx = self.store.begin().await?;

        match tx.load(&entity.reference).await? {
            Some(stored) => {
                self.authorize(actor, &stored.section, &self.config.editor_capability)
                    .await?;
                if stored.section != entity.section {
                    return Err(WorkflowError::Conflict(format!(
                        "entry {} belongs to section '{}' and cannot move to '{}'",
                        entity.reference, stored.section, entity.section
                    )));
                }
                if stored.enabled && !stored.reference.is_draft() {
                    return Err(WorkflowError::Conflict(format!(
                        "entry {} is live, changes must go through a draft",
                        entity.reference
                    )));
                }
            }
            None => {
                self.authorize(actor, &entity.section, &self.config.editor_capability)
                    .await?;
            }
        }
        tx.save(&entity).await?;

        let submission = self
            .create_submission(&mut tx, entity.reference, actor)
            .await?;
        tx.commit().await?;

        tracing::info!(submission = %submission.id, owner = %submission.owner, %actor, "saved and submitted for review");
        self.notify(WorkflowEventKind::Submitted, actor, &submission)
            .await;

        Ok(submission)
    }

    /// Accept submission and make its entity live
    pub async fn approve(
        &self,
        id: SubmissionId,
        actor: &ActorId,
    ) -> Result<Submission, WorkflowError> {
        let mut tx = self.store.begin().await?;

        let submission = self
            .review(&mut tx, id, actor, Transition::Approve, None)
            .await?;
        tx.set_published(&submission.owner, true).await?;
        tx.commit().await?;

        tracing::info!(submission = %submission.id, entry = %submission.owner.canonical(), %actor, "submission approved, entry published");
        self.notify(WorkflowEventKind::Approved, actor, &submission)
            .await;

        Ok(submission)
    }

    /// Decline submission, the entity stays as it is
    pub async fn reject(
        &self,
        id: SubmissionId,
        actor: &ActorId,
        reason: Option<String>,
    ) -> Result<Submission, WorkflowError> {
        let mut tx = self.store.begin().await?;

        let reason = reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        let submission = self
            .review(&mut tx, id, actor, Transition::Reject, reason)
            .await?;
        tx.commit().await?;

        tracing::info!(submission = %submission.id, owner = %submission.owner, %actor, "submission rejected");
        self.notify(WorkflowEventKind::Rejected, actor, &submission)
            .await;

        Ok(submission)
    }

    /// Submission to show for an entity version: the active one, else the latest one
    pub async fn current_submission(
        &self,
        owner: &EntityRef,
    ) -> Result<Option<Submission>, WorkflowError> {
        let submissions = self.submission_history(owner).await?;
        Ok(pick_current(submissions))
    }

    /// All submissions of an entity version, newest first
    pub async fn submission_history(
        &self,
        owner: &EntityRef,
    ) -> Result<Vec<Submission>, WorkflowError> {
        let mut tx = self.store.begin().await?;
        let submissions = tx.find_by_owner(owner).await?;
        tx.commit().await?;
        Ok(submissions)
    }

    async fn create_submission(
        &self,
        tx: &mut S::Tx,
        owner: EntityRef,
        actor: &ActorId,
    ) -> Result<Submission, WorkflowError> {
        let existing = tx.find_by_owner(&owner).await?;
        if existing.iter().any(Submission::is_active) {
            return Err(WorkflowError::Conflict(format!(
                "entry {} is already waiting for review",
                owner
            )));
        }

        let errors = tx.validate_for_publish(&owner).await?;
        if !errors.is_empty() {
            tracing::debug!(%owner, fields = ?errors.fields().collect::<Vec<_>>(), "entry failed validation");
            return Err(WorkflowError::ValidationFailed(errors));
        }

        let submission = Submission::submitted(owner, actor.clone(), Utc::now());
        tx.insert(&submission).await?;

        Ok(submission)
    }

    async fn review(
        &self,
        tx: &mut S::Tx,
        id: SubmissionId,
        actor: &ActorId,
        transition: Transition,
        reason: Option<String>,
    ) -> Result<Submission, WorkflowError> {
        let mut submission = tx
            .find_by_id(id)
            .await?
            .ok_or_else(|| WorkflowError::NotFound(format!("submission {}", id)))?;

        let status = next_status(&submission, transition)?;

        let entity = tx
            .load(&submission.owner)
            .await?
            .ok_or_else(|| WorkflowError::NotFound(format!("entry {}", submission.owner)))?;
        self.authorize(actor, &entity.section, &self.config.publisher_capability)
            .await?;

        submission.status = status;
        submission.reviewed_by = Some(actor.clone());
        submission.reason = reason;
        submission.updated_at = Utc::now();
        tx.update(&submission).await?;

        Ok(submission)
    }

    async fn authorize(
        &self,
        actor: &ActorId,
        scope: &ScopeId,
        capability: &Capability,
    ) -> Result<(), WorkflowError> {
        if !self.config.enabled_sections.contains(scope) {
            tracing::debug!(%scope, "workflow is not enabled for section");
            return Err(WorkflowError::NotApplicable {
                scope: scope.clone(),
            });
        }

        if self.roles.has_capability(actor, scope, capability).await? {
            Ok(())
        } else {
            tracing::debug!(%actor, %scope, %capability, "capability missing");
            Err(WorkflowError::Forbidden {
                actor: actor.clone(),
                capability: capability.clone(),
                scope: scope.clone(),
            })
        }
    }

    async fn notify(&self, kind: WorkflowEventKind, actor: &ActorId, submission: &Submission) {
        let event = WorkflowEvent {
            kind,
            actor: actor.clone(),
            submission: submission.clone(),
        };

        if let Err(err) = self.notifications.emit(&event).await {
            tracing::warn!(submission = %submission.id, "failed to deliver {:?} notification: {:#}", kind, err);
        }
    }
}

fn next_status(
    submission: &Submission,
    transition: Transition,
) -> Result<SubmissionStatus, WorkflowError> {
    submission
        .status
        .apply(transition)
        .ok_or(WorkflowError::InvalidState {
            id: submission.id,
            status: submission.status,
            transition,
        })
}
