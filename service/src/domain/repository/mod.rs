use std::future::Future;

use thiserror::Error;

use crate::domain::entity::{Entity, EntityRef, ValidationErrors};
use crate::domain::identifiers::SubmissionId;
use crate::domain::submission::Submission;

/// Opens units of work. Everything done through one transaction is applied
/// on `commit` or not at all; dropping it without commit rolls it back.
pub trait WorkflowStore: Send + Sync + 'static {
    type Tx: WorkflowTransaction;

    fn begin(&self) -> impl Future<Output = Result<Self::Tx, RepositoryError>> + Send;
}

pub trait WorkflowTransaction: SubmissionRepository + EntityStore + Send {
    fn commit(self) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

pub trait SubmissionRepository {
    /// Find submission by its id, locking it until the transaction ends
    fn find_by_id(
        &mut self,
        id: SubmissionId,
    ) -> impl Future<Output = Result<Option<Submission>, RepositoryError>> + Send;

    /// All submissions of one entity version, newest first
    fn find_by_owner(
        &mut self,
        owner: &EntityRef,
    ) -> impl Future<Output = Result<Vec<Submission>, RepositoryError>> + Send;

    /// Insert new submission, fails with `UniqueViolation`
    /// if the owner already has an active one
    fn insert(
        &mut self,
        submission: &Submission,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Store status, reviewer and reason of an existing submission
    fn update(
        &mut self,
        submission: &Submission,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

pub trait EntityStore {
    fn load(
        &mut self,
        reference: &EntityRef,
    ) -> impl Future<Output = Result<Option<Entity>, RepositoryError>> + Send;

    /// Create or overwrite entity content. Section and live flag of an existing entity are kept.
    fn save(&mut self, entity: &Entity) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Flip the live flag. For a draft the draft content is applied to the canonical entity first.
    fn set_published(
        &mut self,
        reference: &EntityRef,
        published: bool,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Run the publish validation against stored content
    fn validate_for_publish(
        &mut self,
        reference: &EntityRef,
    ) -> impl Future<Output = Result<ValidationErrors, RepositoryError>> + Send;
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("unique violation: {0}")]
    UniqueViolation(String),
    #[error("database error: {0}")]
    DatabaseError(String),
}
