use thiserror::Error;

use crate::domain::entity::ValidationErrors;
use crate::domain::identifiers::{ActorId, Capability, ScopeId, SubmissionId};
use crate::domain::repository::RepositoryError;
use crate::domain::submission::lifecycle::{SubmissionStatus, Transition};

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("{actor} does not hold '{capability}' for section '{scope}'")]
    Forbidden {
        actor: ActorId,
        capability: Capability,
        scope: ScopeId,
    },

    #[error("cannot {transition} submission {id}, it is {status}")]
    InvalidState {
        id: SubmissionId,
        status: SubmissionStatus,
        transition: Transition,
    },

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("entry is not ready for review: {0}")]
    ValidationFailed(ValidationErrors),

    #[error("workflow is not enabled for section '{scope}'")]
    NotApplicable { scope: ScopeId },

    #[error(transparent)]
    Storage(RepositoryError),
}

impl From<RepositoryError> for WorkflowError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound(what) => Self::NotFound(what),
            RepositoryError::UniqueViolation(cause) => Self::Conflict(cause),
            other => Self::Storage(other),
        }
    }
}
