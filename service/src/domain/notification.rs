use std::future::Future;

use serde::Serialize;

use crate::domain::identifiers::ActorId;
use crate::domain::submission::Submission;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowEventKind {
    Submitted,
    Approved,
    Rejected,
}

/// Emitted after a transition is committed
#[derive(Debug, Clone)]
pub struct WorkflowEvent {
    pub kind: WorkflowEventKind,
    pub actor: ActorId,
    pub submission: Submission,
}

/// Fire-and-forget receiver of workflow events.
/// Errors are logged by the caller and never undo a transition.
pub trait NotificationSink: Send + Sync + 'static {
    fn emit(&self, event: &WorkflowEvent) -> impl Future<Output = Result<(), anyhow::Error>> + Send;
}
