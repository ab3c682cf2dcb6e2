use crate::domain::notification::{NotificationSink, WorkflowEvent};

/// Publishes workflow events as structured log records
#[derive(Clone, Debug, Default)]
pub struct TracingNotificationSink;

impl NotificationSink for TracingNotificationSink {
    async fn emit(&self, event: &WorkflowEvent) -> Result<(), anyhow::Error> {
        let submission = &event.submission;
        tracing::info!(
            target: "workflow::events",
            kind = ?event.kind,
            submission = %submission.id,
            owner = %submission.owner,
            status = %submission.status,
            actor = %event.actor,
            reason = submission.reason.as_deref(),
            "workflow event"
        );
        Ok(())
    }
}
