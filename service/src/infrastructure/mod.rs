use std::sync::Arc;

use crate::{
    domain::{AppState, workflow::WorkflowStateMachine},
    infrastructure::{
        notification::TracingNotificationSink, persistence::PostgresWorkflowStore,
        roles::PostgresRoleResolver,
    },
};

pub mod http;
pub mod notification;
pub mod persistence;
pub mod roles;
pub mod settings;

type PostgresWorkflow =
    WorkflowStateMachine<PostgresWorkflowStore, PostgresRoleResolver, TracingNotificationSink>;

#[derive(Clone)]
pub struct AppStateImpl {
    workflow: Arc<PostgresWorkflow>,
}

impl AppStateImpl {
    pub fn new(workflow: PostgresWorkflow) -> Self {
        Self {
            workflow: Arc::new(workflow),
        }
    }
}

impl AppState for AppStateImpl {
    type S = PostgresWorkflowStore;
    type R = PostgresRoleResolver;
    type N = TracingNotificationSink;

    fn workflow(&self) -> &WorkflowStateMachine<Self::S, Self::R, Self::N> {
        &self.workflow
    }
}
