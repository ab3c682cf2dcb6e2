use crate::domain::notification::NotificationSink;
use crate::domain::repository::WorkflowStore;
use crate::domain::roles::RoleResolver;
use crate::domain::workflow::WorkflowStateMachine;

pub mod config;
pub mod entity;
pub mod identifiers;
pub mod notification;
pub mod repository;
pub mod roles;
pub mod submission;
pub mod workflow;

/// The global application state shared between all request handlers.
pub trait AppState: Clone + Send + Sync + 'static {
    type S: WorkflowStore;
    type R: RoleResolver;
    type N: NotificationSink;

    fn workflow(&self) -> &WorkflowStateMachine<Self::S, Self::R, Self::N>;
}
