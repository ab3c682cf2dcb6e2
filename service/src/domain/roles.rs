use std::future::Future;

use crate::domain::identifiers::{ActorId, Capability, ScopeId};
use crate::domain::repository::RepositoryError;

/// Answers whether an actor may do something in a section.
/// How capabilities are granted (groups, direct grants) is up to the implementation.
pub trait RoleResolver: Send + Sync + 'static {
    fn has_capability(
        &self,
        actor: &ActorId,
        scope: &ScopeId,
        capability: &Capability,
    ) -> impl Future<Output = Result<bool, RepositoryError>> + Send;
}
