use workflow_common::{
    ACTOR_ID_FIELD_NAME, CAPABILITIES_TABLE_NAME, CAPABILITY_FIELD_NAME, Database,
    SCOPE_FIELD_NAME,
};

use crate::domain::identifiers::{ActorId, Capability, ScopeId};
use crate::domain::repository::RepositoryError;
use crate::domain::roles::RoleResolver;

/// Resolves capabilities from grants stored in the database.
/// A grant without scope applies to every section.
#[derive(Clone, Debug)]
pub struct PostgresRoleResolver {
    database: &'static Database,
}

impl PostgresRoleResolver {
    pub fn new(database: &'static Database) -> Self {
        Self { database }
    }
}

impl RoleResolver for PostgresRoleResolver {
    async fn has_capability(
        &self,
        actor: &ActorId,
        scope: &ScopeId,
        capability: &Capability,
    ) -> Result<bool, RepositoryError> {
        let sql = grant_exists_query();

        sqlx::query_scalar::<_, bool>(&sql)
            .bind(actor.as_ref())
            .bind(capability.as_ref())
            .bind(scope.as_ref())
            .fetch_one(self.database.database_pool())
            .await
            .map_err(|e| {
                tracing::error!("failed to resolve capability: {}", e);
                RepositoryError::DatabaseError(e.to_string())
            })
    }
}

fn grant_exists_query() -> String {
    format!(
        "SELECT EXISTS (SELECT 1 FROM {table} WHERE {actor} = $1 AND {capability} = $2 AND ({scope} IS NULL OR {scope} = $3))",
        table = CAPABILITIES_TABLE_NAME,
        actor = ACTOR_ID_FIELD_NAME,
        capability = CAPABILITY_FIELD_NAME,
        scope = SCOPE_FIELD_NAME
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grant_exists_query() {
        assert_eq!(
            grant_exists_query(),
            "SELECT EXISTS (SELECT 1 FROM workflow_capabilities WHERE actor_id = $1 AND capability = $2 AND (scope IS NULL OR scope = $3))"
        );
    }
}
