use std::sync::Arc;

use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{Postgres, Transaction};
use workflow_common::{Database, ENTRIES_TABLE_NAME, SUBMISSIONS_TABLE_NAME};

use crate::domain::entity::{Entity, EntityRef, PublishRules, ValidationErrors};
use crate::domain::identifiers::SubmissionId;
use crate::domain::repository::{
    EntityStore, RepositoryError, SubmissionRepository, WorkflowStore, WorkflowTransaction,
};
use crate::domain::submission::Submission;
use crate::infrastructure::persistence::rows::{ENTRY_COLUMNS, SUBMISSION_COLUMNS, draft_column};

pub mod rows;

/// Workflow store on top of the shared Postgres pool
#[derive(Clone, Debug)]
pub struct PostgresWorkflowStore {
    database: &'static Database,
    rules: Arc<PublishRules>,
}

impl PostgresWorkflowStore {
    pub fn new(database: &'static Database, rules: PublishRules) -> Self {
        Self {
            database,
            rules: Arc::new(rules),
        }
    }
}

pub struct PostgresTransaction {
    tx: Transaction<'static, Postgres>,
    rules: Arc<PublishRules>,
}

impl WorkflowStore for PostgresWorkflowStore {
    type Tx = PostgresTransaction;

    async fn begin(&self) -> Result<Self::Tx, RepositoryError> {
        let tx = self
            .database
            .database_pool()
            .begin()
            .await
            .map_err(database_error)?;

        Ok(PostgresTransaction {
            tx,
            rules: self.rules.clone(),
        })
    }
}

impl WorkflowTransaction for PostgresTransaction {
    async fn commit(self) -> Result<(), RepositoryError> {
        self.tx.commit().await.map_err(database_error)
    }
}

impl SubmissionRepository for PostgresTransaction {
    async fn find_by_id(&mut self, id: SubmissionId) -> Result<Option<Submission>, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = $1 FOR UPDATE",
            SUBMISSION_COLUMNS, SUBMISSIONS_TABLE_NAME
        );

        let row = sqlx::query(&sql)
            .bind(id.0)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(database_error)?;

        row.as_ref().map(Submission::try_from).transpose()
    }

    async fn find_by_owner(&mut self, owner: &EntityRef) -> Result<Vec<Submission>, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE owner_id = $1 AND owner_site_id = $2 AND draft_id = $3 ORDER BY created_at DESC",
            SUBMISSION_COLUMNS, SUBMISSIONS_TABLE_NAME
        );

        let rows = sqlx::query(&sql)
            .bind(owner.owner_id.as_ref())
            .bind(owner.site_id.as_ref())
            .bind(draft_column(&owner.draft_id))
            .fetch_all(&mut *self.tx)
            .await
            .map_err(database_error)?;

        rows.iter().map(Submission::try_from).collect()
    }

    async fn insert(&mut self, submission: &Submission) -> Result<(), RepositoryError> {
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
            SUBMISSIONS_TABLE_NAME, SUBMISSION_COLUMNS
        );
        let owner = &submission.owner;

        sqlx::query(&sql)
            .bind(submission.id.0)
            .bind(owner.owner_id.as_ref())
            .bind(owner.site_id.as_ref())
            .bind(draft_column(&owner.draft_id))
            .bind(submission.status.as_str())
            .bind(submission.submitted_by.as_ref().map(|a| a.as_ref()))
            .bind(submission.reviewed_by.as_ref().map(|a| a.as_ref()))
            .bind(submission.reason.as_deref())
            .bind(submission.created_at)
            .bind(submission.updated_at)
            .execute(&mut *self.tx)
            .await
            .map_err(unique_violation_or_database_error)?;

        Ok(())
    }

    async fn update(&mut self, submission: &Submission) -> Result<(), RepositoryError> {
        let sql = format!(
            "UPDATE {} SET status = $2, reviewed_by = $3, reason = $4, updated_at = $5 WHERE id = $1",
            SUBMISSIONS_TABLE_NAME
        );

        let result = sqlx::query(&sql)
            .bind(submission.id.0)
            .bind(submission.status.as_str())
            .bind(submission.reviewed_by.as_ref().map(|a| a.as_ref()))
            .bind(submission.reason.as_deref())
            .bind(submission.updated_at)
            .execute(&mut *self.tx)
            .await
            .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("submission {}", submission.id)));
        }
        Ok(())
    }
}

impl EntityStore for PostgresTransaction {
    async fn load(&mut self, reference: &EntityRef) -> Result<Option<Entity>, RepositoryError> {
        let row = self.fetch_entry(reference).await?;
        row.as_ref().map(Entity::try_from).transpose()
    }

    async fn save(&mut self, entity: &Entity) -> Result<(), RepositoryError> {
        // new entries start disabled, only an approval makes them live
        let sql = format!(
            "INSERT INTO {} ({}, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, FALSE, now(), now())
             ON CONFLICT (owner_id, site_id, draft_id) DO UPDATE
             SET title = EXCLUDED.title, fields = EXCLUDED.fields, updated_at = EXCLUDED.updated_at",
            ENTRIES_TABLE_NAME, ENTRY_COLUMNS
        );
        let reference = &entity.reference;

        sqlx::query(&sql)
            .bind(reference.owner_id.as_ref())
            .bind(reference.site_id.as_ref())
            .bind(draft_column(&reference.draft_id))
            .bind(entity.section.as_ref())
            .bind(&entity.title)
            .bind(Json(&entity.fields))
            .execute(&mut *self.tx)
            .await
            .map_err(database_error)?;

        Ok(())
    }

    async fn set_published(&mut self, reference: &EntityRef, published: bool) -> Result<(), RepositoryError> {
        let sql = if reference.is_draft() {
            // apply draft content onto the canonical entry, creating it when the entry never went live
            format!(
                "INSERT INTO {table} ({columns}, created_at, updated_at)
                 SELECT owner_id, site_id, '', section, title, fields, $4, now(), now()
                 FROM {table} WHERE owner_id = $1 AND site_id = $2 AND draft_id = $3
                 ON CONFLICT (owner_id, site_id, draft_id) DO UPDATE
                 SET section = EXCLUDED.section, title = EXCLUDED.title, fields = EXCLUDED.fields,
                     enabled = EXCLUDED.enabled, updated_at = EXCLUDED.updated_at",
                table = ENTRIES_TABLE_NAME,
                columns = ENTRY_COLUMNS
            )
        } else {
            format!(
                "UPDATE {} SET enabled = $4, updated_at = now() WHERE owner_id = $1 AND site_id = $2 AND draft_id = $3",
                ENTRIES_TABLE_NAME
            )
        };

        let result = sqlx::query(&sql)
            .bind(reference.owner_id.as_ref())
            .bind(reference.site_id.as_ref())
            .bind(draft_column(&reference.draft_id))
            .bind(published)
            .execute(&mut *self.tx)
            .await
            .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("entry {}", reference)));
        }
        Ok(())
    }

    async fn validate_for_publish(&mut self, reference: &EntityRef) -> Result<ValidationErrors, RepositoryError> {
        let entity = self
            .load(reference)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("entry {}", reference)))?;

        Ok(self.rules.validate(&entity))
    }
}

impl PostgresTransaction {
    async fn fetch_entry(&mut self, reference: &EntityRef) -> Result<Option<PgRow>, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE owner_id = $1 AND site_id = $2 AND draft_id = $3",
            ENTRY_COLUMNS, ENTRIES_TABLE_NAME
        );

        sqlx::query(&sql)
            .bind(reference.owner_id.as_ref())
            .bind(reference.site_id.as_ref())
            .bind(draft_column(&reference.draft_id))
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(database_error)
    }
}

fn database_error(e: sqlx::Error) -> RepositoryError {
    tracing::error!("database error: {}", e);
    RepositoryError::DatabaseError(e.to_string())
}

fn unique_violation_or_database_error(e: sqlx::Error) -> RepositoryError {
    match e.as_database_error() {
        Some(db_error) if db_error.is_unique_violation() => {
            RepositoryError::UniqueViolation(db_error.message().to_string())
        }
        _ => database_error(e),
    }
}
