use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use anyhow::anyhow;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::entity::{Entity, EntityRef, PublishRules, ValidationErrors};
use crate::domain::identifiers::{ActorId, Capability, ScopeId, SubmissionId};
use crate::domain::notification::{NotificationSink, WorkflowEvent, WorkflowEventKind};
use crate::domain::repository::{
    EntityStore, RepositoryError, SubmissionRepository, WorkflowStore, WorkflowTransaction,
};
use crate::domain::roles::RoleResolver;
use crate::domain::submission::Submission;

#[derive(Debug, Clone, Default)]
struct MemoryState {
    submissions: Vec<Submission>,
    entities: HashMap<EntityRef, Entity>,
}

/// Store keeping everything in memory.
///
/// A transaction holds the lock for its whole life and works on a copy,
/// which replaces the shared state on commit.
#[derive(Clone)]
pub struct InMemoryStore {
    state: Arc<Mutex<MemoryState>>,
    rules: PublishRules,
    fail_publish: Arc<AtomicBool>,
    lose_insert_race: Arc<AtomicBool>,
}

impl InMemoryStore {
    pub fn new(rules: PublishRules) -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState::default())),
            rules,
            fail_publish: Arc::new(AtomicBool::new(false)),
            lose_insert_race: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn put_entity(&self, entity: Entity) {
        let mut state = self.state.lock().await;
        state.entities.insert(entity.reference.clone(), entity);
    }

    /// Stores submission as is, skipping every check
    pub async fn put_submission(&self, submission: Submission) {
        self.state.lock().await.submissions.push(submission);
    }

    pub async fn entity(&self, reference: &EntityRef) -> Option<Entity> {
        self.state.lock().await.entities.get(reference).cloned()
    }

    pub async fn submissions(&self) -> Vec<Submission> {
        self.state.lock().await.submissions.clone()
    }

    /// Make `set_published` fail with a database error
    pub fn fail_publish(&self, fail: bool) {
        self.fail_publish.store(fail, Ordering::SeqCst);
    }

    /// Make `insert` report a unique violation, as when a concurrent submit commits first
    pub fn lose_insert_race(&self, lose: bool) {
        self.lose_insert_race.store(lose, Ordering::SeqCst);
    }
}

pub struct InMemoryTransaction {
    guard: OwnedMutexGuard<MemoryState>,
    staged: MemoryState,
    rules: PublishRules,
    fail_publish: bool,
    lose_insert_race: bool,
}

impl WorkflowStore for InMemoryStore {
    type Tx = InMemoryTransaction;

    async fn begin(&self) -> Result<Self::Tx, RepositoryError> {
        let guard = self.state.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(InMemoryTransaction {
            guard,
            staged,
            rules: self.rules.clone(),
            fail_publish: self.fail_publish.load(Ordering::SeqCst),
            lose_insert_race: self.lose_insert_race.load(Ordering::SeqCst),
        })
    }
}

impl WorkflowTransaction for InMemoryTransaction {
    async fn commit(mut self) -> Result<(), RepositoryError> {
        *self.guard = self.staged;
        Ok(())
    }
}

impl SubmissionRepository for InMemoryTransaction {
    async fn find_by_id(&mut self, id: SubmissionId) -> Result<Option<Submission>, RepositoryError> {
        Ok(self.staged.submissions.iter().find(|s| s.id == id).cloned())
    }

    async fn find_by_owner(&mut self, owner: &EntityRef) -> Result<Vec<Submission>, RepositoryError> {
        let mut found = self
            .staged
            .submissions
            .iter()
            .rev()
            .filter(|s| &s.owner == owner)
            .cloned()
            .collect::<Vec<_>>();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn insert(&mut self, submission: &Submission) -> Result<(), RepositoryError> {
        let duplicate = self
            .staged
            .submissions
            .iter()
            .any(|s| s.owner == submission.owner && s.is_active());
        if (duplicate || self.lose_insert_race) && submission.is_active() {
            return Err(RepositoryError::UniqueViolation(format!(
                "active submission for {}",
                submission.owner
            )));
        }
        self.staged.submissions.push(submission.clone());
        Ok(())
    }

    async fn update(&mut self, submission: &Submission) -> Result<(), RepositoryError> {
        let stored = self
            .staged
            .submissions
            .iter_mut()
            .find(|s| s.id == submission.id)
            .ok_or_else(|| RepositoryError::NotFound(format!("submission {}", submission.id)))?;
        *stored = submission.clone();
        Ok(())
    }
}

impl EntityStore for InMemoryTransaction {
    async fn load(&mut self, reference: &EntityRef) -> Result<Option<Entity>, RepositoryError> {
        Ok(self.staged.entities.get(reference).cloned())
    }

    async fn save(&mut self, entity: &Entity) -> Result<(), RepositoryError> {
        let (section, enabled) = match self.staged.entities.get(&entity.reference) {
            Some(stored) => (stored.section.clone(), stored.enabled),
            None => (entity.section.clone(), false),
        };
        self.staged.entities.insert(
            entity.reference.clone(),
            Entity {
                section,
                enabled,
                ..entity.clone()
            },
        );
        Ok(())
    }

    async fn set_published(&mut self, reference: &EntityRef, published: bool) -> Result<(), RepositoryError> {
        if self.fail_publish {
            return Err(RepositoryError::DatabaseError("connection reset".to_string()));
        }

        let source = self
            .staged
            .entities
            .get(reference)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("entry {}", reference)))?;
        let canonical = reference.canonical();
        self.staged.entities.insert(
            canonical.clone(),
            Entity {
                reference: canonical,
                enabled: published,
                ..source
            },
        );
        Ok(())
    }

    async fn validate_for_publish(&mut self, reference: &EntityRef) -> Result<ValidationErrors, RepositoryError> {
        let entity = self
            .staged
            .entities
            .get(reference)
            .ok_or_else(|| RepositoryError::NotFound(format!("entry {}", reference)))?;
        Ok(self.rules.validate(entity))
    }
}

/// Grants capabilities from a fixed list, `None` scope means every section
#[derive(Debug, Clone, Default)]
pub struct StaticRoleResolver {
    grants: Vec<(ActorId, Capability, Option<ScopeId>)>,
}

impl StaticRoleResolver {
    pub fn grant(mut self, actor: &ActorId, capability: &str, scope: Option<ScopeId>) -> Self {
        let capability = Capability::try_new(capability).unwrap();
        self.grants.push((actor.clone(), capability, scope));
        self
    }
}

impl RoleResolver for StaticRoleResolver {
    async fn has_capability(
        &self,
        actor: &ActorId,
        scope: &ScopeId,
        capability: &Capability,
    ) -> Result<bool, RepositoryError> {
        Ok(self.grants.iter().any(|(a, c, s)| {
            a == actor && c == capability && s.as_ref().is_none_or(|s| s == scope)
        }))
    }
}

/// Keeps emitted events, optionally failing every delivery
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<StdMutex<Vec<WorkflowEvent>>>,
    failing: bool,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn kinds(&self) -> Vec<WorkflowEventKind> {
        self.events.lock().unwrap().iter().map(|e| e.kind).collect()
    }
}

impl NotificationSink for RecordingSink {
    async fn emit(&self, event: &WorkflowEvent) -> Result<(), anyhow::Error> {
        if self.failing {
            return Err(anyhow!("mail server unavailable"));
        }
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}
