pub mod error;
pub mod lifecycle;

use chrono::{DateTime, Utc};

use crate::domain::entity::EntityRef;
use crate::domain::identifiers::{ActorId, SubmissionId};
use crate::domain::submission::lifecycle::SubmissionStatus;

/// One review round of one entity version.
/// Records are never deleted, a new round creates a new record.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub id: SubmissionId,
    /// Entity version under review
    pub owner: EntityRef,
    pub status: SubmissionStatus,
    pub submitted_by: Option<ActorId>,
    pub reviewed_by: Option<ActorId>,
    /// Reviewer's note, set on rejection
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Submission {
    pub fn submitted(owner: EntityRef, actor: ActorId, now: DateTime<Utc>) -> Self {
        Self {
            id: SubmissionId::generate(),
            owner,
            status: SubmissionStatus::Submitted,
            submitted_by: Some(actor),
            reviewed_by: None,
            reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// Picks the submission a reader should see: the active one if any,
/// otherwise the most recently created terminal one.
pub fn pick_current(mut submissions: Vec<Submission>) -> Option<Submission> {
    submissions.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let index = submissions
        .iter()
        .position(Submission::is_active)
        .or_else(|| submissions.iter().position(|s| s.status.is_terminal()))?;
    Some(submissions.swap_remove(index))
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;
    use crate::domain::identifiers::{OwnerId, SiteId};

    fn submission(status: SubmissionStatus, created_at: DateTime<Utc>) -> Submission {
        let owner = EntityRef::new(
            OwnerId::try_new("E123").unwrap(),
            SiteId::try_new("site1").unwrap(),
            None,
        );
        Submission {
            status,
            created_at,
            updated_at: created_at,
            ..Submission::submitted(owner, ActorId::try_new("a").unwrap(), created_at)
        }
    }

    #[test]
    fn test_active_wins_over_newer_terminal() {
        let t1 = Utc::now();
        let t2 = t1 + TimeDelta::seconds(5);
        let active = submission(SubmissionStatus::Submitted, t1);
        let newest = submission(SubmissionStatus::Approved, t2);

        let current = pick_current(vec![newest, active.clone()]).unwrap();
        assert_eq!(current.id, active.id);
    }

    #[test]
    fn test_latest_terminal_without_active() {
        let t1 = Utc::now();
        let older = submission(SubmissionStatus::Rejected, t1);
        let newer = submission(SubmissionStatus::Approved, t1 + TimeDelta::seconds(1));

        let current = pick_current(vec![older, newer.clone()]).unwrap();
        assert_eq!(current.id, newer.id);
    }

    #[test]
    fn test_nothing_submitted() {
        assert!(pick_current(Vec::new()).is_none());
    }
}
