use std::fmt::{Display, Formatter};
use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

/// Workflow status of a submission.
/// `Draft` is the implicit status of content nobody submitted yet, it is never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Draft,
    Submitted,
    Approved,
    Rejected,
}

/// Closed set of moves between statuses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    Submit,
    Approve,
    Reject,
}

impl SubmissionStatus {
    pub const ALL: [SubmissionStatus; 4] = [
        SubmissionStatus::Draft,
        SubmissionStatus::Submitted,
        SubmissionStatus::Approved,
        SubmissionStatus::Rejected,
    ];

    /// Waiting for a reviewer
    pub fn is_active(self) -> bool {
        self == SubmissionStatus::Submitted
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SubmissionStatus::Approved | SubmissionStatus::Rejected)
    }

    /// Returns the status reached by applying `transition`, or `None` if the move is illegal.
    pub fn apply(self, transition: Transition) -> Option<SubmissionStatus> {
        use SubmissionStatus::*;

        match (self, transition) {
            (Draft, Transition::Submit) => Some(Submitted),
            (Submitted, Transition::Approve) => Some(Approved),
            (Submitted, Transition::Reject) => Some(Rejected),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SubmissionStatus::Draft => "draft",
            SubmissionStatus::Submitted => "submitted",
            SubmissionStatus::Approved => "approved",
            SubmissionStatus::Rejected => "rejected",
        }
    }
}

impl Display for SubmissionStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SubmissionStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| anyhow!("unknown submission status '{}'", s))
    }
}

impl Transition {
    pub fn as_str(self) -> &'static str {
        match self {
            Transition::Submit => "submit",
            Transition::Approve => "approve",
            Transition::Reject => "reject",
        }
    }
}

impl Display for Transition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Actions a client can ask for through the `workflow-action` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkflowAction {
    SaveSubmission,
    ApproveSubmission,
    RejectSubmission,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legal_transitions() {
        use SubmissionStatus::*;

        assert_eq!(Draft.apply(Transition::Submit), Some(Submitted));
        assert_eq!(Submitted.apply(Transition::Approve), Some(Approved));
        assert_eq!(Submitted.apply(Transition::Reject), Some(Rejected));
    }

    #[test]
    fn test_review_only_from_submitted() {
        for status in SubmissionStatus::ALL {
            if status == SubmissionStatus::Submitted {
                continue;
            }
            assert_eq!(status.apply(Transition::Approve), None, "approve from {}", status);
            assert_eq!(status.apply(Transition::Reject), None, "reject from {}", status);
        }
    }

    #[test]
    fn test_terminal_statuses_are_final() {
        for status in SubmissionStatus::ALL.into_iter().filter(|s| s.is_terminal()) {
            assert!(!status.is_active());
            assert_eq!(status.apply(Transition::Submit), None);
        }
    }

    #[test]
    fn test_status_text_roundtrip() {
        assert_eq!("rejected".parse::<SubmissionStatus>().unwrap(), SubmissionStatus::Rejected);
        assert!("published".parse::<SubmissionStatus>().is_err());
    }

    #[test]
    fn test_workflow_action_values() {
        let action: WorkflowAction = serde_json::from_str("\"approve-submission\"").unwrap();
        assert_eq!(action, WorkflowAction::ApproveSubmission);
        assert!(serde_json::from_str::<WorkflowAction>("\"publish\"").is_err());
    }
}
