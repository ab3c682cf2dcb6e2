use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

use nutype::nutype;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// A regex for section handles that may contain only ASCII letters, digits, underscore and dash.
// Example: "news" or "blog_posts" are valid; "news/posts" or "news posts" are not.
pub const SCOPE_SYMBOLS_REGEX: &str = r"^[A-Za-z0-9_-]+$";

static SCOPE_SYMBOLS_REGEX_COMPILED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(SCOPE_SYMBOLS_REGEX).expect("SCOPE_SYMBOLS_REGEX must be a valid regex")
});

pub fn is_eligible_scope(scope: &str) -> bool {
    SCOPE_SYMBOLS_REGEX_COMPILED.is_match(scope)
}

/// Identifier of the content entity a submission is about
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 64),
    derive(Clone, Debug, Display, AsRef, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)
)]
pub struct OwnerId(String);

#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 64),
    derive(Clone, Debug, Display, AsRef, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)
)]
pub struct SiteId(String);

#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 64),
    derive(Clone, Debug, Display, AsRef, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)
)]
pub struct DraftId(String);

/// Whoever performs a workflow action
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 128),
    derive(Clone, Debug, Display, AsRef, PartialEq, Eq, Hash, Serialize, Deserialize)
)]
pub struct ActorId(String);

/// Section handle, the unit workflow is enabled for and capabilities are granted on
#[nutype(
    sanitize(trim, lowercase),
    validate(not_empty, len_char_max = 64, predicate = is_eligible_scope),
    derive(Clone, Debug, Display, AsRef, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)
)]
pub struct ScopeId(String);

#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 64),
    derive(Clone, Debug, Display, AsRef, PartialEq, Eq, Hash, Serialize, Deserialize)
)]
pub struct Capability(String);

/// Wrapper to prevent ID confusion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionId(pub Uuid);

impl SubmissionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl From<Uuid> for SubmissionId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl TryFrom<&str> for SubmissionId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let uuid = Uuid::parse_str(value)?;
        Ok(Self(uuid))
    }
}

impl Display for SubmissionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_id_cannot_be_blank() {
        assert!(OwnerId::try_new("   ").is_err());
        assert_eq!(OwnerId::try_new(" E123 ").unwrap().as_ref(), "E123");
    }

    #[test]
    fn scope_is_normalized() {
        let scope = ScopeId::try_new(" News ").unwrap();
        assert_eq!(scope.as_ref(), "news");
        assert!(ScopeId::try_new("news/posts").is_err());
    }

    #[test]
    fn submission_id_parses_uuid() {
        let id = SubmissionId::generate();
        let parsed = SubmissionId::try_from(id.to_string().as_str()).unwrap();
        assert_eq!(parsed, id);
        assert!(SubmissionId::try_from("not-a-uuid").is_err());
    }
}
