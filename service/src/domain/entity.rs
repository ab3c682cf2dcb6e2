use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::identifiers::{DraftId, OwnerId, ScopeId, SiteId};

/// Points at one version of a content entity: the canonical one or one of its drafts.
/// Also the key submissions are grouped by.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityRef {
    pub owner_id: OwnerId,
    pub site_id: SiteId,
    pub draft_id: Option<DraftId>,
}

impl EntityRef {
    pub fn new(owner_id: OwnerId, site_id: SiteId, draft_id: Option<DraftId>) -> Self {
        Self {
            owner_id,
            site_id,
            draft_id,
        }
    }

    pub fn is_draft(&self) -> bool {
        self.draft_id.is_some()
    }

    /// The published version this reference ends up in
    pub fn canonical(&self) -> EntityRef {
        EntityRef {
            draft_id: None,
            ..self.clone()
        }
    }
}

impl Display for EntityRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.draft_id {
            Some(draft_id) => write!(f, "{}/{}/{}", self.owner_id, self.site_id, draft_id),
            None => write!(f, "{}/{}", self.owner_id, self.site_id),
        }
    }
}

/// Content entity as far as the workflow cares about it
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub reference: EntityRef,
    /// Section the entity belongs to, workflow is enabled and capabilities granted per section
    pub section: ScopeId,
    pub title: String,
    pub fields: Map<String, Value>,
    /// Live flag, set when a submission is approved
    pub enabled: bool,
}

/// One field that failed "ready for review" validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn blank(field: &str) -> Self {
        Self {
            field: field.to_string(),
            message: format!("{} cannot be blank.", field),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|e| e.field.as_str())
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let messages = self.0.iter().map(|e| e.message.as_str()).collect::<Vec<_>>();
        f.write_str(&messages.join(" "))
    }
}

/// Rules an entity has to satisfy before it may go live.
/// The same rules apply when it is only submitted for review.
#[derive(Debug, Clone, Default)]
pub struct PublishRules {
    required_fields: HashMap<ScopeId, Vec<String>>,
}

impl PublishRules {
    pub fn new(required_fields: HashMap<ScopeId, Vec<String>>) -> Self {
        Self { required_fields }
    }

    pub fn validate(&self, entity: &Entity) -> ValidationErrors {
        let mut errors = Vec::new();

        if entity.title.trim().is_empty() {
            errors.push(FieldError::blank("title"));
        }

        if let Some(required) = self.required_fields.get(&entity.section) {
            for field in required {
                if entity.fields.get(field).is_none_or(is_blank) {
                    errors.push(FieldError::blank(field));
                }
            }
        }

        ValidationErrors(errors)
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn entity(section: &str, title: &str, fields: Value) -> Entity {
        Entity {
            reference: EntityRef::new(
                OwnerId::try_new("E123").unwrap(),
                SiteId::try_new("site1").unwrap(),
                None,
            ),
            section: ScopeId::try_new(section).unwrap(),
            title: title.to_string(),
            fields: fields.as_object().cloned().unwrap_or_default(),
            enabled: false,
        }
    }

    fn rules() -> PublishRules {
        PublishRules::new(HashMap::from([(
            ScopeId::try_new("news").unwrap(),
            vec!["summary".to_string(), "tags".to_string()],
        )]))
    }

    #[test]
    fn test_valid_entity() {
        let e = entity("news", "Launch", json!({"summary": "We launched", "tags": ["a"]}));
        assert!(rules().validate(&e).is_empty());
    }

    #[test]
    fn test_blank_title_and_missing_fields() {
        let e = entity("news", "  ", json!({"summary": "", "tags": []}));
        let errors = rules().validate(&e);
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["title", "summary", "tags"]);
    }

    #[test]
    fn test_rules_apply_only_to_their_section() {
        let e = entity("blog", "Post", json!({}));
        assert!(rules().validate(&e).is_empty());
    }

    #[test]
    fn test_display_ref() {
        let mut reference = entity("news", "x", json!({})).reference;
        assert_eq!(reference.to_string(), "E123/site1");
        reference.draft_id = Some(DraftId::try_new("draft0").unwrap());
        assert_eq!(reference.to_string(), "E123/site1/draft0");
        assert!(!reference.canonical().is_draft());
    }
}
