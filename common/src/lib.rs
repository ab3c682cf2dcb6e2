mod database;

// Workflow tables

pub const ENTRIES_TABLE_NAME: &str = "entries";
pub const SUBMISSIONS_TABLE_NAME: &str = "submissions";
pub const CAPABILITIES_TABLE_NAME: &str = "workflow_capabilities";

// Persisted field names

pub const ID_FIELD_NAME: &str = "id";
pub const OWNER_ID_FIELD_NAME: &str = "owner_id";
pub const SITE_ID_FIELD_NAME: &str = "site_id";
pub const OWNER_SITE_ID_FIELD_NAME: &str = "owner_site_id";
pub const DRAFT_ID_FIELD_NAME: &str = "draft_id";

pub const SECTION_FIELD_NAME: &str = "section";
pub const TITLE_FIELD_NAME: &str = "title";
pub const FIELDS_FIELD_NAME: &str = "fields";
pub const ENABLED_FIELD_NAME: &str = "enabled";

pub const STATUS_FIELD_NAME: &str = "status";
pub const SUBMITTED_BY_FIELD_NAME: &str = "submitted_by";
pub const REVIEWED_BY_FIELD_NAME: &str = "reviewed_by";
pub const REASON_FIELD_NAME: &str = "reason";

pub const ACTOR_ID_FIELD_NAME: &str = "actor_id";
pub const CAPABILITY_FIELD_NAME: &str = "capability";
pub const SCOPE_FIELD_NAME: &str = "scope";

pub const CREATED_FIELD_NAME: &str = "created_at";
pub const UPDATED_FIELD_NAME: &str = "updated_at";

/// Stored in `draft_id` for the canonical (non-draft) version of an entry.
pub const CANONICAL_DRAFT_ID: &str = "";

// expose database module

pub use database::{
    Database, DatabaseConnection, DatabaseCredentials, DatabaseSettings, connect as connect_to_database,
};
