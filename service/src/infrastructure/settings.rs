use std::collections::{HashMap, HashSet};
use std::env;

use anyhow::{Context, anyhow};
use config::{Config, Environment, File};
use dotenvy::dotenv;
use serde::Deserialize;
use workflow_common::DatabaseSettings;

use crate::domain::config::{EnabledSections, WorkflowConfig};
use crate::domain::entity::PublishRules;
use crate::domain::identifiers::{Capability, ScopeId};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server_port: String,
    pub database: DatabaseSettings,
    pub workflow: WorkflowSettings,
}

/// Raw `workflow` section, turned into domain config by `workflow_config` and `publish_rules`
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowSettings {
    enabled_sections: EnabledSectionsSetting,
    editor_capability: String,
    publisher_capability: String,
    #[serde(default)]
    required_fields: HashMap<String, Vec<String>>,
}

/// `"*"` (or `"all"`) or a list of section handles
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum EnabledSectionsSetting {
    Wildcard(String),
    List(Vec<String>),
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();
        let run_mode = load_env("RUN_MODE", "development");

        let s = Config::builder()
            .add_source(File::with_name("./config/default"))
            .add_source(File::with_name(&format!("./config/{run_mode}")).required(false))
            .add_source(
                Environment::with_prefix("app")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        s.try_deserialize().with_context(|| "failed to read config")
    }
}

impl WorkflowSettings {
    pub fn workflow_config(&self) -> anyhow::Result<WorkflowConfig> {
        let enabled_sections = match &self.enabled_sections {
            EnabledSectionsSetting::Wildcard(value) if value == "*" || value == "all" => {
                EnabledSections::All
            }
            EnabledSectionsSetting::Wildcard(value) => {
                return Err(anyhow!(
                    "workflow.enabled_sections must be \"*\" or a list of sections, got '{}'",
                    value
                ));
            }
            EnabledSectionsSetting::List(sections) => EnabledSections::Only(
                sections
                    .iter()
                    .map(|s| parse_scope(s))
                    .collect::<anyhow::Result<HashSet<_>>>()?,
            ),
        };

        let editor_capability = Capability::try_new(self.editor_capability.as_str())
            .with_context(|| "workflow.editor_capability is not set")?;
        let publisher_capability = Capability::try_new(self.publisher_capability.as_str())
            .with_context(|| "workflow.publisher_capability is not set")?;

        Ok(WorkflowConfig {
            enabled_sections,
            editor_capability,
            publisher_capability,
        })
    }

    pub fn publish_rules(&self) -> anyhow::Result<PublishRules> {
        let required_fields = self
            .required_fields
            .iter()
            .map(|(section, fields)| Ok::<_, anyhow::Error>((parse_scope(section)?, fields.clone())))
            .collect::<anyhow::Result<HashMap<_, _>>>()?;

        Ok(PublishRules::new(required_fields))
    }
}

fn parse_scope(value: &str) -> anyhow::Result<ScopeId> {
    ScopeId::try_new(value).with_context(|| format!("invalid section handle '{}'", value))
}

fn load_env(key: &str, default_value: &'static str) -> String {
    env::var(key).unwrap_or_else(|_| default_value.into())
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn workflow_settings(yaml: &str) -> WorkflowSettings {
        Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_all_sections() {
        let settings = workflow_settings(
            r#"
enabled_sections: "*"
editor_capability: workflow-editor
publisher_capability: workflow-publisher
"#,
        );

        let config = settings.workflow_config().unwrap();
        assert_eq!(config.enabled_sections, EnabledSections::All);
        assert_eq!(config.editor_capability.as_ref(), "workflow-editor");
        assert_eq!(config.publisher_capability.as_ref(), "workflow-publisher");
    }

    #[test]
    fn test_listed_sections_and_rules() {
        let settings = workflow_settings(
            r#"
enabled_sections: [News, blog]
editor_capability: editor
publisher_capability: publisher
required_fields:
  news: [summary, body]
"#,
        );

        let config = settings.workflow_config().unwrap();
        let news = ScopeId::try_new("news").unwrap();
        assert!(config.enabled_sections.contains(&news));
        assert!(!config.enabled_sections.contains(&ScopeId::try_new("pages").unwrap()));
        assert!(settings.publish_rules().is_ok());
    }

    #[test]
    fn test_misconfigured_workflow() {
        let settings = workflow_settings(
            r#"
enabled_sections: "*"
editor_capability: "  "
publisher_capability: publisher
"#,
        );
        assert!(settings.workflow_config().is_err());

        let settings = workflow_settings(
            r#"
enabled_sections: "some"
editor_capability: editor
publisher_capability: publisher
"#,
        );
        assert!(settings.workflow_config().is_err());
    }
}
