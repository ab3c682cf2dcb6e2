use workflow_common::connect_to_database;
use crate::domain::workflow::WorkflowStateMachine;
use crate::infrastructure::AppStateImpl;
use crate::infrastructure::http::{HttpServer, HttpServerConfig};
use crate::infrastructure::notification::TracingNotificationSink;
use crate::infrastructure::persistence::PostgresWorkflowStore;
use crate::infrastructure::roles::PostgresRoleResolver;
use crate::infrastructure::settings::Settings;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod domain;
mod infrastructure;
#[cfg(test)]
mod test_utils;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = settings.workflow.workflow_config()?;
    let rules = settings.workflow.publish_rules()?;
    tracing::info!(sections = ?config.enabled_sections, "workflow configuration loaded");

    let database = connect_to_database(&settings.database).await?;
    tracing::info!("connected to database");

    let workflow = WorkflowStateMachine::new(
        config,
        PostgresWorkflowStore::new(database, rules),
        PostgresRoleResolver::new(database),
        TracingNotificationSink,
    );
    let state = AppStateImpl::new(workflow);

    let server_config = HttpServerConfig {
        port: &settings.server_port,
    };
    let http_server = HttpServer::new(state, server_config).await?;
    http_server.run().await
}
