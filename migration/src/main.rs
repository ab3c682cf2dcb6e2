use crate::{
    domain::migration::Migration,
    infrastructure::{persistence::PersistenceAdapter, settings::Settings},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use workflow_common::connect_to_database;

pub mod domain;
pub mod infrastructure;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database = connect_to_database(&settings.database).await?;
    tracing::info!("connected to database");
    let persistence = PersistenceAdapter::new(database);

    // create workflow tables missing in the configured schema
    let migration = Migration::new(persistence);
    let created = migration.migrate().await?;
    tracing::info!(created, "database schema migrated");

    Ok(())
}
