use std::sync::Arc;

use anyhow::{Error, Result, anyhow};
use emocopy_lp::{
    api::{AppState, run_api_server},
    catalogue::seed_templates,
    clients::{database::DatabaseClient, llm::LlmClient},
    config::Config,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::load()?;

    info!(port = config.server_port, "Configuration loaded");

    let database_client = Arc::new(DatabaseClient::connect(&config.database_url).await?);
    database_client.migrate().await?;

    if config.seed_templates {
        seed_templates(&database_client).await?;
    }

    let llm_client = LlmClient::new(&config)?;
    let state = Arc::new(AppState::new(config, database_client, llm_client));

    run_api_server(state)
        .await
        .map_err(|e| anyhow!("HTTP server failed: {}", e))?;

    Ok(())
}
