use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use stockwise_engine::ReplenishmentConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stockwise_observability::init();

    let config = ReplenishmentConfig::from_env().context("invalid replenishment configuration")?;
    let seed_file = std::env::var("STOCKWISE_SEED_FILE").ok().map(PathBuf::from);
    if seed_file.is_none() {
        tracing::warn!("STOCKWISE_SEED_FILE not set; starting with an empty catalog");
    }

    let services = stockwise_api::app::services::build_services(config, seed_file.as_deref())?;
    let app = stockwise_api::app::build_app(Arc::new(services));

    let addr =
        std::env::var("STOCKWISE_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
