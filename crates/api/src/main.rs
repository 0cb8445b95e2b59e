use std::sync::Arc;

use anyhow::Context;

use pricing_infra::ServiceConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pricing_observability::init();

    let config = ServiceConfig::from_env().context("invalid service configuration")?;
    let services = pricing_api::app::services::build_services(&config).await?;
    let app = pricing_api::app::build_app(Arc::new(services));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        policy = ?config.policy,
        "listening"
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
