use anyhow::Context;

use stockledger_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    stockledger_observability::init_with(config.log_format);

    let app = stockledger_api::app::build_app(config.ledger);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        default_reorder_level = config.ledger.default_reorder_level,
        "listening"
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
