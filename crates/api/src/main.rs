use anyhow::Context;

use stockledger_api::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::from_env().context("invalid configuration")?;
    stockledger_observability::init(config.log_format);

    let app = stockledger_api::app::build_app(&config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        lock_timeout_ms = config.ledger.lock_timeout.as_millis() as u64,
        max_attempts = config.ledger.retry.attempts(),
        backoff = ?config.ledger.retry.strategy,
        "listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
