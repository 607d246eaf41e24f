use anyhow::Context;
use items_server::simulate::whole_millis;
use items_server::ServerConfig;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("items_server=info,tower_http=info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(
        %addr,
        origins = ?config.cors_origins,
        max_latency_ms = whole_millis(config.delays.max_latency),
        timeout_delay_ms = whole_millis(config.delays.timeout),
        "items API listening"
    );

    items_server::run(listener, &config, shutdown_signal()).await?;
    tracing::info!("items API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
