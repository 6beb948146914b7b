use destination_proxy::error::AppResult;
use destination_proxy::modules::{config::AppConfig, logger};
use destination_proxy::proxy::AxumServer;
use tracing::info;

#[tokio::main]
async fn main() -> AppResult<()> {
    logger::init_logger();

    let config = AppConfig::from_env();
    if config.vcap_services.is_none() {
        // Still boot: the platform health check must pass, and the missing
        // binding is reported per request with the exact message callers know.
        tracing::warn!("VCAP_SERVICES is not set; destination resolution will fail");
    }

    let (server, handle) = AxumServer::start(config).await?;

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
    server.stop();
    let _ = handle.await;

    Ok(())
}
