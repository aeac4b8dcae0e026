use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use vision::annotate::CloudVisionProvider;
use vision::service::VisionService;
use vision_ocr::common::init_logger_exe;
use vision_ocr::server::config::ServerConfig;
use vision_ocr::server::routes::router;

#[tokio::main]
async fn main() -> Result<()> {
    init_logger_exe();

    log::info!("Starting server...");

    let config = ServerConfig::from_env()?;
    let provider = CloudVisionProvider::new(&config.vision)?;
    let service = VisionService::new(Arc::new(provider));
    let app = router(service, config.max_upload_bytes);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    log::info!("Attempting to bind to port {}", config.port);

    let listener = TcpListener::bind(addr).await?;
    log::info!("Successfully bound to http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    log::warn!("Ctrl-C received, stopping...");
}
