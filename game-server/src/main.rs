use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::info;

use game_server::{
    config::Config,
    create_routes,
    image_provider::DogApiProvider,
    session_manager::SessionManager,
    websocket::ConnectionManager,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Guess My Breed server...");

    let config = Arc::new(Config::from_env()?);
    let connection_manager = Arc::new(ConnectionManager::new());

    let image_provider = DogApiProvider::new(config.dog_api_url.clone());
    info!("Fetching dog images from {}", image_provider.endpoint());

    let session_manager = Arc::new(SessionManager::new(
        connection_manager.clone(),
        Arc::new(image_provider),
    ));

    let routes = create_routes(
        connection_manager.clone(),
        session_manager.clone(),
        config.clone(),
    );

    // Start cleanup task
    let cleanup_connection_manager = connection_manager.clone();
    let cleanup_session_manager = session_manager.clone();
    let cleanup_config = config.clone();
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(Duration::from_secs(cleanup_config.cleanup_interval_seconds.max(1)));
        let session_timeout = Duration::from_secs(cleanup_config.session_timeout_seconds);
        loop {
            interval.tick().await;

            let closed = cleanup_connection_manager
                .cleanup_inactive_connections(session_timeout)
                .await;
            for connection_id in closed {
                cleanup_session_manager.close_session(connection_id).await;
            }
            cleanup_session_manager
                .cleanup_inactive_sessions(session_timeout)
                .await;
        }
    });

    info!("Server starting on {}:{}", config.host, config.port);

    let addr = (config.host.parse::<std::net::IpAddr>()?, config.port);

    let (addr, server) = warp::serve(routes).try_bind_with_graceful_shutdown(addr, async {
        // Wait for SIGINT (Ctrl+C) or SIGTERM
        #[cfg(unix)]
        {
            let mut sigint = match signal::unix::signal(signal::unix::SignalKind::interrupt()) {
                Ok(sigint) => sigint,
                Err(e) => {
                    tracing::error!("Failed to listen for SIGINT: {}", e);
                    return std::future::pending().await;
                }
            };
            let mut sigterm = match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(sigterm) => sigterm,
                Err(e) => {
                    tracing::error!("Failed to listen for SIGTERM: {}", e);
                    return std::future::pending().await;
                }
            };

            tokio::select! {
                _ = sigint.recv() => {
                    info!("Received SIGINT, shutting down gracefully...");
                }
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, shutting down gracefully...");
                }
            }
        }

        #[cfg(not(unix))]
        {
            if let Err(e) = signal::ctrl_c().await {
                tracing::error!("Failed to listen for ctrl+c: {}", e);
                return std::future::pending().await;
            }
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    })?;

    info!(
        "Server started successfully on {}. Press Ctrl+C to stop.",
        addr
    );
    server.await;
    info!("Server shutdown complete.");
    Ok(())
}
