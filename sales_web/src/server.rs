use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::context::AppContext;
use crate::handlers::AppState;
use crate::router::create_router;

/// Run the web server until Ctrl-C
pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port).parse::<SocketAddr>()?;

    let context = Arc::new(AppContext::new(config));
    let app = create_router(AppState::new(context));

    tracing::info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        // Without a signal handler, run until the process is killed
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
