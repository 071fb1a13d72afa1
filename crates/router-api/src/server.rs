//! HTTP server setup and configuration

use std::net::SocketAddr;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::routes::create_router;
use crate::AppState;

/// Route requests embed a full market snapshot; allow more than axum's 2 MiB.
pub const MAX_REQUEST_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Any origin may query routes; only the methods the API serves are allowed.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::CONTENT_TYPE])
}

/// Create the full application router with middleware
pub fn create_app(state: AppState) -> Router {
    create_router(state)
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

/// Serve the route API on the configured port until Ctrl-C
pub async fn start_server(state: AppState) -> Result<(), std::io::Error> {
    let config = state.config().await;
    let app = create_app(state);
    let addr = SocketAddr::from(([127, 0, 0, 1], config.api_port));

    tracing::info!(network = %config.network, "Starting route API on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Route API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
