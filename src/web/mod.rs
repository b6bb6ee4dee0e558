use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::health::HealthMonitor;
use crate::shutdown::ShutdownSignal;

pub mod handlers;
pub mod responses;

pub use handlers::status;
pub use responses::*;

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<HealthMonitor>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(status))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
        )
        .with_state(state)
}

/// Serve the status endpoint until `shutdown` fires.
pub async fn serve(config: ServerConfig, state: AppState, mut shutdown: ShutdownSignal) -> anyhow::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Status server listening on {}:{}", config.host, config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.triggered().await })
        .await?;

    tracing::info!("Status server stopped");
    Ok(())
}
