pub mod request_id;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::controllers::{
    episode::EpisodeController,
    health::{self, Readiness},
};
use crate::infrastructure::config::Config;

pub use request_id::{request_id_middleware, RequestId, X_REQUEST_ID};

/// Uploaded episodes can be far larger than axum's default body limit
const MAX_ARCHIVE_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// Build the application router
pub fn create_router(episode_controller: Arc<EpisodeController>, readiness: Arc<Readiness>) -> Router {
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(readiness);

    let episode_routes = Router::new()
        .route("/generate", post(EpisodeController::generate))
        .route(
            "/save-to-s3",
            post(EpisodeController::save_to_archive)
                .layer(DefaultBodyLimit::max(MAX_ARCHIVE_UPLOAD_BYTES)),
        )
        .with_state(episode_controller);

    Router::new()
        .merge(health_routes)
        .merge(episode_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(request_id_middleware)),
        )
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    episode_controller: Arc<EpisodeController>,
    readiness: Arc<Readiness>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(episode_controller, readiness);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
