//! API routes.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::health::{health, ready};
use crate::handlers::uploads::{upload_thumbnail, upload_video};
use crate::middleware::{cors_layer, request_id, request_logging};
use crate::state::AppState;

/// Body cap for thumbnail uploads: 10 MiB.
pub const MAX_THUMBNAIL_BYTES: usize = 10 << 20;

/// Body cap for video uploads: 1 GiB.
pub const MAX_VIDEO_BYTES: usize = 1 << 30;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    // The caps differ by an order of magnitude, so each upload route
    // carries its own body limit instead of a shared outer layer.
    let upload_routes = Router::new()
        .route(
            "/videos/:video_id/thumbnail",
            post(upload_thumbnail).layer(DefaultBodyLimit::max(MAX_THUMBNAIL_BYTES)),
        )
        .route(
            "/videos/:video_id/video",
            post(upload_video).layer(DefaultBodyLimit::max(MAX_VIDEO_BYTES)),
        );

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/ready", get(ready));

    Router::new()
        .merge(upload_routes)
        .merge(health_routes)
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
