//! Axum HTTP API server.
//!
//! This crate provides:
//! - Bearer-token authenticated upload endpoints
//! - The thumbnail and video ingestion pipelines
//! - Health and readiness probes

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod validate;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
