//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the preview server and integration tests.

use axum::{
    http::{header::CACHE_CONTROL, HeaderValue},
    routing::get,
    Router,
};
use bayer_dither::Raster;
use std::sync::{Arc, Mutex};
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::api;
use crate::models::AppConfig;
use crate::services::PreviewSession;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The one preview session; the mutex serializes recomputation
    pub session: Arc<Mutex<PreviewSession>>,
    pub config: Arc<AppConfig>,
}

/// Create application state for a decoded source image.
///
/// Fails if the configured default parameters cannot be applied to the source.
pub fn create_app_state(source: Raster, config: AppConfig) -> anyhow::Result<AppState> {
    let session = PreviewSession::new(source, config.defaults)
        .map_err(|e| anyhow::anyhow!("Default parameters rejected: {e}"))?
        .with_jpeg_quality(config.jpeg_quality());

    Ok(AppState {
        session: Arc::new(Mutex::new(session)),
        config: Arc::new(config),
    })
}

/// Build the API router with all endpoints and middleware.
///
/// Responses carry `Cache-Control: no-store` unless a handler sets its own,
/// since the same URL yields a different image after a parameter change.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/preview", get(api::handle_preview))
        .route("/api/export", get(api::handle_export))
        .route("/api/params", get(api::handle_params))
        // Health check
        .route("/health", get(|| async { "OK" }))
        // Add state and tracing
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}
