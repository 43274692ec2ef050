//! Test application factory for integration tests.

use axum::{body::Body, http::Request};
use bayer_dither::Raster;
use http_body_util::BodyExt;
use tower::ServiceExt;

use ditherer::models::AppConfig;
use ditherer::server::{build_router, create_app_state, AppState};

use super::fixtures;

/// Test application with router and direct access to the shared state
pub struct TestApp {
    router: axum::Router,
    pub state: AppState,
}

impl TestApp {
    /// Create a test application around the default gradient source
    pub fn new() -> Self {
        Self::with_source(fixtures::gradient(32, 32), AppConfig::default())
    }

    /// Create a test application for a given source and configuration
    pub fn with_source(source: Raster, config: AppConfig) -> Self {
        let state = create_app_state(source, config).expect("Failed to create app state");

        // Build router using shared server module (same as production)
        let router = build_router(state.clone());

        Self { router, state }
    }

    /// Make a GET request to the given path
    pub async fn get(&self, path: &str) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .expect("Request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Current session parameters, read directly from the state
    pub fn params(&self) -> ditherer::models::ParamSet {
        self.state.session.lock().unwrap().params()
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Test response with convenience methods
pub struct TestResponse {
    pub status: axum::http::StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Get body as string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Header value as string, if present
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Check if response is a PNG image
    pub fn is_png(&self) -> bool {
        self.body.len() >= 8 && &self.body[0..8] == b"\x89PNG\r\n\x1a\n"
    }

    /// Check if response is a JPEG image
    pub fn is_jpeg(&self) -> bool {
        self.body.starts_with(&[0xFF, 0xD8])
    }

    /// Decode the image body
    pub fn image(&self) -> Raster {
        ditherer::services::codec::decode_bytes(&self.body).expect("Failed to decode image")
    }
}
