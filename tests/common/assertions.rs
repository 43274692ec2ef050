//! Assertion helpers for tests.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use super::app::TestResponse;

/// Assert the HTTP status, showing the body on mismatch
pub fn assert_status(response: &TestResponse, expected: StatusCode) {
    assert_eq!(
        response.status,
        expected,
        "unexpected status, body: {}",
        response.text()
    );
}

pub fn assert_ok(response: &TestResponse) {
    assert_status(response, StatusCode::OK);
}

/// Assert a 200 response carrying a PNG body and content type
pub fn assert_png(response: &TestResponse) {
    assert_ok(response);
    let head = &response.body[..response.body.len().min(8)];
    assert!(response.is_png(), "not a PNG signature: {head:?}");
    assert_eq!(response.header("content-type"), Some("image/png"));
}

/// Assert an error response whose JSON `status` matches the HTTP status
pub fn assert_json_status(response: &TestResponse, expected: u16) {
    assert_eq!(response.status.as_u16(), expected, "body: {}", response.text());
    let json: serde_json::Value = response.json();
    assert_eq!(json["status"].as_u64(), Some(u64::from(expected)));
    assert!(
        json["error"].as_str().is_some_and(|e| !e.is_empty()),
        "missing error message in {json}"
    );
}
