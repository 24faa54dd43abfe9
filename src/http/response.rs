//! Gateway-generated responses.
//!
//! # Responsibilities
//! - Render gateway-originated errors as `{"error": "..."}` JSON
//! - Answer unknown reserved paths
//!
//! Upstream responses never pass through here; they are relayed as-is by
//! the proxy.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

pub async fn not_found() -> Response {
    json_error(StatusCode::NOT_FOUND, "Not found")
}
