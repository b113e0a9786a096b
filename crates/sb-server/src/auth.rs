//! Shared API-key check for `/api` routes.

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::AppError;
use crate::state::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";

pub async fn require_api_key(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let expected = state.settings.api_key.as_str();
    if expected.is_empty() || presented_key(req.headers()) == Some(expected) {
        return next.run(req).await;
    }
    tracing::info!(path = %req.uri().path(), "rejected request without a valid API key");
    AppError::unauthorized().into_response()
}

/// `X-API-Key: <key>` or `Authorization: Bearer <key>`.
fn presented_key(headers: &HeaderMap) -> Option<&str> {
    if let Some(key) = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()) {
        return Some(key.trim());
    }
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
}
