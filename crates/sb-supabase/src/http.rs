//! Shared HTTP response helpers.
//!
//! Centralizes status-code checks (429 rate limiting with `Retry-After`
//! parsing, non-success → [`SupabaseError::Api`]) and the `Content-Range`
//! total that PostgREST returns for `Prefer: count=exact`.

use crate::error::SupabaseError;

/// Check an HTTP response for common error conditions.
///
/// Returns the response unchanged on success. Handles:
/// - **429 Too Many Requests** → [`SupabaseError::RateLimited`] with
///   `Retry-After` header parsing (falls back to 60 s).
/// - **Non-success status** → [`SupabaseError::Api`] with status code and
///   the PostgREST `message` field, or the raw body.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, SupabaseError> {
    if resp.status() == 429 {
        let retry_after = parse_retry_after(&resp);
        return Err(SupabaseError::RateLimited {
            retry_after_secs: retry_after,
        });
    }
    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        return Err(SupabaseError::Api {
            status,
            message: postgrest_message(&body),
        });
    }
    Ok(resp)
}

fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(60)
}

/// PostgREST error bodies look like `{"code": "...", "message": "..."}`.
fn postgrest_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| body.to_string())
}

/// Total row count from a `Content-Range` header (`0-24/3573`, `*/0`).
#[must_use]
pub fn parse_content_range_total(resp: &reqwest::Response) -> Option<u64> {
    resp.headers()
        .get(reqwest::header::CONTENT_RANGE)
        .and_then(|v| v.to_str().ok())
        .and_then(total_from_range)
}

fn total_from_range(value: &str) -> Option<u64> {
    value.rsplit('/').next().and_then(|t| t.trim().parse().ok())
}
