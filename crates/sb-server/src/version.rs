//! Reading the caller's version token from `If-Match` or the body.

use axum::http::HeaderMap;
use axum::http::header::IF_MATCH;
use serde_json::Value;

use sb_core::errors::CoreError;
use sb_core::version::parse_if_match;

use crate::error::AppError;

/// The version a mutation must match, if the caller supplied one.
///
/// A non-blank `If-Match` wins over a body `version`. `*` or no token at all yields
/// `None`; with `require` set, no token at all is a 428.
///
/// # Errors
///
/// 400 for an unparseable token, 428 when a required token is missing.
pub fn requested_version(
    headers: &HeaderMap,
    body_version: Option<&Value>,
    require: bool,
) -> Result<Option<i64>, AppError> {
    if let Some(raw) = headers.get(IF_MATCH) {
        let raw = raw
            .to_str()
            .map_err(|_| CoreError::InvalidVersionToken("non-ASCII If-Match".into()))?;
        // A blank header counts as absent.
        if !raw.trim().is_empty() {
            return Ok(parse_if_match(raw)?.expected());
        }
    }

    let from_body = match body_version {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => Some(parse_if_match(s)?.expected()),
        Some(Value::Number(n)) => Some(Some(
            n.as_i64()
                .filter(|v| *v > 0)
                .ok_or_else(|| CoreError::InvalidVersionToken(n.to_string()))?,
        )),
        Some(other) => return Err(CoreError::InvalidVersionToken(other.to_string()).into()),
    };

    match from_body {
        Some(expected) => Ok(expected),
        None if require => Err(AppError::precondition_required()),
        None => Ok(None),
    }
}
