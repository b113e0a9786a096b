//! HTTP error type. Every failure leaves the server as
//! `{"success": false, "error": {"code", "message"}}`.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use sb_core::enums::EntityType;
use sb_core::errors::CoreError;
use sb_core::responses::ApiEnvelope;

use crate::store::StoreError;

#[derive(Debug, Error)]
#[error("{code}: {message}")]
pub struct AppError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
    }

    pub fn unauthorized() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            "UNAUTHORIZED",
            "a valid API key is required",
        )
    }

    pub fn precondition_required() -> Self {
        Self::new(
            StatusCode::PRECONDITION_REQUIRED,
            "PRECONDITION_REQUIRED",
            "send If-Match or a body version; reload the site to obtain one",
        )
    }

    pub fn route_not_found() -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "the requested resource does not exist",
        )
    }

    /// Map a domain error; `fallback` is the per-operation code used for
    /// unexpected failures.
    pub fn from_core(err: CoreError, fallback: &'static str) -> Self {
        let (status, code) = match err {
            CoreError::NotFound { entity, .. } => (StatusCode::NOT_FOUND, not_found_code(entity)),
            CoreError::Validation(_) | CoreError::InvalidVersionToken(_) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            }
            CoreError::MissingField(_) => (StatusCode::BAD_REQUEST, "MISSING_FIELD"),
            CoreError::CertificateUnavailable { .. } => {
                (StatusCode::BAD_REQUEST, "CERTIFICATE_NOT_AVAILABLE")
            }
            CoreError::NotAssigned { .. } => (StatusCode::BAD_REQUEST, "NOT_ASSIGNED"),
            CoreError::VersionConflict { .. } => (StatusCode::CONFLICT, "CONFLICT"),
            CoreError::Duplicate { .. } => (StatusCode::BAD_REQUEST, "DUPLICATE_ID"),
            CoreError::Other(_) => (StatusCode::INTERNAL_SERVER_ERROR, fallback),
        };
        Self::new(status, code, err.to_string())
    }

    pub fn from_store(err: StoreError, fallback: &'static str) -> Self {
        match err {
            StoreError::Core(core) => Self::from_core(core, fallback),
            StoreError::Unavailable(reason) => {
                Self::new(StatusCode::SERVICE_UNAVAILABLE, "CONFIG_REQUIRED", reason)
            }
            other => {
                tracing::error!(error = %other, code = fallback, "store call failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, fallback, other.to_string())
            }
        }
    }
}

const fn not_found_code(entity: EntityType) -> &'static str {
    match entity {
        EntityType::Site => "SITE_NOT_FOUND",
        EntityType::Personnel => "PERSONNEL_NOT_FOUND",
        EntityType::Certificate => "CERTIFICATE_NOT_FOUND",
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        Self::from_core(err, "INTERNAL_ERROR")
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body: ApiEnvelope<()> = ApiEnvelope::failure(self.code, self.message);
        (self.status, Json(body)).into_response()
    }
}

/// Attach the per-operation error code to a store result.
pub trait OrCode<T> {
    /// # Errors
    ///
    /// Converts the store error into an [`AppError`].
    fn or_code(self, fallback: &'static str) -> Result<T, AppError>;
}

impl<T> OrCode<T> for Result<T, StoreError> {
    fn or_code(self, fallback: &'static str) -> Result<T, AppError> {
        self.map_err(|e| AppError::from_store(e, fallback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(CoreError::not_found(EntityType::Site, "S"), StatusCode::NOT_FOUND, "SITE_NOT_FOUND")]
    #[case(CoreError::not_found(EntityType::Certificate, "C"), StatusCode::NOT_FOUND, "CERTIFICATE_NOT_FOUND")]
    #[case(CoreError::MissingField("name".into()), StatusCode::BAD_REQUEST, "MISSING_FIELD")]
    #[case(CoreError::CertificateUnavailable { id: "C".into() }, StatusCode::BAD_REQUEST, "CERTIFICATE_NOT_AVAILABLE")]
    #[case(CoreError::NotAssigned { site_id: "S".into() }, StatusCode::BAD_REQUEST, "NOT_ASSIGNED")]
    #[case(CoreError::VersionConflict { id: "S".into(), current: 2, expected: 1 }, StatusCode::CONFLICT, "CONFLICT")]
    #[case(CoreError::InvalidVersionToken("x".into()), StatusCode::BAD_REQUEST, "VALIDATION_ERROR")]
    fn core_errors_map_to_codes(
        #[case] err: CoreError,
        #[case] status: StatusCode,
        #[case] code: &str,
    ) {
        let app = AppError::from_core(err, "UPDATE_ERROR");
        assert_eq!(app.status, status);
        assert_eq!(app.code, code);
    }

    #[test]
    fn unexpected_failures_use_the_operation_code() {
        let app = AppError::from_core(other("boom"), "ASSIGN_ERROR");
        assert_eq!(app.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(app.code, "ASSIGN_ERROR");

        let app = AppError::from_store(StoreError::Unavailable("no url".into()), "FETCH_ERROR");
        assert_eq!(app.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(app.code, "CONFIG_REQUIRED");
    }

    fn other(msg: &str) -> CoreError {
        CoreError::Other(std::io::Error::other(msg.to_string()).into())
    }
}
