use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use sb_core::entities::NewCertificate;
use sb_core::filters::CertificateFilter;
use sb_core::responses::ApiEnvelope;
use sb_core::updates::CertificateUpdate;
use sb_core::validation::{validate_certificate_update, validate_new_certificate};

use crate::error::{AppError, OrCode};
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    filter: Result<Query<CertificateFilter>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(filter) = filter?;
    let certificates = state
        .store
        .list_certificates(&filter)
        .await
        .or_code("FETCH_ERROR")?;
    let count = certificates.len();
    Ok(Json(ApiEnvelope::ok(certificates).with_count(count)))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let certificate = state.store.get_certificate(&id).await.or_code("FETCH_ERROR")?;
    Ok(Json(ApiEnvelope::ok(certificate)))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewCertificate>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(input) = payload?;
    validate_new_certificate(&input)?;
    let certificate = state
        .store
        .create_certificate(input)
        .await
        .or_code("CREATE_ERROR")?;
    tracing::info!(certificate_id = %certificate.id, "certificate created");
    Ok((
        StatusCode::CREATED,
        Json(ApiEnvelope::ok(certificate).with_message("certificate created")),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CertificateUpdate>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(update) = payload?;
    validate_certificate_update(&update)?;
    let certificate = state
        .store
        .update_certificate(&id, &update)
        .await
        .or_code("UPDATE_ERROR")?;
    Ok(Json(
        ApiEnvelope::ok(certificate).with_message("certificate updated"),
    ))
}
