use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use sb_core::entities::NewPersonnel;
use sb_core::filters::PersonnelFilter;
use sb_core::responses::ApiEnvelope;
use sb_core::updates::PersonnelUpdate;
use sb_core::validation::{validate_new_personnel, validate_personnel_update};

use crate::error::{AppError, OrCode};
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    filter: Result<Query<PersonnelFilter>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(filter) = filter?;
    let people = state.store.list_personnel(&filter).await.or_code("FETCH_ERROR")?;
    let count = people.len();
    Ok(Json(ApiEnvelope::ok(people).with_count(count)))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let person = state.store.get_personnel(&id).await.or_code("FETCH_ERROR")?;
    Ok(Json(ApiEnvelope::ok(person)))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewPersonnel>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(input) = payload?;
    validate_new_personnel(&input)?;
    let person = state.store.create_personnel(input).await.or_code("CREATE_ERROR")?;
    tracing::info!(personnel_id = %person.id, "personnel created");
    Ok((
        StatusCode::CREATED,
        Json(ApiEnvelope::ok(person).with_message("personnel created")),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<PersonnelUpdate>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(update) = payload?;
    validate_personnel_update(&update)?;
    let person = state
        .store
        .update_personnel(&id, &update)
        .await
        .or_code("UPDATE_ERROR")?;
    Ok(Json(ApiEnvelope::ok(person).with_message("personnel updated")))
}
