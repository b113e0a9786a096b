use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;

use sb_core::responses::ApiEnvelope;

use crate::error::{AppError, OrCode};
use crate::state::AppState;

pub async fn dashboard(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let stats = state.store.dashboard_stats().await.or_code("STATS_ERROR")?;
    Ok(Json(ApiEnvelope::ok(stats)))
}
