//! Route table and the handlers that do not belong to a resource.

mod certificates;
mod personnel;
mod sites;
mod stats;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use chrono::Utc;
use serde_json::json;

use crate::auth::require_api_key;
use crate::error::AppError;
use crate::state::AppState;

pub const SERVICE_NAME: &str = "siteboard-api";

/// All routes, with state attached. Layers are added by [`crate::router`].
pub fn routes(state: AppState) -> Router {
    let protected = Router::new()
        .route("/sites", get(sites::list).post(sites::create))
        .route("/sites/search", get(sites::search))
        .route("/sites/:id", get(sites::detail).put(sites::update))
        .route("/sites/:id/assign", post(sites::assign))
        .route("/sites/:id/unassign", post(sites::unassign))
        .route("/personnel", get(personnel::list).post(personnel::create))
        .route("/personnel/:id", get(personnel::detail).put(personnel::update))
        .route(
            "/certificates",
            get(certificates::list).post(certificates::create),
        )
        .route(
            "/certificates/:id",
            get(certificates::detail).put(certificates::update),
        )
        .route("/stats", get(stats::dashboard))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    let api = Router::new().route("/health", get(health)).merge(protected);

    Router::new()
        .route("/", get(index))
        .nest("/api", api)
        .fallback(not_found)
        .with_state(state)
}

async fn index() -> impl IntoResponse {
    Json(json!({
        "name": "Siteboard API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "sites": "GET/POST /api/sites",
            "sites_detail": "GET/PUT /api/sites/{id}",
            "sites_search": "GET /api/sites/search?q=",
            "sites_assign": "POST /api/sites/{id}/assign",
            "sites_unassign": "POST /api/sites/{id}/unassign",
            "personnel": "GET/POST /api/personnel",
            "personnel_detail": "GET/PUT /api/personnel/{id}",
            "certificates": "GET/POST /api/certificates",
            "certificates_detail": "GET/PUT /api/certificates/{id}",
            "stats": "GET /api/stats",
            "health": "GET /api/health",
        },
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "backend": state.store.name(),
        "timestamp": Utc::now(),
    }))
}

async fn not_found() -> AppError {
    AppError::route_not_found()
}
