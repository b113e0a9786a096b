use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::header::ETAG;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use serde::Deserialize;
use serde_json::Value;

use sb_core::entities::{NewSite, Site};
use sb_core::filters::SiteFilter;
use sb_core::responses::{ApiEnvelope, AssignmentAck, MutationAck};
use sb_core::updates::SiteUpdate;
use sb_core::validation::{validate_new_site, validate_site_update};
use sb_core::version::{check_version, etag};

use crate::error::{AppError, OrCode};
use crate::state::AppState;
use crate::version::requested_version;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Default, Deserialize)]
struct AssignRequest {
    #[serde(default)]
    manager_id: Option<String>,
    #[serde(default)]
    certificate_id: Option<String>,
    #[serde(default)]
    version: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct UnassignRequest {
    #[serde(default)]
    version: Option<Value>,
}

/// Bodies of assign / unassign are optional; an empty body is `{}`.
fn optional_body<T: Default + serde::de::DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| AppError::validation(format!("invalid JSON body: {e}")))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub async fn list(
    State(state): State<AppState>,
    filter: Result<Query<SiteFilter>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(mut filter) = filter?;
    filter.limit = filter.limit.or(state.settings.default_limit);
    let page = state.store.list_sites(&filter).await.or_code("FETCH_ERROR")?;
    let count = page.items.len();
    Ok(Json(
        ApiEnvelope::ok(page.items).with_page(count, page.total, filter.limit, filter.offset()),
    ))
}

pub async fn search(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = params?;
    let needle = params.q.trim();
    if needle.is_empty() {
        return Err(AppError::new(
            StatusCode::BAD_REQUEST,
            "INVALID_QUERY",
            "search query is required (q=)",
        ));
    }
    let sites = state.store.search_sites(needle).await.or_code("SEARCH_ERROR")?;
    let count = sites.len();
    Ok(Json(
        ApiEnvelope::ok(sites).with_count(count).with_query(needle),
    ))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let detail = state.store.site_detail(&id).await.or_code("FETCH_ERROR")?;
    let tag = etag(detail.site.version);
    Ok(([(ETAG, tag)], Json(ApiEnvelope::ok(detail))))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewSite>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(input) = payload?;
    validate_new_site(&input, &state.settings.companies)?;
    let site: Site = state.store.create_site(input).await.or_code("CREATE_ERROR")?;
    tracing::info!(site_id = %site.id, "site created");
    let tag = etag(site.version);
    Ok((
        StatusCode::CREATED,
        [(ETAG, tag)],
        Json(ApiEnvelope::ok(site).with_message("site created")),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = payload?;
    let current = state.store.get_site(&id).await.or_code("UPDATE_ERROR")?;
    let expected = requested_version(&headers, body.get("version"), state.settings.require_version)?;
    check_version(&id, current.version, expected)?;

    let update: SiteUpdate = serde_json::from_value(body)
        .map_err(|e| AppError::validation(format!("invalid site update: {e}")))?;
    validate_site_update(&update, &state.settings.companies)?;

    let site = state
        .store
        .update_site(&id, &update, expected)
        .await
        .or_code("UPDATE_ERROR")?;
    let ack = MutationAck {
        id: site.id,
        version: Some(site.version),
        updated_fields: update
            .changed_fields()
            .into_iter()
            .map(String::from)
            .collect(),
    };
    Ok((
        [(ETAG, etag(site.version))],
        Json(ApiEnvelope::ok(ack).with_message("site updated")),
    ))
}

pub async fn assign(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    state.store.get_site(&id).await.or_code("ASSIGN_ERROR")?;
    let request: AssignRequest = optional_body(&body)?;
    let (Some(manager_id), Some(certificate_id)) = (
        non_blank(request.manager_id),
        non_blank(request.certificate_id),
    ) else {
        return Err(AppError::new(
            StatusCode::BAD_REQUEST,
            "MISSING_PARAMS",
            "manager_id and certificate_id are required",
        ));
    };
    let expected = requested_version(
        &headers,
        request.version.as_ref(),
        state.settings.require_version,
    )?;

    let site = state
        .store
        .assign_site(&id, &manager_id, &certificate_id, expected)
        .await
        .or_code("ASSIGN_ERROR")
        .map_err(|mut e| {
            if e.code == "PERSONNEL_NOT_FOUND" {
                e.code = "MANAGER_NOT_FOUND";
            }
            e
        })?;
    tracing::info!(site_id = %id, %manager_id, %certificate_id, version = site.version, "manager assigned");

    let ack = AssignmentAck {
        site_id: site.id,
        manager_id,
        certificate_id,
        version: site.version,
    };
    Ok((
        [(ETAG, etag(site.version))],
        Json(ApiEnvelope::ok(ack).with_message("manager assigned")),
    ))
}

pub async fn unassign(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let request: UnassignRequest = optional_body(&body)?;
    let expected = requested_version(
        &headers,
        request.version.as_ref(),
        state.settings.require_version,
    )?;
    let site = state
        .store
        .unassign_site(&id, expected)
        .await
        .or_code("UNASSIGN_ERROR")?;
    tracing::info!(site_id = %id, version = site.version, "manager unassigned");

    let ack = MutationAck {
        id: site.id,
        version: Some(site.version),
        updated_fields: Vec::new(),
    };
    Ok((
        [(ETAG, etag(site.version))],
        Json(ApiEnvelope::ok(ack).with_message("manager unassigned")),
    ))
}
