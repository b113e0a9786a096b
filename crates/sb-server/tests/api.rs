//! Drives the full router with `tower::ServiceExt::oneshot` against an
//! in-memory store.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tower::ServiceExt;

use sb_server::{AppState, Backend, Settings, router};

struct Reply {
    status: StatusCode,
    etag: Option<String>,
    body: Value,
}

async fn app_with(settings: Settings) -> Router {
    let backend = Backend::memory().await.unwrap();
    router(AppState::new(backend, settings))
}

async fn app() -> Router {
    app_with(Settings::default()).await
}

async fn send(app: &Router, req: Request<Body>) -> Reply {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let etag = resp
        .headers()
        .get(header::ETAG)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    Reply { status, etag, body }
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn with_if_match(mut req: Request<Body>, tag: &str) -> Request<Body> {
    req.headers_mut()
        .insert(header::IF_MATCH, tag.parse().unwrap());
    req
}

async fn create_site(app: &Router, name: &str) -> String {
    let reply = send(
        app,
        json_request(
            "POST",
            "/api/sites",
            &json!({"name": name, "company": "더존종합건설", "address": format!("{name} road 1")}),
        ),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
    reply.body["data"]["id"].as_str().unwrap().to_string()
}

async fn create_manager(app: &Router, name: &str) -> String {
    let reply = send(
        app,
        json_request("POST", "/api/personnel", &json!({"name": name, "role": "site manager"})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
    reply.body["data"]["id"].as_str().unwrap().to_string()
}

async fn create_certificate(app: &Router, owner: &str) -> String {
    let reply = send(
        app,
        json_request(
            "POST",
            "/api/certificates",
            &json!({"name": "Architect license", "owner_name": owner}),
        ),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
    reply.body["data"]["id"].as_str().unwrap().to_string()
}

fn error_code(reply: &Reply) -> &str {
    assert_eq!(reply.body["success"], false, "{}", reply.body);
    reply.body["error"]["code"].as_str().unwrap()
}

#[tokio::test]
async fn index_health_and_fallback() {
    let app = app().await;

    let index = send(&app, get("/")).await;
    assert_eq!(index.status, StatusCode::OK);
    assert!(index.body["endpoints"]["sites_assign"].is_string());

    let health = send(&app, get("/api/health")).await;
    assert_eq!(health.body["status"], "healthy");
    assert_eq!(health.body["backend"], "local");

    let missing = send(&app, get("/api/nowhere")).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&missing), "NOT_FOUND");
}

#[tokio::test]
async fn create_site_validation_and_duplicates() {
    let app = app().await;

    let missing = send(
        &app,
        json_request("POST", "/api/sites", &json!({"company": "더존하우징"})),
    )
    .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&missing), "MISSING_FIELD");

    let bad_company = send(
        &app,
        json_request(
            "POST",
            "/api/sites",
            &json!({"name": "A", "company": "Acme", "address": "Seoul"}),
        ),
    )
    .await;
    assert_eq!(error_code(&bad_company), "VALIDATION_ERROR");

    let body = json!({"id": "SITE-FIXED", "name": "A", "company": "더존하우징", "address": "Seoul", "latitude": "37.5"});
    let created = send(&app, json_request("POST", "/api/sites", &body)).await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.etag.as_deref(), Some("\"1\""));
    assert_eq!(created.body["data"]["latitude"], 37.5);

    let duplicate = send(&app, json_request("POST", "/api/sites", &body)).await;
    assert_eq!(duplicate.status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&duplicate), "DUPLICATE_ID");

    let malformed = send(
        &app,
        Request::post("/api/sites")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap(),
    )
    .await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&malformed), "VALIDATION_ERROR");
}

#[tokio::test]
async fn list_search_and_detail() {
    let app = app().await;
    for name in ["Alpha", "Bravo", "Charlie"] {
        create_site(&app, name).await;
    }

    let page = send(&app, get("/api/sites?limit=2&offset=1")).await;
    assert_eq!(page.body["count"], 2);
    assert_eq!(page.body["total"], 3);
    assert_eq!(page.body["limit"], 2);
    assert_eq!(page.body["offset"], 1);

    let defaults = send(&app, get("/api/sites?status=unassigned")).await;
    assert_eq!(defaults.body["count"], 3);
    assert_eq!(defaults.body["limit"], Value::Null);

    let bad = send(&app, get("/api/sites?status=maybe")).await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);

    let found = send(&app, get("/api/sites/search?q=bravo")).await;
    assert_eq!(found.body["count"], 1);
    assert_eq!(found.body["query"], "bravo");
    assert_eq!(found.body["data"][0]["name"], "Bravo");

    let blank = send(&app, get("/api/sites/search?q=%20")).await;
    assert_eq!(error_code(&blank), "INVALID_QUERY");

    let id = found.body["data"][0]["id"].as_str().unwrap().to_string();
    let detail = send(&app, get(&format!("/api/sites/{id}"))).await;
    assert_eq!(detail.etag.as_deref(), Some("\"1\""));
    assert_eq!(detail.body["data"]["manager"], Value::Null);

    let absent = send(&app, get("/api/sites/SITE-NOPE")).await;
    assert_eq!(absent.status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&absent), "SITE_NOT_FOUND");
}

#[tokio::test]
async fn list_without_limit_returns_every_site() {
    let app = app().await;
    for n in 0..105 {
        create_site(&app, &format!("Block {n:03}")).await;
    }

    let all = send(&app, get("/api/sites")).await;
    assert_eq!(all.body["count"], 105);
    assert_eq!(all.body["total"], 105);
    assert_eq!(all.body["data"].as_array().map(Vec::len), Some(105));

    let paged = send(&app, get("/api/sites?limit=100&offset=100")).await;
    assert_eq!(paged.body["count"], 5);
}

#[tokio::test]
async fn configured_default_limit_applies_when_limit_is_absent() {
    let app = app_with(Settings {
        default_limit: Some(2),
        ..Settings::default()
    })
    .await;
    for name in ["Alpha", "Bravo", "Charlie"] {
        create_site(&app, name).await;
    }

    let page = send(&app, get("/api/sites")).await;
    assert_eq!(page.body["count"], 2);
    assert_eq!(page.body["total"], 3);
    assert_eq!(page.body["limit"], 2);
}

#[tokio::test]
async fn blank_if_match_uses_body_version() {
    let app = app().await;
    let id = create_site(&app, "Alpha").await;
    let uri = format!("/api/sites/{id}");

    let accepted = send(
        &app,
        with_if_match(json_request("PUT", &uri, &json!({"notes": "x", "version": 1})), ""),
    )
    .await;
    assert_eq!(accepted.status, StatusCode::OK, "{}", accepted.body);
    assert_eq!(accepted.body["data"]["version"], 2);

    let stale = send(
        &app,
        with_if_match(json_request("PUT", &uri, &json!({"notes": "y", "version": 1})), ""),
    )
    .await;
    assert_eq!(stale.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn stale_unassign_on_unassigned_site_is_a_conflict() {
    let app = app().await;
    let id = create_site(&app, "Alpha").await;
    let bumped = send(&app, json_request("PUT", &format!("/api/sites/{id}"), &json!({"notes": "v2"}))).await;
    assert_eq!(bumped.body["data"]["version"], 2);

    let unassign_uri = format!("/api/sites/{id}/unassign");
    let stale = send(&app, json_request("POST", &unassign_uri, &json!({"version": 1}))).await;
    assert_eq!(stale.status, StatusCode::CONFLICT);
    assert_eq!(error_code(&stale), "CONFLICT");

    let current = send(&app, json_request("POST", &unassign_uri, &json!({"version": 2}))).await;
    assert_eq!(current.status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&current), "NOT_ASSIGNED");
}

#[tokio::test]
async fn versioned_update() {
    let app = app().await;
    let id = create_site(&app, "Alpha").await;
    let uri = format!("/api/sites/{id}");

    let ok = send(
        &app,
        with_if_match(
            json_request("PUT", &uri, &json!({"notes": "crane booked", "manager_id": "PRS-X"})),
            "\"1\"",
        ),
    )
    .await;
    assert_eq!(ok.status, StatusCode::OK, "{}", ok.body);
    assert_eq!(ok.etag.as_deref(), Some("\"2\""));
    assert_eq!(ok.body["data"]["version"], 2);
    assert_eq!(ok.body["data"]["updated_fields"], json!(["notes"]));

    let stale = send(
        &app,
        with_if_match(json_request("PUT", &uri, &json!({"name": "Beta"})), "\"1\""),
    )
    .await;
    assert_eq!(stale.status, StatusCode::CONFLICT);
    assert_eq!(error_code(&stale), "CONFLICT");

    let header_wins = send(
        &app,
        with_if_match(
            json_request("PUT", &uri, &json!({"name": "Beta", "version": 1})),
            "\"2\"",
        ),
    )
    .await;
    assert_eq!(header_wins.status, StatusCode::OK);

    let body_version = send(&app, json_request("PUT", &uri, &json!({"state": "scheduled", "version": 3}))).await;
    assert_eq!(body_version.body["data"]["version"], 4);

    let detail = send(&app, get(&uri)).await;
    assert_eq!(detail.body["data"]["name"], "Beta");
    assert_eq!(detail.body["data"]["manager_id"], Value::Null);

    let invalid = send(
        &app,
        with_if_match(json_request("PUT", &uri, &json!({"name": ""})), "\"4\""),
    )
    .await;
    assert_eq!(error_code(&invalid), "VALIDATION_ERROR");

    let missing = send(&app, json_request("PUT", "/api/sites/SITE-NOPE", &json!({}))).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn assignment_lifecycle() {
    let app = app().await;
    let site = create_site(&app, "Alpha").await;
    let manager = create_manager(&app, "Kim").await;
    let cert = create_certificate(&app, "Lee").await;
    let assign_uri = format!("/api/sites/{site}/assign");

    let no_params = send(&app, json_request("POST", &assign_uri, &json!({"manager_id": manager}))).await;
    assert_eq!(error_code(&no_params), "MISSING_PARAMS");

    let ghost = send(
        &app,
        json_request("POST", &assign_uri, &json!({"manager_id": "PRS-GHOST", "certificate_id": cert})),
    )
    .await;
    assert_eq!(ghost.status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&ghost), "MANAGER_NOT_FOUND");

    let assigned = send(
        &app,
        json_request(
            "POST",
            &assign_uri,
            &json!({"manager_id": manager, "certificate_id": cert, "version": 1}),
        ),
    )
    .await;
    assert_eq!(assigned.status, StatusCode::OK, "{}", assigned.body);
    assert_eq!(assigned.body["data"]["version"], 2);
    assert_eq!(assigned.etag.as_deref(), Some("\"2\""));

    let other_site = create_site(&app, "Bravo").await;
    let taken = send(
        &app,
        json_request(
            "POST",
            &format!("/api/sites/{other_site}/assign"),
            &json!({"manager_id": manager, "certificate_id": cert}),
        ),
    )
    .await;
    assert_eq!(error_code(&taken), "CERTIFICATE_NOT_AVAILABLE");

    let detail = send(&app, get(&format!("/api/sites/{site}"))).await;
    assert_eq!(detail.body["data"]["manager"]["name"], "Kim");
    assert_eq!(detail.body["data"]["certificate"]["owner"], "Lee");

    let person = send(&app, get(&format!("/api/personnel/{manager}"))).await;
    assert_eq!(person.body["data"]["status"], "deployed");

    let unassign_uri = format!("/api/sites/{site}/unassign");
    let stale = send(&app, with_if_match(json_request("POST", &unassign_uri, &json!({})), "\"1\"")).await;
    assert_eq!(stale.status, StatusCode::CONFLICT);

    let released = send(&app, Request::post(&unassign_uri).body(Body::empty()).unwrap()).await;
    assert_eq!(released.status, StatusCode::OK, "{}", released.body);
    assert_eq!(released.body["data"]["version"], 3);

    let again = send(&app, Request::post(&unassign_uri).body(Body::empty()).unwrap()).await;
    assert_eq!(error_code(&again), "NOT_ASSIGNED");

    let certs = send(&app, get("/api/certificates?available=true")).await;
    assert_eq!(certs.body["count"], 1);

    let stats = send(&app, get("/api/stats")).await;
    assert_eq!(stats.body["data"]["sites"]["total"], 2);
    assert_eq!(stats.body["data"]["personnel"]["available"], 1);
}

#[tokio::test]
async fn personnel_and_certificate_updates() {
    let app = app().await;
    let manager = create_manager(&app, "Park").await;
    let updated = send(
        &app,
        json_request("PUT", &format!("/api/personnel/{manager}"), &json!({"status": "on_leave"})),
    )
    .await;
    assert_eq!(updated.body["data"]["status"], "on_leave");

    let listed = send(&app, get("/api/personnel?status=on_leave")).await;
    assert_eq!(listed.body["count"], 1);

    let missing = send(&app, get("/api/personnel/PRS-NOPE")).await;
    assert_eq!(error_code(&missing), "PERSONNEL_NOT_FOUND");

    let cert_missing = send(
        &app,
        json_request("POST", "/api/certificates", &json!({"name": "License"})),
    )
    .await;
    assert_eq!(error_code(&cert_missing), "MISSING_FIELD");

    let cert = create_certificate(&app, "Choi").await;
    let expired = send(
        &app,
        json_request("PUT", &format!("/api/certificates/{cert}"), &json!({"status": "expired"})),
    )
    .await;
    assert_eq!(expired.body["data"]["status"], "expired");
    let unknown = send(&app, get("/api/certificates/CERT-NOPE")).await;
    assert_eq!(error_code(&unknown), "CERTIFICATE_NOT_FOUND");
}

#[tokio::test]
async fn required_version_is_enforced() {
    let app = app_with(Settings {
        require_version: true,
        ..Settings::default()
    })
    .await;
    let id = create_site(&app, "Alpha").await;

    let missing = send(&app, json_request("PUT", &format!("/api/sites/{id}"), &json!({"notes": "x"}))).await;
    assert_eq!(missing.status, StatusCode::PRECONDITION_REQUIRED);
    assert_eq!(error_code(&missing), "PRECONDITION_REQUIRED");

    let wildcard = send(
        &app,
        with_if_match(json_request("PUT", &format!("/api/sites/{id}"), &json!({"notes": "x"})), "*"),
    )
    .await;
    assert_eq!(wildcard.status, StatusCode::OK);
}

#[tokio::test]
async fn api_key_guards_everything_but_health() {
    let app = app_with(Settings {
        api_key: "s3cret".into(),
        ..Settings::default()
    })
    .await;

    assert_eq!(send(&app, get("/api/health")).await.status, StatusCode::OK);

    let denied = send(&app, get("/api/sites")).await;
    assert_eq!(denied.status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&denied), "UNAUTHORIZED");

    let with_key = Request::get("/api/sites")
        .header("x-api-key", "s3cret")
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&app, with_key).await.status, StatusCode::OK);

    let bearer = Request::get("/api/stats")
        .header(header::AUTHORIZATION, "Bearer s3cret")
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&app, bearer).await.status, StatusCode::OK);
}

#[tokio::test]
async fn unavailable_backend_answers_503() {
    let app = router(AppState::new(
        Backend::Unavailable {
            reason: "supabase is not configured".into(),
        },
        Settings::default(),
    ));
    let reply = send(&app, get("/api/sites")).await;
    assert_eq!(reply.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(error_code(&reply), "CONFIG_REQUIRED");
}

#[tokio::test]
async fn cors_exposes_etag() {
    let app = app().await;
    let req = Request::get("/api/health")
        .header(header::ORIGIN, "http://localhost:8000")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let headers = resp.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let exposed = headers[header::ACCESS_CONTROL_EXPOSE_HEADERS].to_str().unwrap();
    assert!(exposed.contains("etag"), "{exposed}");
}
