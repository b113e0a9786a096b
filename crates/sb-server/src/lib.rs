//! # sb-server
//!
//! JSON API for the Siteboard dashboard: site, personnel and certificate
//! CRUD, assignment, and dashboard statistics.
//!
//! Site mutations are version-guarded. `GET /api/sites/{id}` returns the
//! current version as a strong `ETag`; `PUT`, `assign` and `unassign` accept
//! it back through `If-Match` (or a body `version`) and answer 409 when the
//! site has moved on.

pub mod auth;
pub mod error;
mod routes;
pub mod state;
pub mod store;
pub mod version;

use std::future::Future;
use std::time::Duration;

use axum::Router;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, ETAG, IF_MATCH};
use axum::http::{HeaderName, HeaderValue, Method};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use sb_config::SiteboardConfig;

pub use error::AppError;
pub use routes::SERVICE_NAME;
pub use state::{AppState, Settings};
pub use store::{Backend, StoreError};

/// The complete application: routes, CORS and request tracing.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.settings.allowed_origins);
    routes::routes(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origin = if allowed_origins.is_empty() || allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| {
                HeaderValue::from_str(o.trim())
                    .inspect_err(|_| tracing::warn!(origin = %o, "ignoring invalid CORS origin"))
                    .ok()
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([
            CONTENT_TYPE,
            AUTHORIZATION,
            IF_MATCH,
            HeaderName::from_static(auth::API_KEY_HEADER),
        ])
        .expose_headers([ETAG])
        .max_age(Duration::from_secs(60 * 60))
}

/// Serve on an already-bound listener until `shutdown` resolves.
///
/// # Errors
///
/// Returns the I/O error that stopped the server.
pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    state: AppState,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Bind `server.host:server.port`, open the configured store and serve until
/// Ctrl-C or SIGTERM.
///
/// # Errors
///
/// Returns an I/O error if the address cannot be bound.
pub async fn start_server(config: &SiteboardConfig) -> std::io::Result<()> {
    let state = AppState::from_config(config).await;
    let address = config.server.bind_addr();
    let listener = TcpListener::bind(&address).await?;
    tracing::info!(
        %address,
        backend = state.store.name(),
        auth = config.server.requires_api_key(),
        "siteboard API listening"
    );

    serve_with_shutdown(listener, state, shutdown_signal()).await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
        tracing::info!("received Ctrl-C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                tracing::info!("received SIGTERM, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "cannot install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
