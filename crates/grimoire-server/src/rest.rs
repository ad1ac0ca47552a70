//! HTTP REST surface for the reference proxy.
//!
//! `GET /api/dnd?endpoint=<name>` resolves through the [`ReferenceFetcher`]
//! and always answers 200 unless the endpoint parameter is missing or
//! invalid.
//! `GET /health` reports the effective upstream configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::{HeaderName, HeaderValue, Method};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use grimoire::ReferenceFetcher;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::error::ApiError;

/// Names the upstream base URL that served a response, or `mock`.
pub const SOURCE_HEADER: &str = "x-grimoire-source";

/// Shared state handed to every handler.
pub struct AppState {
    pub fetcher: ReferenceFetcher,
}

impl AppState {
    pub fn new(fetcher: ReferenceFetcher) -> Arc<Self> {
        Arc::new(Self { fetcher })
    }
}

/// Build the axum Router with all endpoints.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/health", get(handle_health))
        .route("/api/dnd", get(handle_dnd))
        .layer(cors)
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl+C or SIGTERM.
pub async fn serve(addr: &str, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = router(state);

    let listener = TcpListener::bind(addr).await?;
    info!("REST API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal as unix_signal, SignalKind};
        match unix_signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

// ── Handlers ────────────────────────────────────────────────────

/// First `endpoint` value in the query string. Later repeats are ignored.
fn endpoint_param(params: &[(String, String)]) -> Option<&str> {
    params
        .iter()
        .find(|(key, _)| key == "endpoint")
        .map(|(_, value)| value.as_str())
}

async fn handle_dnd(
    Query(params): Query<Vec<(String, String)>>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let outcome = state.fetcher.fetch(endpoint_param(&params)).await?;
    let source = outcome.source().to_string();

    let mut response = Json(outcome.into_payload()).into_response();
    if let Ok(value) = HeaderValue::from_str(&source) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(SOURCE_HEADER), value);
    }
    Ok(response)
}

async fn handle_health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "upstreams": state.fetcher.upstreams(),
        "timeout_ms": state.fetcher.timeout_ms(),
    }))
}
