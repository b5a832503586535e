//! Relay endpoint: fetch the upstream report server-side and pass its bytes
//! on untouched, so browsers blocked by CORS can still read it.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use quake_backend::module::acquisition::ReportSource;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Sent when upstream names no content type; consumers then apply their
/// own charset fallback
const DEFAULT_CONTENT_TYPE: &str = "text/plain";

pub struct RelayState {
    pub source: Arc<dyn ReportSource>,
    pub timeout: Duration,
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn relay_report(State(state): State<Arc<RelayState>>) -> Response {
    let result = match tokio::time::timeout(state.timeout, state.source.fetch_raw()).await {
        Ok(result) => result.map_err(|e| e.to_string()),
        Err(_) => Err(format!("upstream timed out after {}s", state.timeout.as_secs())),
    };

    match result {
        Ok(raw) => {
            info!("Relayed {} bytes from {}", raw.body.len(), state.source.endpoint());
            let content_type = raw
                .content_type
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
            (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], raw.body).into_response()
        }
        Err(message) => {
            error!("Upstream fetch from {} failed: {}", state.source.endpoint(), message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": message })),
            )
                .into_response()
        }
    }
}

pub fn router(route: &str, state: Arc<RelayState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route(route, get(relay_report))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
