//! JSON API consumed by the map/table front end.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::module::scheduled::FeedPoller;

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Latest feed, or 503 before the first cycle has completed
async fn latest_feed(State(poller): State<Arc<FeedPoller>>) -> Response {
    match poller.latest().await {
        Some(feed) => Json(feed).into_response(),
        None => error_response(StatusCode::SERVICE_UNAVAILABLE, "no earthquake data fetched yet"),
    }
}

/// Poller state plus a summary of the stored feed, for loading indicators
async fn status(State(poller): State<Arc<FeedPoller>>) -> Json<serde_json::Value> {
    let feed = poller.latest().await;
    let max_magnitude = feed.as_ref().and_then(|f| {
        f.records
            .iter()
            .filter_map(|r| r.max_magnitude())
            .reduce(f64::max)
    });
    Json(serde_json::json!({
        "state": poller.state(),
        "source": feed.as_ref().map(|f| f.source),
        "fetchedAt": feed.as_ref().map(|f| f.fetched_at),
        "records": feed.as_ref().map_or(0, |f| f.records.len()),
        "sample": feed.as_ref().is_some_and(|f| f.is_sample()),
        "maxMagnitude": max_magnitude,
    }))
}

/// Run a cycle now; 409 if one is already running
async fn refresh(State(poller): State<Arc<FeedPoller>>) -> Response {
    match poller.refresh().await {
        Some(feed) => Json(feed).into_response(),
        None => error_response(StatusCode::CONFLICT, "refresh already in progress"),
    }
}

pub fn router(poller: Arc<FeedPoller>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/earthquakes", get(latest_feed))
        .route("/api/status", get(status))
        .route("/api/refresh", post(refresh))
        .with_state(poller)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
