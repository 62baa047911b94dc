//! # Route Modules
//!
//! Each module defines the handlers for one API surface area. [`router`]
//! assembles them into the application.

pub mod charts;
pub mod index;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the complete router.
pub fn router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.max_chart_bytes());
    Router::new()
        .route("/health", get(health))
        .route("/api/repositories", get(repositories))
        .route(
            "/api/{repo}/charts/{filename}",
            post(charts::upload).layer(upload_limit),
        )
        .route("/{repo}/index.yaml", get(index::get_index))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn repositories(State(state): State<AppState>) -> Json<Value> {
    let repositories: Vec<Value> = state
        .publisher()
        .repositories()
        .map(|r| {
            serde_json::json!({
                "name": r.name,
                "bucket": r.bucket,
                "directory": r.directory,
            })
        })
        .collect();
    Json(Value::Array(repositories))
}
