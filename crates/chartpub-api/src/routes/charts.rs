//! # Chart Upload Route
//!
//! The request body is the raw packaged chart; the target filename comes
//! from the path.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::state::AppState;

pub async fn upload(
    State(state): State<AppState>,
    Path((repo, filename)): Path<(String, String)>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), AppError> {
    state
        .publisher()
        .publish(&repo, &filename, body.as_ref())
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "saved": true }))))
}
