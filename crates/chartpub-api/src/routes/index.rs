//! Repository index route.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;

use crate::error::AppError;
use crate::state::AppState;

pub const INDEX_CONTENT_TYPE: &str = "application/x-yaml";

pub async fn get_index(
    State(state): State<AppState>,
    Path(repo): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let index = state.publisher().get_index(&repo).await?;
    let body = index
        .to_yaml()
        .map_err(|e| AppError::Internal(format!("encode index failed: {e}")))?;
    Ok(([(header::CONTENT_TYPE, INDEX_CONTENT_TYPE)], body))
}
