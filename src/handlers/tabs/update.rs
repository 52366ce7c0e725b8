// handlers/tabs/update.rs - PUT /api/tabs/:id handler

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection},
        Path, State,
    },
    Json,
};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;

use super::{tab_body, tab_id};

/// Replace the whole document. The path id overrides any `_id` in the
/// body, and nested groups or notes sent without ids stay without ids.
pub async fn tab_update(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = tab_id(path)?;
    let tab = tab_body(body)?;

    state.tabs.replace(&id, tab).await?;

    Ok(Json(json!({ "message": "Tab updated successfully" })))
}
