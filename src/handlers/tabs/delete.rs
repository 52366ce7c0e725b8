// handlers/tabs/delete.rs - DELETE /api/tabs/:id handler

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;

use super::tab_id;

pub async fn tab_delete(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = tab_id(path)?;
    state.tabs.delete_by_id(&id).await?;
    Ok(Json(json!({ "message": "Tab deleted successfully" })))
}
