// handlers/tabs/show.rs - GET /api/tabs/:id handler

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};

use crate::app::AppState;
use crate::database::models::Tab;
use crate::error::ApiError;

use super::tab_id;

pub async fn tab_show(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Tab>, ApiError> {
    let id = tab_id(path)?;
    let tab = state.tabs.get_by_id(&id).await?;
    Ok(Json(tab))
}
