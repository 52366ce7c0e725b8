// handlers/tabs/list.rs - GET /api/tabs handler

use axum::{extract::State, Json};

use crate::app::AppState;
use crate::database::models::Tab;
use crate::error::ApiError;

/// Every stored tab in insertion order; an empty collection is `[]`.
pub async fn tab_list(State(state): State<AppState>) -> Result<Json<Vec<Tab>>, ApiError> {
    let tabs = state.tabs.list_all().await?;
    Ok(Json(tabs))
}
