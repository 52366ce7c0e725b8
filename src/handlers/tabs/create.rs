// handlers/tabs/create.rs - POST /api/tabs handler

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::app::AppState;
use crate::error::ApiError;

use super::tab_body;

/**
 * POST /api/tabs - Store a new tab document
 *
 * Missing ids on the tab, its groups and their notes are generated;
 * ids the client already sent are kept.
 *
 * Response (201):
 * ```json
 * { "id": "<uuid>", "message": "Tab created successfully" }
 * ```
 */
pub async fn tab_create(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let tab = tab_body(body)?;
    let id = state.tabs.create(tab).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": id.to_string(),
            "message": "Tab created successfully",
        })),
    ))
}
