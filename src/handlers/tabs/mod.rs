// handlers/tabs/mod.rs - Tab document endpoints under /api/tabs
//
// Each handler validates its input, makes exactly one repository call and
// maps the outcome to a response. Error bodies are always {"error": "..."}.

use axum::{
    body::Bytes,
    extract::rejection::{BytesRejection, PathRejection},
    extract::Path,
    http::StatusCode,
};
use serde_json::Value;
use tracing::warn;

use crate::database::models::{parse_tab_id, Tab};
use crate::error::ApiError;

pub mod create; // POST   /api/tabs
pub mod delete; // DELETE /api/tabs/:id
pub mod list; //   GET    /api/tabs
pub mod show; //   GET    /api/tabs/:id
pub mod update; // PUT    /api/tabs/:id

pub use create::tab_create;
pub use delete::tab_delete;
pub use list::tab_list;
pub use show::tab_show;
pub use update::tab_update;

/// Validate the `:id` path segment before any repository call.
pub(crate) fn tab_id(path: Result<Path<String>, PathRejection>) -> Result<String, ApiError> {
    let id = match path {
        Ok(Path(id)) => id,
        Err(rejection) => {
            warn!(error = %rejection, "invalid tab ID");
            return Err(ApiError::missing_tab_id());
        }
    };

    if id.trim().is_empty() {
        warn!("invalid tab ID");
        return Err(ApiError::missing_tab_id());
    }
    if parse_tab_id(&id).is_none() {
        warn!(tab_id = %id, "invalid tab ID format");
        return Err(ApiError::invalid_tab_id());
    }
    Ok(id)
}

/// Decode a request body as a tab. Content-Type is not enforced, but the
/// body must be a JSON object; serde would otherwise bind an array to the
/// struct by position.
pub(crate) fn tab_body(body: Result<Bytes, BytesRejection>) -> Result<Tab, ApiError> {
    let body = body.map_err(|rejection| {
        warn!(error = %rejection, "failed to read request body");
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::body_too_large()
        } else {
            ApiError::invalid_body()
        }
    })?;

    let value: Value = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "failed to bind request body");
        ApiError::invalid_body()
    })?;
    if !value.is_object() {
        warn!("request body is not a JSON object");
        return Err(ApiError::invalid_body());
    }

    serde_json::from_value(value).map_err(|e| {
        warn!(error = %e, "failed to bind request body");
        ApiError::invalid_body()
    })
}

/// `/api/tabs/` with no id segment.
pub async fn tab_missing_id() -> ApiError {
    warn!("invalid tab ID");
    ApiError::missing_tab_id()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn accepts_well_formed_ids() {
        let id = Uuid::new_v4().to_string();
        assert_eq!(tab_id(Ok(Path(id.clone()))), Ok(id));
    }

    #[test]
    fn distinguishes_missing_from_malformed() {
        assert_eq!(tab_id(Ok(Path(" ".into()))), Err(ApiError::missing_tab_id()));
        assert_eq!(
            tab_id(Ok(Path("507f1f77bcf86cd799439011".into()))),
            Err(ApiError::invalid_tab_id())
        );
    }

    fn body(raw: &'static [u8]) -> Result<Tab, ApiError> {
        tab_body(Ok(Bytes::from_static(raw)))
    }

    #[test]
    fn rejects_bodies_that_are_not_tabs() {
        assert_eq!(body(br#"{"tempo": "fast"}"#), Err(ApiError::invalid_body()));
        assert_eq!(body(b""), Err(ApiError::invalid_body()));
        assert_eq!(body(b"{"), Err(ApiError::invalid_body()));
        assert!(body(b"{}").is_ok());
    }

    #[test]
    fn rejects_bodies_that_are_not_objects() {
        let bodies: [&'static [u8]; 5] = [b"[]", b"[null, [], 140, 2]", b"null", b"140", br#""tab""#];
        for raw in bodies {
            assert_eq!(
                body(raw),
                Err(ApiError::invalid_body()),
                "{}",
                String::from_utf8_lossy(raw)
            );
        }
    }

    #[test]
    fn empty_group_back_reference_is_dropped() {
        let tab = body(br#"{"groups": [{"notes": [[{"fret": "3", "tabGroupId": ""}]]}]}"#).unwrap();
        assert_eq!(tab.groups[0].notes[0][0].tab_group_id, None);
    }
}
