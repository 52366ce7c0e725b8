// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::database::RepositoryError;

/// HTTP API error; the body is always `{"error": "<message>"}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    // 400 Bad Request: malformed body or path identifier
    BadRequest(String),

    // 404 Not Found
    NotFound(String),

    // 413 Payload Too Large: body over the tab route limit
    PayloadTooLarge(String),

    // 500 Internal Server Error: store failures, message passed through
    InternalServerError(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::PayloadTooLarge(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
        }
    }

    pub fn to_json(&self) -> Value {
        json!({ "error": self.message() })
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn invalid_body() -> Self {
        ApiError::bad_request("Invalid request body")
    }

    pub fn body_too_large() -> Self {
        ApiError::PayloadTooLarge("Request body too large".to_string())
    }

    pub fn missing_tab_id() -> Self {
        ApiError::bad_request("Invalid tab ID")
    }

    pub fn invalid_tab_id() -> Self {
        ApiError::bad_request("Invalid tab ID format")
    }

    pub fn tab_not_found() -> Self {
        ApiError::not_found("Tab not found")
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::InvalidIdentifier(id) => {
                tracing::warn!(tab_id = %id, "invalid tab ID format");
                ApiError::invalid_tab_id()
            }
            RepositoryError::NotFound(id) => {
                tracing::warn!(tab_id = %id, "tab not found");
                ApiError::tab_not_found()
            }
            RepositoryError::Persistence(msg) => {
                tracing::error!(error = %msg, "document store operation failed");
                ApiError::internal_server_error(msg)
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn repository_errors_map_to_status_codes() {
        let cases = [
            (RepositoryError::InvalidIdentifier("x".into()), StatusCode::BAD_REQUEST),
            (RepositoryError::NotFound(Uuid::new_v4()), StatusCode::NOT_FOUND),
            (
                RepositoryError::Persistence("connection reset".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status_code(), status);
        }
    }

    #[test]
    fn persistence_message_is_passed_through() {
        let err = ApiError::from(RepositoryError::Persistence("write conflict".into()));
        assert_eq!(err.to_json(), json!({ "error": "write conflict" }));
    }

    #[test]
    fn oversized_body_is_a_json_413() {
        let err = ApiError::body_too_large();
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(err.to_json(), json!({ "error": "Request body too large" }));
    }

    #[test]
    fn body_carries_only_error_field() {
        let body = ApiError::tab_not_found().to_json();
        let object = body.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert_eq!(object["error"], "Tab not found");
    }
}
