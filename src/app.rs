use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::database::{TabRepository, TabStore};
use crate::handlers::{self, tabs};
use crate::middleware::cors_middleware;

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub tabs: TabRepository,
}

impl AppState {
    pub fn new(tabs: TabRepository) -> Self {
        Self { tabs }
    }

    pub fn from_store(store: Arc<dyn TabStore>) -> Self {
        Self::new(TabRepository::new(store))
    }
}

/// Largest tab document accepted by POST and PUT. Larger bodies get a JSON 413.
pub const MAX_TAB_BODY_BYTES: usize = 32 * 1024 * 1024;

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .merge(tab_routes())
        .with_state(state)
        // Global middleware; CORS outermost so OPTIONS skips tracing and handlers
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(cors_middleware))
                .layer(TraceLayer::new_for_http()),
        )
}

fn tab_routes() -> Router<AppState> {
    Router::new()
        .route("/api/tabs", get(tabs::tab_list).post(tabs::tab_create))
        .route(
            "/api/tabs/",
            get(tabs::tab_missing_id)
                .put(tabs::tab_missing_id)
                .delete(tabs::tab_missing_id),
        )
        .route(
            "/api/tabs/:id",
            get(tabs::tab_show)
                .put(tabs::tab_update)
                .delete(tabs::tab_delete),
        )
        .layer(DefaultBodyLimit::max(MAX_TAB_BODY_BYTES))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::database::MemoryTabStore;

    async fn post_tabs(body: Vec<u8>) -> (StatusCode, Value) {
        let router = app(AppState::from_store(Arc::new(MemoryTabStore::new())));
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/tabs")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn body_over_the_limit_is_a_json_413() {
        let (status, body) = post_tabs(vec![b' '; MAX_TAB_BODY_BYTES + 1]).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body, json!({ "error": "Request body too large" }));
    }

    #[tokio::test]
    async fn body_at_the_limit_is_parsed() {
        // Whitespace-padded object exactly at the limit
        let mut raw = b"{}".to_vec();
        raw.resize(MAX_TAB_BODY_BYTES, b' ');
        let (status, body) = post_tabs(raw).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Tab created successfully");
    }
}
