//! Viewer request handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::warn;

use super::page::render_status_page;
use crate::storage::StatusStore;
use crate::types::StatusView;

/// Shared viewer state: where to read the snapshot from.
#[derive(Clone, Debug)]
pub struct ViewerState {
    pub store: StatusStore,
}

impl ViewerState {
    pub const fn new(store: StatusStore) -> Self {
        Self { store }
    }

    /// Current snapshot; an absent or unreadable file is `None`.
    fn snapshot(&self) -> Option<StatusView> {
        match self.store.load_view() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "Status snapshot unreadable, showing no data");
                None
            }
        }
    }
}

/// GET / - HTML status page
pub async fn index(State(state): State<ViewerState>) -> Html<String> {
    Html(render_status_page(state.snapshot().as_ref()))
}

/// GET /api/v1/status - current snapshot as JSON
pub async fn get_status(State(state): State<ViewerState>) -> Response {
    match state.snapshot() {
        Some(snapshot) => Json(snapshot).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "no status data available" })),
        )
            .into_response(),
    }
}

/// GET /health - liveness probe
pub async fn health_check() -> &'static str {
    "OK"
}
