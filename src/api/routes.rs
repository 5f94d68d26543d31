//! Viewer route definitions

use axum::{routing::get, Router};

use super::handlers::{self, ViewerState};

/// JSON endpoints, nested under `/api/v1`
pub fn api_routes(state: ViewerState) -> Router {
    Router::new()
        .route("/status", get(handlers::get_status))
        .with_state(state)
}

/// HTML page and the root-level health probe
pub fn page_routes(state: ViewerState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health_check))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StatusStore;
    use crate::types::{StatusSnapshot, StatusTag};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::NaiveDate;
    use tempfile::{tempdir, TempDir};
    use tower::ServiceExt;

    fn create_test_state(snapshot: Option<StatusSnapshot>) -> (TempDir, ViewerState) {
        let dir = tempdir().unwrap();
        let store = StatusStore::new(dir.path().join("status.json"));
        if let Some(snapshot) = snapshot {
            store.save(&snapshot).unwrap();
        }
        (dir, ViewerState::new(store))
    }

    fn sample() -> StatusSnapshot {
        let now = NaiveDate::from_ymd_opt(2025, 8, 16)
            .unwrap()
            .and_hms_opt(15, 5, 0)
            .unwrap();
        StatusSnapshot::new(StatusTag::Ok, now, Some(5.0), Some(3))
    }

    #[tokio::test]
    async fn test_status_route_serves_snapshot() {
        let (_dir, state) = create_test_state(Some(sample()));
        let response = api_routes(state)
            .oneshot(Request::builder().uri("/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_status_route_missing_snapshot_is_404() {
        let (_dir, state) = create_test_state(None);
        let response = api_routes(state)
            .oneshot(Request::builder().uri("/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health_route() {
        let (_dir, state) = create_test_state(None);
        let response = page_routes(state)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
