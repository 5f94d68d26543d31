//! Status viewer API tests
//!
//! Exercise the full router (`create_app`) against snapshots written by a
//! real watchdog pass, plus the missing, corrupt and unrecognised snapshot
//! cases.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{NaiveDate, NaiveDateTime};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

use heartbeat_watchdog::acquisition::StaticLogSource;
use heartbeat_watchdog::api::{create_app, ViewerState};
use heartbeat_watchdog::config::WatchdogConfig;
use heartbeat_watchdog::control::StaticControl;
use heartbeat_watchdog::storage::StatusStore;
use heartbeat_watchdog::Watchdog;

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 8, 16)
        .unwrap()
        .and_hms_opt(15, 5, 0)
        .unwrap()
}

fn setup() -> (TempDir, WatchdogConfig, Router) {
    let dir = tempdir().unwrap();
    let mut config = WatchdogConfig::default();
    config.storage.status_file = dir.path().join("status.json");
    config.storage.restart_timestamp_file = dir.path().join("last_restart.timestamp");
    let app = create_app(ViewerState::new(StatusStore::new(&config.storage.status_file)));
    (dir, config, app)
}

async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn viewer_shows_latest_pass() {
    let (_dir, config, app) = setup();
    let watchdog = Watchdog::from_config(
        &config,
        Arc::new(StaticLogSource::new([
            "datum_gateway[781961]: 2025-08-16 15:00:00.000 [main] INFO: Server stats: 1 clients / 14.36 Th/s",
        ])),
        Arc::new(StaticControl::succeeding()),
    );
    watchdog.run_once(now()).await;

    let (status, body) = get(app.clone(), "/api/v1/status").await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "WARNING");
    assert_eq!(json["clients"], 1);
    assert_eq!(json["heartbeat_age_minutes"], 5.0);
    assert_eq!(json["timestamp"], "2025-08-16 15:05:00");

    let (status, html) = get(app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"<span class="warn">WARNING</span>"#));
    assert!(html.contains("5.0 minutes ago"));
}

#[tokio::test]
async fn missing_snapshot_is_no_data() {
    let (_dir, _config, app) = setup();

    let (status, body) = get(app.clone(), "/api/v1/status").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["error"], "no status data available");

    let (status, html) = get(app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("No status data available."));
}

#[tokio::test]
async fn corrupt_snapshot_is_no_data() {
    let (_dir, config, app) = setup();
    std::fs::write(&config.storage.status_file, "{ not json").unwrap();

    let (status, _) = get(app.clone(), "/api/v1/status").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, html) = get(app, "/").await;
    assert!(html.contains("No status data available."));
}

#[tokio::test]
async fn unrecognised_status_renders_as_failure() {
    let (_dir, config, app) = setup();
    std::fs::write(
        &config.storage.status_file,
        r#"{"status": "DEGRADED", "timestamp": "2025-08-16 15:05:00", "clients": 2}"#,
    )
    .unwrap();

    let (status, body) = get(app.clone(), "/api/v1/status").await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "DEGRADED");
    assert_eq!(json["clients"], 2);

    let (status, html) = get(app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"<span class="fail">DEGRADED</span>"#));
    assert!(html.contains("Clients Connected:</span> 2"));
    assert!(!html.contains("No status data available."));
}

#[tokio::test]
async fn viewer_never_writes() {
    let (_dir, config, app) = setup();
    get(app.clone(), "/").await;
    get(app, "/api/v1/status").await;
    assert!(!config.storage.status_file.exists());
}

#[tokio::test]
async fn index_is_html_and_health_is_ok() {
    let (_dir, _config, app) = setup();

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));

    let (status, body) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}
