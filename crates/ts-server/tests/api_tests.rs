//! Integration tests for the HTTP API
//!
//! These tests verify:
//! - Stored timetables are served by date
//! - Malformed and missing dates map to 400 / 404
//! - Force downloads talk to the (mocked) portal
//! - Item echo and health endpoints
//! - Shutdown stops the listener and bounds the connection drain

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    routing::get as get_route,
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::AsyncWriteExt;
use tower::ServiceExt; // for `oneshot`
use ts_ingest::{Crawler, CrawlerConfig};
use ts_server::{config::Config, create_router, AppState};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

const LISTING_PATH: &str = "/list";
const RESOURCE: &str =
    "/tra-ods-web/ods/download/dataResource/exceptionDataResource/0123456789abcdef0123456789abcdef";

fn create_test_app(folder: &Path, portal: Option<&MockServer>) -> Router {
    let mut crawler_config = CrawlerConfig::default().with_db_folder(folder);
    if let Some(portal) = portal {
        crawler_config.listing_url = format!("{}{}", portal.uri(), LISTING_PATH);
        crawler_config.source_base_url = portal.uri();
    }

    let crawler = Arc::new(Crawler::new(crawler_config).unwrap());
    create_router(AppState::new(crawler), &Config::default())
}

async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
    (status, headers, body)
}

fn json(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}

async fn mount_portal(server: &MockServer, date: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<html><body><a href="{}">{}.json</a></body></html>"#,
            RESOURCE, date
        )))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(RESOURCE))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_get_json_serves_stored_file() {
    let dir = TempDir::new().unwrap();
    let content = r#"{"TrainInfos":[]}"#;
    std::fs::write(dir.path().join("20250318.json"), content).unwrap();

    let (status, headers, body) = get(create_test_app(dir.path(), None), "/json/20250318").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    assert!(headers.contains_key(header::ETAG));
    assert_eq!(body, content.as_bytes());
}

#[tokio::test]
async fn test_get_json_not_modified_with_matching_etag() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("20250318.json"), r#"{"TrainInfos":[]}"#).unwrap();
    let app = create_test_app(dir.path(), None);

    let (_, headers, _) = get(app.clone(), "/json/20250318").await;
    let etag = headers[header::ETAG].to_str().unwrap().to_string();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/json/20250318")
                .header(header::IF_NONE_MATCH, etag)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
}

#[tokio::test]
async fn test_get_json_missing_file() {
    let dir = TempDir::new().unwrap();

    let (status, _, body) = get(create_test_app(dir.path(), None), "/json/20250318").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json(&body)["error"], "File for date 20250318 not found");
}

#[tokio::test]
async fn test_get_json_rejects_malformed_date() {
    let dir = TempDir::new().unwrap();

    for uri in ["/json/2025-03-18", "/json/..%2Fsecret", "/json/20251340"] {
        let (status, _, body) = get(create_test_app(dir.path(), None), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(json(&body)["error"].as_str().unwrap().contains("YYYYMMDD"));
    }
}

#[tokio::test]
async fn test_force_download_single_date() {
    let portal = MockServer::start().await;
    mount_portal(&portal, "20250318", r#"{"TrainInfos":[]}"#).await;
    let dir = TempDir::new().unwrap();

    let (status, _, body) = get(
        create_test_app(dir.path(), Some(&portal)),
        "/force-download?file_date=20250318",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body["message"], "Force download completed for date 20250318");
    assert_eq!(body["outcome"], "saved");
    assert!(dir.path().join("20250318.json").exists());
}

#[tokio::test]
async fn test_force_download_unlisted_date() {
    let portal = MockServer::start().await;
    mount_portal(&portal, "20250318", r#"{"TrainInfos":[]}"#).await;
    let dir = TempDir::new().unwrap();

    let (status, _, _) = get(
        create_test_app(dir.path(), Some(&portal)),
        "/force-download?file_date=20250401",
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_force_download_all() {
    let portal = MockServer::start().await;
    mount_portal(&portal, "20250318", r#"{"TrainInfos":[]}"#).await;
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("20250318.json"), r#"{"TrainInfos":[]}"#).unwrap();

    let (status, _, body) =
        get(create_test_app(dir.path(), Some(&portal)), "/force-download").await;

    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body["message"], "Force download completed for all files");
    // Forced downloads rewrite even identical files
    assert_eq!(body["saved"], serde_json::json!(["20250318"]));
}

#[tokio::test]
async fn test_force_download_portal_unavailable() {
    let portal = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&portal)
        .await;
    let dir = TempDir::new().unwrap();

    let (status, _, body) =
        get(create_test_app(dir.path(), Some(&portal)), "/force-download").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(json(&body)["error"].as_str().unwrap().contains("503"));
}

#[tokio::test]
async fn test_read_item() {
    let dir = TempDir::new().unwrap();

    let (status, _, body) = get(create_test_app(dir.path(), None), "/items/5?q=taipei").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body), serde_json::json!({ "item_id": 5, "q": "taipei" }));

    let (status, _, body) = get(create_test_app(dir.path(), None), "/items/7").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body), serde_json::json!({ "item_id": 7, "q": null }));

    let (status, _, _) = get(create_test_app(dir.path(), None), "/items/seven").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_counts_stored_files() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("20250318.json"), "{}").unwrap();
    std::fs::write(dir.path().join("20250319.json"), "{}").unwrap();

    let (status, _, body) = get(create_test_app(dir.path(), None), "/health").await;

    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["stored_files"], 2);
}

#[tokio::test]
async fn test_health_without_storage_folder() {
    let dir = TempDir::new().unwrap();

    let (status, _, body) = get(create_test_app(&dir.path().join("missing"), None), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["stored_files"], 0);
}

#[tokio::test]
async fn test_health_skips_non_timetable_files() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("20250318.json"), "{}").unwrap();
    std::fs::write(dir.path().join(".20250319.json.1.0.tmp"), "{").unwrap();
    std::fs::write(dir.path().join("notes.json"), "{}").unwrap();

    let (_, _, body) = get(create_test_app(dir.path(), None), "/health").await;

    assert_eq!(json(&body)["stored_files"], 1);
}

#[tokio::test]
async fn test_health_reports_unreadable_storage() {
    let dir = TempDir::new().unwrap();
    let not_a_folder = dir.path().join("20250318.json");
    std::fs::write(&not_a_folder, "{}").unwrap();

    let (status, _, body) = get(create_test_app(&not_a_folder, None), "/health").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json(&body)["error"].as_str().unwrap().contains("Storage folder unavailable"));
}

#[tokio::test]
async fn test_serve_stops_on_signal() {
    let dir = TempDir::new().unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(ts_server::serve(
        listener,
        create_test_app(dir.path(), None),
        async {
            let _ = stop_rx.await;
        },
        Duration::from_secs(30),
    ));
    stop_tx.send(()).unwrap();

    let finished = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server kept running after the shutdown signal");
    assert!(finished.unwrap().is_ok());
    assert!(tokio::net::TcpStream::connect(addr).await.is_err());
}

#[tokio::test]
async fn test_serve_drops_requests_that_outlive_drain_timeout() {
    let app = Router::new().route("/hang", get_route(|| std::future::pending::<&'static str>()));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(ts_server::serve(
        listener,
        app,
        async {
            let _ = stop_rx.await;
        },
        Duration::from_millis(200),
    ));

    let mut client = tokio::net::TcpStream::connect(addr).await.unwrap();
    client
        .write_all(b"GET /hang HTTP/1.1\r\nHost: localhost\r\n\r\n")
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    stop_tx.send(()).unwrap();

    let finished = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("drain was not bounded by the timeout");
    assert!(finished.unwrap().is_ok());
}
