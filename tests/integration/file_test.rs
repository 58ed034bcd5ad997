//! Integration tests for uploading, listing, and downloading files.

mod helpers;

use filevault_core::config::AppConfig;
use filevault_database::FileVersionStore;
use helpers::{Part, TestApp};
use http::StatusCode;

#[tokio::test]
async fn test_create_returns_created_version() {
    let app = TestApp::new().await;

    let response = app.create("report.pdf", "application/pdf", b"%PDF-1.7").await;

    assert_eq!(response.status, StatusCode::CREATED);
    let body = response.json();
    assert_eq!(body["id"], 1);
    assert_eq!(body["version"], 1);
    assert_eq!(body["file_name"], "report.pdf");
    assert_eq!(body["content_type"], "application/pdf");
    assert_eq!(body["size_bytes"], 8);
    assert!(body.get("content").is_none());

    let file_id = response.file_id();
    assert_eq!(
        response.header("location"),
        Some(format!("/api/files/{file_id}/1").as_str())
    );
}

#[tokio::test]
async fn test_download_by_row_id() {
    let app = TestApp::new().await;
    app.create("notes.txt", "text/plain", b"hello vault").await;

    let response = app.request("GET", "/api/files/1").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.bytes, b"hello vault");
    assert_eq!(response.header("content-type"), Some("text/plain"));
    assert_eq!(
        response.header("content-disposition"),
        Some("attachment; filename=\"notes.txt\"")
    );
}

#[tokio::test]
async fn test_download_without_content_type_is_octet_stream() {
    let app = TestApp::new().await;
    app.upload("POST", "/api/files", &[Part::file("blob", &[0, 1, 2])])
        .await;

    let response = app.request("GET", "/api/files/1").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.bytes, vec![0, 1, 2]);
    assert_eq!(
        response.header("content-type"),
        Some("application/octet-stream")
    );
}

#[tokio::test]
async fn test_empty_file_is_accepted() {
    let app = TestApp::new().await;

    let response = app.create("empty.bin", "application/octet-stream", b"").await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.json()["size_bytes"], 0);
}

#[tokio::test]
async fn test_create_without_file_part_is_bad_request() {
    let app = TestApp::new().await;

    let response = app
        .upload("POST", "/api/files", &[Part::text("comment", "no file here")])
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "VALIDATION_ERROR");
    assert!(app.store.list_all(None, &Default::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_with_two_file_parts_is_bad_request() {
    let app = TestApp::new().await;

    let response = app
        .upload(
            "POST",
            "/api/files",
            &[Part::file("a.txt", b"a"), Part::file("b.txt", b"b")],
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(app.store.list_all(None, &Default::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_text_fields_beside_the_file_are_ignored() {
    let app = TestApp::new().await;

    let response = app
        .upload(
            "POST",
            "/api/files",
            &[Part::text("comment", "first draft"), Part::file("a.txt", b"a")],
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_list_files_with_and_without_filter() {
    let app = TestApp::new().await;
    let first = app.create("a.txt", "text/plain", b"a").await.file_id();
    app.create("b.txt", "text/plain", b"b").await;

    let all = app.request("GET", "/api/files").await;
    assert_eq!(all.status, StatusCode::OK);
    let all = all.json();
    let ids: Vec<i64> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2]);

    let filtered = app
        .request("GET", &format!("/api/files?file_id={first}"))
        .await
        .json();
    assert_eq!(filtered.as_array().unwrap().len(), 1);
    assert_eq!(filtered[0]["file_id"], first.as_str());
}

#[tokio::test]
async fn test_list_with_nil_file_id_is_unfiltered() {
    let app = TestApp::new().await;
    app.create("a.txt", "text/plain", b"a").await;
    app.create("b.txt", "text/plain", b"b").await;

    let response = app
        .request(
            "GET",
            "/api/files?file_id=00000000-0000-0000-0000-000000000000",
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json().as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_unknown_row_id_is_not_found() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/files/999").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json()["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_malformed_row_id_is_bad_request() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/files/not-a-number").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_by_row_id() {
    let app = TestApp::new().await;
    app.create("a.txt", "text/plain", b"a").await;

    assert_eq!(app.request("DELETE", "/api/files/1").await.status, StatusCode::OK);
    assert_eq!(
        app.request("DELETE", "/api/files/1").await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        app.request("GET", "/api/files/1").await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_oversized_upload_is_rejected() {
    let mut config = AppConfig::default();
    config.server.max_upload_size_bytes = 64;
    let app = TestApp::with_config(config).await;

    let response = app.create("big.bin", "application/octet-stream", &[7; 4096]).await;

    assert!(response.status.is_client_error());
    assert!(app.store.list_all(None, &Default::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/health").await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["backend"], "memory");
}

#[tokio::test]
async fn test_requests_during_shutdown_are_unavailable() {
    let app = TestApp::shutting_down().await;

    let response = app.request("GET", "/api/files").await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.json()["error"], "CANCELLED");
}

#[tokio::test]
async fn test_sqlite_backend_round_trip() {
    let app = TestApp::with_sqlite().await;

    let created = app.create("db.txt", "text/plain", b"persisted").await;
    assert_eq!(created.status, StatusCode::CREATED);

    let response = app.request("GET", "/api/files/1").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.bytes, b"persisted");

    let health = app.request("GET", "/api/health").await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.json()["backend"], "sqlite");
}
