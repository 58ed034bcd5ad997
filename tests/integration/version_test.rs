//! Integration tests for version chains: update, latest, and per-version delete.

mod helpers;

use filevault_core::config::{AppConfig, MetadataPolicy};
use helpers::{Part, TestApp};
use http::StatusCode;

#[tokio::test]
async fn test_update_delete_walkthrough() {
    let app = TestApp::new().await;

    let created = app.create("a.txt", "text/plain", b"").await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.json()["id"], 1);
    let file_id = created.file_id();

    let updated = app
        .update(&file_id, Part::file("a.txt", &[1, 2, 3]))
        .await;
    assert_eq!(updated.status, StatusCode::CREATED);
    let body = updated.json();
    assert_eq!(body["id"], 2);
    assert_eq!(body["version"], 2);
    assert_eq!(body["file_id"], file_id.as_str());
    assert_eq!(
        updated.header("location"),
        Some(format!("/api/files/{file_id}/2").as_str())
    );

    let latest = app.request("GET", &format!("/api/files/{file_id}/latest")).await;
    assert_eq!(latest.status, StatusCode::OK);
    assert_eq!(latest.bytes, vec![1, 2, 3]);

    let deleted = app.request("DELETE", &format!("/api/files/{file_id}/2")).await;
    assert_eq!(deleted.status, StatusCode::OK);

    let latest = app.request("GET", &format!("/api/files/{file_id}/latest")).await;
    assert_eq!(latest.status, StatusCode::OK);
    assert!(latest.bytes.is_empty());
}

#[tokio::test]
async fn test_previous_versions_stay_downloadable() {
    let app = TestApp::new().await;
    let file_id = app.create("doc.md", "text/markdown", b"draft").await.file_id();
    app.update(&file_id, Part::file("doc.md", b"final")).await;

    let v1 = app.request("GET", &format!("/api/files/{file_id}/1")).await;
    let v2 = app.request("GET", &format!("/api/files/{file_id}/2")).await;

    assert_eq!(v1.bytes, b"draft");
    assert_eq!(v2.bytes, b"final");
    assert_eq!(
        app.request("GET", &format!("/api/files/{file_id}/3")).await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_update_unknown_file_is_not_found() {
    let app = TestApp::new().await;

    let response = app
        .update(
            "7f1c8a52-3d1e-4c1b-9a0e-2f9d8c7b6a51",
            Part::file("x.txt", b"x"),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(
        app.request("GET", "/api/files").await.json().as_array().unwrap().len(),
        0
    );
}

#[tokio::test]
async fn test_update_with_malformed_id_is_bad_request() {
    let app = TestApp::new().await;

    let response = app.update("not-a-uuid", Part::file("x.txt", b"x")).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_without_file_part_is_bad_request() {
    let app = TestApp::new().await;
    let file_id = app.create("a.txt", "text/plain", b"a").await.file_id();

    let response = app
        .upload(
            "PUT",
            &format!("/api/files/{file_id}"),
            &[Part::text("note", "x")],
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_latest_of_unknown_file_is_not_found() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "GET",
            "/api/files/7f1c8a52-3d1e-4c1b-9a0e-2f9d8c7b6a51/latest",
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_missing_version_is_not_found() {
    let app = TestApp::new().await;
    let file_id = app.create("a.txt", "text/plain", b"a").await.file_id();

    let response = app.request("DELETE", &format!("/api/files/{file_id}/5")).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(
        app.request("GET", &format!("/api/files/{file_id}/latest")).await.status,
        StatusCode::OK
    );
}

#[tokio::test]
async fn test_next_version_follows_highest_after_gap() {
    let app = TestApp::new().await;
    let file_id = app.create("a", "text/plain", b"1").await.file_id();
    app.update(&file_id, Part::file("a", b"2")).await;
    app.update(&file_id, Part::file("a", b"3")).await;
    app.request("DELETE", &format!("/api/files/{file_id}/2")).await;

    let response = app.update(&file_id, Part::file("a", b"4")).await;

    assert_eq!(response.json()["version"], 4);
}

#[tokio::test]
async fn test_deleting_every_version_empties_the_chain() {
    let app = TestApp::new().await;
    let file_id = app.create("a", "text/plain", b"1").await.file_id();

    app.request("DELETE", &format!("/api/files/{file_id}/1")).await;

    assert_eq!(
        app.request("GET", &format!("/api/files/{file_id}/latest")).await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        app.update(&file_id, Part::file("a", b"2")).await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_update_overwrites_omitted_metadata_by_default() {
    let app = TestApp::new().await;
    let file_id = app.create("a.txt", "text/plain", b"a").await.file_id();

    let response = app.update(&file_id, Part::file("b.txt", b"b")).await;

    let body = response.json();
    assert_eq!(body["file_name"], "b.txt");
    assert_eq!(body["content_type"], "");
}

#[tokio::test]
async fn test_update_inherits_omitted_metadata_when_configured() {
    let mut config = AppConfig::default();
    config.versioning.metadata_policy = MetadataPolicy::Inherit;
    let app = TestApp::with_config(config).await;
    let file_id = app.create("a.txt", "text/plain", b"a").await.file_id();

    let response = app.update(&file_id, Part::file("b.txt", b"b")).await;

    let body = response.json();
    assert_eq!(body["file_name"], "b.txt");
    assert_eq!(body["content_type"], "text/plain");
    assert_eq!(body["size_bytes"], 1);
}

#[tokio::test]
async fn test_sqlite_version_chain() {
    let app = TestApp::with_sqlite().await;
    let file_id = app.create("a.txt", "text/plain", b"one").await.file_id();
    app.update(&file_id, Part::file("a.txt", b"two")).await;

    let latest = app.request("GET", &format!("/api/files/{file_id}/latest")).await;
    assert_eq!(latest.bytes, b"two");

    app.request("DELETE", &format!("/api/files/{file_id}/2")).await;
    let latest = app.request("GET", &format!("/api/files/{file_id}/latest")).await;
    assert_eq!(latest.bytes, b"one");

    let listed = app
        .request("GET", &format!("/api/files?file_id={file_id}"))
        .await
        .json();
    assert_eq!(listed.as_array().unwrap().len(), 1);
}
