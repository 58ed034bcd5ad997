//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use filevault_api::AppState;
use filevault_core::config::AppConfig;
use filevault_database::migration::run_migrations;
use filevault_database::{DatabasePool, FileVersionRepository, FileVersionStore, MemoryFileVersionStore};

const BOUNDARY: &str = "filevault-test-boundary";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Record store behind the router
    pub store: Arc<dyn FileVersionStore>,
    /// Server shutdown token
    pub shutdown: CancellationToken,
}

impl TestApp {
    /// App over an in-memory store with default configuration
    pub async fn new() -> Self {
        Self::with_config(AppConfig::default()).await
    }

    /// App over an in-memory store
    pub async fn with_config(config: AppConfig) -> Self {
        Self::build(config, Arc::new(MemoryFileVersionStore::new()), CancellationToken::new())
    }

    /// App over a migrated in-memory SQLite database
    pub async fn with_sqlite() -> Self {
        let pool = DatabasePool::in_memory()
            .await
            .expect("Failed to open SQLite");
        run_migrations(pool.pool())
            .await
            .expect("Failed to run migrations");

        Self::build(
            AppConfig::default(),
            Arc::new(FileVersionRepository::new(pool.into_pool())),
            CancellationToken::new(),
        )
    }

    /// App whose server is already shutting down
    pub async fn shutting_down() -> Self {
        let shutdown = CancellationToken::new();
        shutdown.cancel();
        Self::build(
            AppConfig::default(),
            Arc::new(MemoryFileVersionStore::new()),
            shutdown,
        )
    }

    fn build(config: AppConfig, store: Arc<dyn FileVersionStore>, shutdown: CancellationToken) -> Self {
        let state = AppState::new(config, Arc::clone(&store), shutdown.clone());
        Self {
            router: filevault_api::build_app(state),
            store,
            shutdown,
        }
    }

    /// Make a bodiless HTTP request to the test app
    pub async fn request(&self, method: &str, path: &str) -> TestResponse {
        let req = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Send a multipart request built from `parts`
    pub async fn upload(&self, method: &str, path: &str, parts: &[Part]) -> TestResponse {
        let req = Request::builder()
            .method(method)
            .uri(path)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(parts)))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Upload a single file part with `POST /api/files`
    pub async fn create(&self, file_name: &str, content_type: &str, data: &[u8]) -> TestResponse {
        self.upload(
            "POST",
            "/api/files",
            &[Part::file(file_name, data).with_content_type(content_type)],
        )
        .await
    }

    /// Upload a single file part with `PUT /api/files/{file_id}`
    pub async fn update(&self, file_id: &str, part: Part) -> TestResponse {
        self.upload("PUT", &format!("/api/files/{file_id}"), &[part])
            .await
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");

        TestResponse {
            status,
            headers,
            bytes: bytes.to_vec(),
        }
    }
}

/// Captured response
#[derive(Debug)]
pub struct TestResponse {
    /// Status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Raw body
    pub bytes: Vec<u8>,
}

impl TestResponse {
    /// Body parsed as JSON
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.bytes).expect("Response body is not JSON")
    }

    /// A header as a string
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// `file_id` of a created-version response
    pub fn file_id(&self) -> String {
        self.json()["file_id"]
            .as_str()
            .expect("No file_id in response")
            .to_string()
    }
}

/// One multipart form part
#[derive(Debug, Clone)]
pub struct Part {
    name: String,
    file_name: Option<String>,
    content_type: Option<String>,
    data: Vec<u8>,
}

impl Part {
    /// A file part named `file`
    pub fn file(file_name: &str, data: &[u8]) -> Self {
        Self {
            name: "file".to_string(),
            file_name: Some(file_name.to_string()),
            content_type: None,
            data: data.to_vec(),
        }
    }

    /// A plain form field
    pub fn text(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            file_name: None,
            content_type: None,
            data: value.as_bytes().to_vec(),
        }
    }

    /// Set the part's content type
    pub fn with_content_type(mut self, content_type: &str) -> Self {
        self.content_type = Some(content_type.to_string());
        self
    }
}

fn multipart_body(parts: &[Part]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        let mut disposition = format!("Content-Disposition: form-data; name=\"{}\"", part.name);
        if let Some(file_name) = &part.file_name {
            disposition.push_str(&format!("; filename=\"{file_name}\""));
        }
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(b"\r\n");
        if let Some(content_type) = &part.content_type {
            body.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(&part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}
