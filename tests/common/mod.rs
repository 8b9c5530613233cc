#![allow(dead_code)]

pub mod mock_google;

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, StatusCode},
};
use linkpage::db::{SITE_DATA_DOC, SqliteStore};
use linkpage::service::ImageUploader;
use linkpage::types::upload::{UploadResult, UploadedImage};
use linkpage::{LinkpageError, LinkpageState, linkpage_router};
use serde_json::Value;
use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
    time::{SystemTime, UNIX_EPOCH},
};

/// Records uploads and answers with a predictable file id.
#[derive(Default)]
pub struct FakeUploader {
    pub calls: Mutex<Vec<(String, String, usize)>>,
    pub fail: bool,
}

#[async_trait]
impl ImageUploader for FakeUploader {
    async fn upload(
        &self,
        file_name: &str,
        image: UploadedImage,
    ) -> Result<UploadResult, LinkpageError> {
        self.calls.lock().unwrap().push((
            file_name.to_string(),
            image.mime_type.clone(),
            image.bytes.len(),
        ));
        if self.fail {
            return Err(LinkpageError::UpstreamStatus(StatusCode::FORBIDDEN));
        }
        let n = self.calls.lock().unwrap().len();
        Ok(UploadResult::for_file(format!("drive-file-{n}")))
    }
}

pub struct TestApp {
    pub app: Router,
    pub uploader: Arc<FakeUploader>,
    db_path: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_path);
    }
}

pub async fn spawn_app(uploader: FakeUploader) -> TestApp {
    let uploader = Arc::new(uploader);
    let (app, db_path) = build_app(uploader.clone()).await;
    TestApp {
        app,
        uploader,
        db_path,
    }
}

/// The app wired to a real uploader; `TestApp::uploader` then records nothing.
pub async fn spawn_app_with(uploader: Arc<dyn ImageUploader>) -> TestApp {
    let (app, db_path) = build_app(uploader).await;
    TestApp {
        app,
        uploader: Arc::new(FakeUploader::default()),
        db_path,
    }
}

async fn build_app(uploader: Arc<dyn ImageUploader>) -> (Router, PathBuf) {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut db_path = std::env::temp_dir();
    db_path.push(format!(
        "linkpage-test-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));

    let database_url = format!("sqlite:{}", db_path.display());
    let store = SqliteStore::connect(&database_url, SITE_DATA_DOC)
        .await
        .expect("failed to open sqlite store");

    let state = LinkpageState::new(Arc::new(store), uploader);
    (linkpage_router(state), db_path)
}

pub async fn json_body(resp: Response<Body>) -> Value {
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&body).expect("response body was not JSON")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("failed to build request")
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

pub const BOUNDARY: &str = "----linkpage-test-boundary";

/// One file part per `(field, content type, bytes)`.
pub fn multipart_body(parts: &[(&str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (field, content_type, bytes) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"{field}.bin\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn post_multipart(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("failed to build request")
}
