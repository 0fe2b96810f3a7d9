use super::*;

use std::collections::HashSet;

use async_trait::async_trait;
use axum::{body, body::Body, http::Request};
use shared::protocol::{DEFAULT_SIGN_BUCKET, DEFAULT_SIGN_EXPIRES_IN_SECS};
use tokio::sync::Mutex as AsyncMutex;
use tower::ServiceExt;

struct MockObjectStore {
    fail_paths: HashSet<String>,
    calls: AsyncMutex<Vec<(String, String, u64)>>,
}

impl MockObjectStore {
    fn ok() -> Arc<Self> {
        Arc::new(Self {
            fail_paths: HashSet::new(),
            calls: AsyncMutex::new(Vec::new()),
        })
    }

    fn failing_on(path: &str) -> Arc<Self> {
        let mut fail_paths = HashSet::new();
        fail_paths.insert(path.to_string());
        Arc::new(Self {
            fail_paths,
            calls: AsyncMutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn create_signed_url(
        &self,
        bucket: &str,
        path: &str,
        expires_in: u64,
    ) -> anyhow::Result<String> {
        self.calls
            .lock()
            .await
            .push((bucket.to_string(), path.to_string(), expires_in));
        if self.fail_paths.contains(path) {
            anyhow::bail!("object not found");
        }
        Ok(format!("https://storage.example/sign/{bucket}/{path}?token=tok"))
    }
}

fn test_app(store: Arc<MockObjectStore>) -> Router {
    build_router(Arc::new(AppState {
        store,
        default_bucket: DEFAULT_SIGN_BUCKET.to_string(),
        default_expiry_secs: DEFAULT_SIGN_EXPIRES_IN_SECS,
    }))
}

fn sign_request(body: serde_json::Value) -> Request<Body> {
    Request::post(sign_batch_route())
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

#[tokio::test]
async fn healthz_reports_ok() {
    let app = test_app(MockObjectStore::ok());
    let request = Request::get("/healthz")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(body.as_ref(), b"ok");
}

#[tokio::test]
async fn signs_every_path_with_defaults() {
    let store = MockObjectStore::ok();
    let app = test_app(store.clone());

    let request = sign_request(serde_json::json!({
        "paths": ["u1/2024-05-invoice.pdf", "u1/move-in-protocol.pdf"],
    }));
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let parsed: SignBatchResponse = serde_json::from_slice(&body).expect("json");
    assert_eq!(parsed.results.len(), 2);
    assert_eq!(parsed.results[0].path, "u1/2024-05-invoice.pdf");
    assert!(parsed.results[0].url.is_some());
    assert!(parsed.results[0].error.is_none());
    assert!(parsed.results[1].url.is_some());

    let calls = store.calls.lock().await;
    assert_eq!(calls.len(), 2);
    assert!(calls.contains(&(
        DEFAULT_SIGN_BUCKET.to_string(),
        "u1/2024-05-invoice.pdf".to_string(),
        DEFAULT_SIGN_EXPIRES_IN_SECS,
    )));
}

#[tokio::test]
async fn reports_per_path_failures_inline() {
    let store = MockObjectStore::failing_on("u1/missing.pdf");
    let app = test_app(store);

    let request = sign_request(serde_json::json!({
        "paths": ["u1/2024-05-invoice.pdf", "u1/missing.pdf"],
    }));
    let response = app.oneshot(request).await.expect("response");
    // Partial failure is still a successful batch.
    assert_eq!(response.status(), StatusCode::OK);

    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let parsed: SignBatchResponse = serde_json::from_slice(&body).expect("json");
    assert!(parsed.results[0].url.is_some());
    assert!(parsed.results[0].error.is_none());
    assert!(parsed.results[1].url.is_none());
    assert_eq!(parsed.results[1].error.as_deref(), Some("object not found"));
}

#[tokio::test]
async fn rejects_empty_paths() {
    let app = test_app(MockObjectStore::ok());
    let request = sign_request(serde_json::json!({ "paths": [] }));
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let err: ApiError = serde_json::from_slice(&body).expect("json");
    assert_eq!(err.code, ErrorCode::Validation);
}

#[tokio::test]
async fn rejects_missing_paths_field() {
    let app = test_app(MockObjectStore::ok());
    let request = sign_request(serde_json::json!({}));
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn honours_explicit_bucket_and_expiry() {
    let store = MockObjectStore::ok();
    let app = test_app(store.clone());

    let request = sign_request(serde_json::json!({
        "paths": ["contracts/lease.pdf"],
        "bucket": "leases",
        "expiresIn": 60,
    }));
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let calls = store.calls.lock().await;
    assert_eq!(
        calls.as_slice(),
        &[("leases".to_string(), "contracts/lease.pdf".to_string(), 60)]
    );
}

#[tokio::test]
async fn caps_request_body_size() {
    let app = test_app(MockObjectStore::ok());
    let oversized = "x".repeat(MAX_BODY_BYTES + 1);
    let request = Request::post(sign_batch_route())
        .header("content-type", "application/json")
        .body(Body::from(oversized))
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
