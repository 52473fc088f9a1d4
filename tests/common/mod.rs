//! Shared helpers: a recording mock upstream and request plumbing for the gateway router.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap, Method, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use storefront_relay::media::MediaUploader;
use storefront_relay::{app, AppError, AppState, Config};
use tokio::net::TcpListener;
use tower::ServiceExt;

pub const TOKEN: &str = "test-token-123";
pub const BASE_PATH: &str = "/api/fec2/hr-rpp";

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Bytes,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

struct MockState {
    status: StatusCode,
    body: &'static str,
    requests: Mutex<Vec<Recorded>>,
}

pub struct MockUpstream {
    pub addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockUpstream {
    pub fn base_url(&self) -> String {
        format!("http://{}{}", self.addr, BASE_PATH)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    /// The single request the upstream saw.
    pub fn only_request(&self) -> Recorded {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one upstream call");
        requests[0].clone()
    }
}

async fn record(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.requests.lock().unwrap().push(Recorded {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });

    let content_type = if serde_json::from_str::<Value>(state.body).is_ok() {
        "application/json"
    } else {
        "text/plain"
    };
    (
        state.status,
        [(header::CONTENT_TYPE, content_type)],
        state.body,
    )
        .into_response()
}

/// Start an upstream that answers every request with `status` and `body`.
pub async fn start_upstream(status: StatusCode, body: &'static str) -> MockUpstream {
    let state = Arc::new(MockState {
        status,
        body,
        requests: Mutex::new(Vec::new()),
    });
    let router = Router::new().fallback(record).with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    MockUpstream { addr, state }
}

/// A base URL nothing listens on.
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}{}", addr, BASE_PATH)
}

/// Uploader that echoes payloads back, failing on `fail_on`. Payloads starting with
/// `slow` finish last.
pub struct FakeUploader {
    pub fail_on: Option<&'static str>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeUploader {
    pub fn new(fail_on: Option<&'static str>) -> Arc<Self> {
        Arc::new(Self {
            fail_on,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaUploader for FakeUploader {
    async fn upload(&self, image: &str) -> storefront_relay::Result<Value> {
        self.calls.lock().unwrap().push(image.to_string());
        if image.starts_with("slow") {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        if self.fail_on == Some(image) {
            return Err(AppError::Media("upload rejected".to_string()));
        }
        Ok(json!({ "public_id": image, "resource_type": "image" }))
    }
}

pub fn config(base_url: &str) -> Config {
    Config::new(TOKEN, base_url)
}

pub fn gateway_with(config: Config, media: Arc<dyn MediaUploader>) -> Router {
    let state = AppState::with_media(config, media).unwrap();
    app(Arc::new(state))
}

pub fn gateway(base_url: &str) -> Router {
    gateway_with(config(base_url), FakeUploader::new(None))
}

pub async fn send(
    router: Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Bytes) {
    match body {
        Some(value) => {
            let json = value.to_string();
            send_raw(router, method, uri, Some("application/json"), json).await
        }
        None => send_raw(router, method, uri, None, Bytes::new()).await,
    }
}

/// Like `send`, with an explicit content type and an unchecked body.
pub async fn send_raw(
    router: Router,
    method: Method,
    uri: &str,
    content_type: Option<&str>,
    body: impl Into<Body>,
) -> (StatusCode, Bytes) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        request = request.header(header::CONTENT_TYPE, content_type);
    }

    let response = router
        .oneshot(request.body(body.into()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes)
}

pub fn as_json(bytes: &Bytes) -> Value {
    serde_json::from_slice(bytes).unwrap()
}
