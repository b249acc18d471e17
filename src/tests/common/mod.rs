// tests/common/mod.rs
pub use axum::Router;
pub use serde_json::json;
pub use tokio::task::JoinHandle;

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{RawQuery, State};
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::Json;
use serde_json::Value;

use crate::cache::{MemoryTokenCache, TokenCache};
use crate::catalogue::CatalogueClient;
use crate::config::settings::{CacheConfig, HttpConfig};
use crate::dispatch::RequestDispatcher;
use crate::auth::TokenProvider;
use crate::models::Credentials;

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

/// Address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

pub fn test_http_config() -> HttpConfig {
    HttpConfig {
        timeout: 5,
        retry_times: 1,
        retry_delay: 10,
    }
}

pub fn cache_config(ttl: u64) -> CacheConfig {
    CacheConfig {
        enabled: true,
        ttl,
        key: "catalogue_access_token".to_owned(),
    }
}

pub fn credentials() -> Credentials {
    Credentials::new("k1", "c1")
}

/// Client against `base_url` plus a handle on its cache for assertions.
pub fn build_client(base_url: &str, cache_cfg: CacheConfig) -> (CatalogueClient, Arc<MemoryTokenCache>) {
    let cache = Arc::new(MemoryTokenCache::new());
    let dispatcher = Arc::new(RequestDispatcher::new(base_url, &test_http_config()).expect("dispatcher"));
    let store: Arc<dyn TokenCache> = cache.clone();
    let tokens = Arc::new(TokenProvider::new(dispatcher.clone(), store, credentials(), cache_cfg));
    (CatalogueClient::new(dispatcher, tokens), cache)
}

/// In-process stand-in for the catalogue API that records what it receives.
#[derive(Clone)]
pub struct StubUpstream {
    pub sign_ins: Arc<AtomicUsize>,
    pub business_calls: Arc<AtomicUsize>,
    pub sign_in_response: Arc<Mutex<Value>>,
    pub sign_in_bodies: Arc<Mutex<Vec<Value>>>,
    pub auth_headers: Arc<Mutex<Vec<String>>>,
    pub pull_bodies: Arc<Mutex<Vec<Value>>>,
    pub queries: Arc<Mutex<Vec<String>>>,
}

impl StubUpstream {
    pub fn new(sign_in_response: Value) -> Self {
        Self {
            sign_ins: Arc::new(AtomicUsize::new(0)),
            business_calls: Arc::new(AtomicUsize::new(0)),
            sign_in_response: Arc::new(Mutex::new(sign_in_response)),
            sign_in_bodies: Arc::new(Mutex::new(Vec::new())),
            auth_headers: Arc::new(Mutex::new(Vec::new())),
            pull_bodies: Arc::new(Mutex::new(Vec::new())),
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn issuing(token: &str) -> Self {
        Self::new(json!({"success": true, "data": {"accessToken": token, "expiresIn": 3600}}))
    }

    pub fn sign_in_count(&self) -> usize {
        self.sign_ins.load(Ordering::SeqCst)
    }

    pub fn business_count(&self) -> usize {
        self.business_calls.load(Ordering::SeqCst)
    }

    pub fn set_sign_in_response(&self, response: Value) {
        *self.sign_in_response.lock().unwrap() = response;
    }

    pub fn auth_headers(&self) -> Vec<String> {
        self.auth_headers.lock().unwrap().clone()
    }

    pub async fn spawn(&self) -> (JoinHandle<()>, String) {
        let router = Router::new()
            .route("/account/external-sign-in", post(stub_sign_in))
            .route("/catalogue-adapter/view", get(stub_view))
            .route("/catalogue-adapter/pull", post(stub_pull))
            .route("/catalogue-adapter/customer-log", get(stub_customer_log))
            .with_state(self.clone());
        let (handle, addr) = spawn_axum(router).await;
        (handle, format!("http://{}", addr))
    }

    fn record_auth(&self, headers: &HeaderMap) {
        self.business_calls.fetch_add(1, Ordering::SeqCst);
        let value = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        self.auth_headers.lock().unwrap().push(value);
    }
}

async fn stub_sign_in(State(up): State<StubUpstream>, Json(body): Json<Value>) -> Json<Value> {
    up.sign_ins.fetch_add(1, Ordering::SeqCst);
    up.sign_in_bodies.lock().unwrap().push(body);
    let response = up.sign_in_response.lock().unwrap().clone();
    Json(response)
}

async fn stub_view(State(up): State<StubUpstream>, headers: HeaderMap) -> Json<Value> {
    up.record_auth(&headers);
    Json(json!({
        "success": true,
        "data": {"vouchers": [{"id": "V1", "name": "Gift 10"}, {"id": "V2", "name": "Gift 25"}]},
        "sourceProvider": "catalogue-api"
    }))
}

async fn stub_pull(
    State(up): State<StubUpstream>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    up.record_auth(&headers);
    up.pull_bodies.lock().unwrap().push(body);
    Json(json!({"success": true, "data": {"codes": ["AAA-111"]}}))
}

async fn stub_customer_log(
    State(up): State<StubUpstream>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Json<Value> {
    up.record_auth(&headers);
    up.queries.lock().unwrap().push(query.unwrap_or_default());
    Json(json!({"success": true, "data": {"items": [], "total": 0}}))
}
