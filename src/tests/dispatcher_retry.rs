
// This test simulates:
//  - an upstream endpoint that fails with 5xx the first N times, succeeds later
//  - endpoints that fail with 4xx or answer success:false, which must not be retried
//  - 429s, slow handlers past the client timeout and closed ports, which are retried
// and asserts how many attempts reached the server.

#[cfg(test)]
mod test {

use std::sync::{atomic::{AtomicUsize, Ordering}, Arc};
use std::time::{Duration, Instant};

use axum::{routing::get, Json, Router};
use http::StatusCode;
use reqwest::Client;
use serde_json::json;

use crate::dispatch::{RequestDispatcher, RequestSpec};
use crate::errors::CatalogueError;
use crate::resilience::retry::RetrySettings;
use crate::tests::common::{closed_addr, spawn_axum};

fn dispatcher_with(base_url: &str, timeout: Duration, retry: RetrySettings) -> RequestDispatcher {
    let client = Client::builder().timeout(timeout).build().expect("reqwest client");
    RequestDispatcher::with_client(base_url, client, retry)
}

fn dispatcher(base_url: &str, attempts: u32) -> RequestDispatcher {
    dispatcher_with(base_url, Duration::from_secs(5), RetrySettings { attempts, delay_ms: 10 })
}

fn flaky_router(counter: Arc<AtomicUsize>, failures: usize, status: StatusCode) -> Router {
    Router::new().route("/catalogue-adapter/view", get(move || {
        let c = counter.clone();
        async move {
            let n = c.fetch_add(1, Ordering::SeqCst);
            if n < failures {
                (status, "transient".to_owned())
            } else {
                let body = json!({"success": true, "data": {"vouchers": []}}).to_string();
                (StatusCode::OK, body)
            }
        }
    }))
}

fn view_spec() -> RequestSpec {
    RequestSpec::get("/catalogue-adapter/view", "get_catalogue", "GET_CATALOGUE_ERROR")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn server_errors_are_retried_until_success() {
    let counter = Arc::new(AtomicUsize::new(0));
    let (h, addr) = spawn_axum(flaky_router(counter.clone(), 2, StatusCode::INTERNAL_SERVER_ERROR)).await;

    let response = dispatcher(&format!("http://{}", addr), 3).send(&view_spec()).await;

    assert!(response.success, "dispatch should succeed after retries");
    assert_eq!(response.data, Some(json!({"vouchers": []})));
    assert_eq!(counter.load(Ordering::SeqCst), 3, "server should have seen exactly 3 attempts");
    h.abort();
}

#[tokio::test]
async fn exhausted_retries_report_error_code() {
    let counter = Arc::new(AtomicUsize::new(0));
    let (h, addr) = spawn_axum(flaky_router(counter.clone(), usize::MAX, StatusCode::SERVICE_UNAVAILABLE)).await;

    let response = dispatcher(&format!("http://{}", addr), 2).send(&view_spec()).await;

    assert!(!response.success);
    assert_eq!(response.error_code(), Some("GET_CATALOGUE_ERROR"));
    assert!(response.error_message().unwrap().contains("503"));
    assert_eq!(counter.load(Ordering::SeqCst), 2);
    h.abort();
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let counter = Arc::new(AtomicUsize::new(0));
    let (h, addr) = spawn_axum(flaky_router(counter.clone(), usize::MAX, StatusCode::BAD_REQUEST)).await;

    let err = dispatcher(&format!("http://{}", addr), 5)
        .execute(&view_spec())
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogueError::Transport { status: Some(400), .. }));
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    h.abort();
}

#[tokio::test]
async fn business_failure_is_not_retried() {
    let counter = Arc::new(AtomicUsize::new(0));
    let c = counter.clone();
    let router = Router::new().route("/catalogue-adapter/view", get(move || {
        let c = c.clone();
        async move {
            c.fetch_add(1, Ordering::SeqCst);
            Json(json!({"success": false, "error": {"message": "no vouchers", "code": "EMPTY"}}))
        }
    }));
    let (h, addr) = spawn_axum(router).await;

    let response = dispatcher(&format!("http://{}", addr), 3).send(&view_spec()).await;

    assert!(!response.success);
    assert_eq!(response.error_code(), Some("EMPTY"));
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    h.abort();
}

#[tokio::test]
async fn too_many_requests_is_retried() {
    let counter = Arc::new(AtomicUsize::new(0));
    let (h, addr) = spawn_axum(flaky_router(counter.clone(), 1, StatusCode::TOO_MANY_REQUESTS)).await;

    let response = dispatcher(&format!("http://{}", addr), 3).send(&view_spec()).await;

    assert!(response.success);
    assert_eq!(counter.load(Ordering::SeqCst), 2);
    h.abort();
}

#[tokio::test]
async fn slow_upstream_times_out_and_is_retried() {
    let counter = Arc::new(AtomicUsize::new(0));
    let c = counter.clone();
    let router = Router::new().route("/catalogue-adapter/view", get(move || {
        let c = c.clone();
        async move {
            c.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(json!({"success": true, "data": {}}))
        }
    }));
    let (h, addr) = spawn_axum(router).await;

    let started = Instant::now();
    let response = dispatcher_with(
        &format!("http://{}", addr),
        Duration::from_millis(200),
        RetrySettings { attempts: 2, delay_ms: 10 },
    )
    .send(&view_spec())
    .await;

    assert!(!response.success);
    assert_eq!(response.error_code(), Some("GET_CATALOGUE_ERROR"));
    assert!(response.error_message().unwrap().contains("timed out"));
    assert_eq!(counter.load(Ordering::SeqCst), 2);
    assert!(started.elapsed() < Duration::from_secs(3), "timeout must bound each attempt");
    h.abort();
}

#[tokio::test]
async fn connection_refused_is_retried_with_backoff() {
    let base_url = format!("http://{}", closed_addr().await);
    let d = dispatcher_with(&base_url, Duration::from_secs(5), RetrySettings { attempts: 3, delay_ms: 100 });

    let started = Instant::now();
    let err = d.execute(&view_spec()).await.unwrap_err();

    assert!(matches!(err, CatalogueError::Transport { status: None, retryable: true, .. }));
    assert!(err.to_string().to_lowercase().contains("refused"), "cause missing: {err}");
    // two backoffs: 100ms then 200ms
    assert!(started.elapsed() >= Duration::from_millis(300));
}

#[tokio::test]
async fn base_url_and_path_are_joined_once() {
    let d = dispatcher("http://localhost:9000/api/v1/", 1);
    assert_eq!(d.url("/account/external-sign-in"), "http://localhost:9000/api/v1/account/external-sign-in");
    assert_eq!(d.base_url(), "http://localhost:9000/api/v1");
}

}
