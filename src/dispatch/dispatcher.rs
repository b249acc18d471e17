use http::header::{ACCEPT, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error};

use crate::config::settings::HttpConfig;
use crate::dispatch::request::RequestSpec;
use crate::errors::CatalogueError;
use crate::helpers::time::get_instant;
use crate::models::ApiResponse;
use crate::observability::metrics::get_metrics;
use crate::resilience::retry::RetrySettings;

/// Sends `RequestSpec`s to the catalogue API and normalizes the outcome.
#[derive(Debug, Clone)]
pub struct RequestDispatcher {
    base_url: String,
    client: Client,
    retry: RetrySettings,
}

impl RequestDispatcher {
    pub fn new(base_url: &str, http: &HttpConfig) -> Result<Self, CatalogueError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(http.timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| CatalogueError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self::with_client(base_url, client, RetrySettings::from(http)))
    }

    pub fn with_client(base_url: &str, client: Client, retry: RetrySettings) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            client,
            retry,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Decoded JSON body, retrying transport faults per the retry settings.
    pub async fn execute(&self, spec: &RequestSpec) -> Result<Value, CatalogueError> {
        let metrics = get_metrics().await;
        let start = get_instant();
        metrics
            .dispatch_requests
            .with_label_values(&[spec.operation, spec.method.as_str()])
            .inc();

        let result = self
            .retry
            .run_with_retry(|| self.execute_once(spec), CatalogueError::is_retryable)
            .await;

        metrics
            .dispatch_duration
            .with_label_values(&[spec.operation])
            .observe(start.elapsed().as_secs_f64());

        if let Err(err) = &result {
            let reason = match err {
                CatalogueError::Transport { status: Some(_), .. } => "status",
                CatalogueError::Transport { .. } => "transport",
                CatalogueError::Decode { .. } => "decode",
                _ => "other",
            };
            metrics
                .dispatch_failures
                .with_label_values(&[spec.operation, reason])
                .inc();
        }
        result
    }

    async fn execute_once(&self, spec: &RequestSpec) -> Result<Value, CatalogueError> {
        let url = self.url(&spec.path);
        debug!("{} {} ({})", spec.method, url, spec.operation);

        let mut request = self.client.request(spec.method.clone(), &url);
        for (key, value) in &spec.headers {
            request = request.header(key, value);
        }
        if !spec.query.is_empty() {
            request = request.query(&spec.query);
        }
        if let Some(body) = &spec.body {
            request = request.json(body);
        }

        let response = request.send().await?.error_for_status()?;
        let body = response.bytes().await?;
        if body.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&body)?)
    }

    /// Never fails: every fault becomes an error envelope carrying `spec.error_code`.
    pub async fn send(&self, spec: &RequestSpec) -> ApiResponse {
        match self.execute(spec).await {
            Ok(body) => ApiResponse::from_json(&body),
            Err(err) => {
                error!("{} failed: {}", spec.operation, err);
                ApiResponse::error(err.to_string(), spec.error_code)
            }
        }
    }
}
