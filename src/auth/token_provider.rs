use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::TokenCache;
use crate::config::settings::CacheConfig;
use crate::dispatch::{RequestDispatcher, RequestSpec};
use crate::errors::{CatalogueError, AUTH_ERROR_CODE, INVALID_TOKEN_RESPONSE_CODE};
use crate::helpers::time::{effective_ttl, now_i64};
use crate::models::{ApiResponse, Credentials, ExternalToken};
use crate::observability::metrics::get_metrics;
use crate::utils::constants::{EXTERNAL_SIGN_IN_ERROR, PATH_EXTERNAL_SIGN_IN};

const SIGN_IN_OPERATION: &str = "external_sign_in";

/// At most a quarter of the token (capped at 8 chars) plus its length, safe to log.
pub fn token_preview(token: &str) -> String {
    let len = token.chars().count();
    let head: String = token.chars().take((len / 4).min(8)).collect();
    format!("{head}...({len} chars)")
}

/// Owns sign-in and the cache-aside lookup of the current access token.
///
/// Concurrent callers on a cold cache may each sign in; the last write wins and
/// every token written is valid, so no lock guards the refresh path.
pub struct TokenProvider {
    dispatcher: Arc<RequestDispatcher>,
    cache: Arc<dyn TokenCache>,
    credentials: Credentials,
    settings: CacheConfig,
}

impl TokenProvider {
    pub fn new(
        dispatcher: Arc<RequestDispatcher>,
        cache: Arc<dyn TokenCache>,
        credentials: Credentials,
        settings: CacheConfig,
    ) -> Self {
        Self {
            dispatcher,
            cache,
            credentials,
            settings,
        }
    }

    /// Exchanges credentials for a token and stores it in the cache.
    ///
    /// A `success:false` envelope or a response without a token is an `Auth` error;
    /// transport and decode faults are returned as they are.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<ExternalToken, CatalogueError> {
        let metrics = get_metrics().await;
        metrics.sign_in_requests.inc();

        let spec = RequestSpec::post(PATH_EXTERNAL_SIGN_IN, SIGN_IN_OPERATION, EXTERNAL_SIGN_IN_ERROR)
            .json(serde_json::to_value(credentials)?);

        let body = self.dispatcher.execute(&spec).await.inspect_err(|e| {
            metrics.sign_in_failures.with_label_values(&["transport"]).inc();
            warn!("sign-in request for client '{}' failed: {}", credentials.client_id, e);
        })?;

        let envelope = ApiResponse::from_json(&body);
        if !envelope.success {
            metrics.sign_in_failures.with_label_values(&["rejected"]).inc();
            let (message, code) = envelope
                .error
                .map(|e| (e.message, e.code))
                .unwrap_or_else(|| ("sign-in rejected".to_owned(), AUTH_ERROR_CODE.to_owned()));
            warn!("sign-in rejected for client '{}': {} ({})", credentials.client_id, message, code);
            return Err(CatalogueError::auth(message, code));
        }

        let token = ExternalToken::from_data(envelope.data.as_ref().unwrap_or(&Value::Null));
        if token.access_token.is_empty() {
            metrics.sign_in_failures.with_label_values(&["malformed"]).inc();
            return Err(CatalogueError::auth(
                "malformed token response: access token missing",
                INVALID_TOKEN_RESPONSE_CODE,
            ));
        }

        info!(
            "signed in as client '{}', token {}",
            credentials.client_id,
            token_preview(&token.access_token)
        );
        self.store(&token).await;
        Ok(token)
    }

    /// Cached token if present, otherwise a fresh sign-in with the configured credentials.
    pub async fn ensure_valid_token(&self) -> Result<String, CatalogueError> {
        let metrics = get_metrics().await;

        if self.settings.enabled {
            if let Some(token) = self.cache.get(&self.settings.key).await.filter(|t| !t.is_empty()) {
                metrics.token_cache_hits.inc();
                debug!("token cache hit for key '{}'", self.settings.key);
                return Ok(token);
            }
            metrics.token_cache_misses.inc();
            debug!("token cache miss for key '{}'", self.settings.key);
        }

        let token = self.sign_in(&self.credentials).await.map_err(|err| match err {
            CatalogueError::Auth { .. } => err,
            other => CatalogueError::auth(
                format!("Failed to get access token: {other}"),
                EXTERNAL_SIGN_IN_ERROR,
            ),
        })?;
        Ok(token.access_token)
    }

    /// Forces the next `ensure_valid_token` to sign in again.
    pub async fn clear_token_cache(&self) {
        info!("clearing cached token '{}'", self.settings.key);
        self.cache.forget(&self.settings.key).await;
        get_metrics().await.token_expiry_unix.set(0);
    }

    async fn store(&self, token: &ExternalToken) {
        if !self.settings.enabled {
            return;
        }
        let ttl = effective_ttl(self.settings.ttl(), token.expires_in);
        self.cache.put(&self.settings.key, &token.access_token, ttl).await;
        get_metrics()
            .await
            .token_expiry_unix
            .set(now_i64() + ttl.as_secs() as i64);
        debug!("cached token under '{}' for {}s", self.settings.key, ttl.as_secs());
    }
}
