use std::sync::Arc;

use tracing::{info, warn};

use crate::auth::token_provider::{token_preview, TokenProvider};
use crate::cache::TokenCache;
use crate::config::settings::ServiceConfig;
use crate::dispatch::{RequestDispatcher, RequestSpec};
use crate::errors::CatalogueError;
use crate::models::{ApiResponse, Credentials, CustomerLogQuery, PullSkuRequest};
use crate::utils::constants::*;

/// The four catalogue operations plus token access.
///
/// Operations never fail: every fault is reported as an error envelope.
#[derive(Clone)]
pub struct CatalogueClient {
    dispatcher: Arc<RequestDispatcher>,
    tokens: Arc<TokenProvider>,
}

impl CatalogueClient {
    pub fn new(dispatcher: Arc<RequestDispatcher>, tokens: Arc<TokenProvider>) -> Self {
        Self { dispatcher, tokens }
    }

    pub fn from_config(cfg: &ServiceConfig, cache: Arc<dyn TokenCache>) -> Result<Self, CatalogueError> {
        let dispatcher = Arc::new(RequestDispatcher::new(&cfg.base_url, &cfg.http)?);
        let tokens = Arc::new(TokenProvider::new(
            dispatcher.clone(),
            cache,
            Credentials::from(&cfg.credentials),
            cfg.cache.clone(),
        ));
        Ok(Self::new(dispatcher, tokens))
    }

    pub async fn external_sign_in(&self, credentials: &Credentials) -> ApiResponse {
        match self.tokens.sign_in(credentials).await {
            Ok(token) => ApiResponse::success(token.to_value(), Some(SOURCE_PROVIDER)),
            Err(err) => failure(err, EXTERNAL_SIGN_IN_ERROR),
        }
    }

    pub async fn get_catalogue(&self) -> ApiResponse {
        let spec = RequestSpec::get(PATH_CATALOGUE_VIEW, "get_catalogue", GET_CATALOGUE_ERROR);
        self.authorized(spec).await
    }

    pub async fn pull_sku(&self, request: &PullSkuRequest) -> ApiResponse {
        if let Err(err) = request.validate() {
            return failure(err, VALIDATION_ERROR);
        }
        let body = match request.to_body() {
            Ok(body) => body,
            Err(err) => return failure(err, PULL_SKU_ERROR),
        };
        let spec = RequestSpec::post(PATH_CATALOGUE_PULL, "pull_sku", PULL_SKU_ERROR).json(body);
        self.authorized(spec).await
    }

    pub async fn get_customer_log(&self, query: &CustomerLogQuery) -> ApiResponse {
        if let Err(err) = query.validate() {
            return failure(err, VALIDATION_ERROR);
        }
        let spec = RequestSpec::get(PATH_CUSTOMER_LOG, "get_customer_log", GET_CUSTOMER_LOG_ERROR)
            .query(query.to_query());
        self.authorized(spec).await
    }

    pub async fn ensure_valid_token(&self) -> Result<String, CatalogueError> {
        self.tokens.ensure_valid_token().await
    }

    pub async fn clear_token_cache(&self) {
        self.tokens.clear_token_cache().await
    }

    async fn authorized(&self, spec: RequestSpec) -> ApiResponse {
        let token = match self.tokens.ensure_valid_token().await {
            Ok(token) => token,
            Err(err) => return failure(err, spec.error_code),
        };
        info!("{} with token {}", spec.operation, token_preview(&token));

        let spec = spec.bearer(token);
        match self.dispatcher.execute(&spec).await {
            Ok(body) => ApiResponse::from_json(&body),
            Err(err) => {
                // a rejected token must not be served again; the next call signs in
                if err.is_unauthorized() {
                    warn!("{} got 401, dropping cached token", spec.operation);
                    self.tokens.clear_token_cache().await;
                }
                failure(err, spec.error_code)
            }
        }
    }
}

/// Auth failures keep their own code; everything else gets the operation's.
fn failure(err: CatalogueError, code: &str) -> ApiResponse {
    let code = match &err {
        CatalogueError::Validation { .. } => VALIDATION_ERROR,
        _ => err.code().unwrap_or(code),
    };
    warn!("operation failed [{}]: {}", code, err);
    ApiResponse::error(err.to_string(), code)
}
