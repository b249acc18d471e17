//! Shared constants and defaults

pub const DEFAULT_BASE_URL: &str = "https://api-stg-luckycode.redeemly.com/api/v1";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_RETRY_TIMES: u32 = 3;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;
pub const DEFAULT_CACHE_KEY: &str = "catalogue_access_token";

pub const SOURCE_PROVIDER: &str = "catalogue-api";

// Upstream endpoints
pub const PATH_EXTERNAL_SIGN_IN: &str = "/account/external-sign-in";
pub const PATH_CATALOGUE_VIEW: &str = "/catalogue-adapter/view";
pub const PATH_CATALOGUE_PULL: &str = "/catalogue-adapter/pull";
pub const PATH_CUSTOMER_LOG: &str = "/catalogue-adapter/customer-log";

// Error codes reported in the envelope
pub const EXTERNAL_SIGN_IN_ERROR: &str = "EXTERNAL_SIGN_IN_ERROR";
pub const GET_CATALOGUE_ERROR: &str = "GET_CATALOGUE_ERROR";
pub const PULL_SKU_ERROR: &str = "PULL_SKU_ERROR";
pub const GET_CUSTOMER_LOG_ERROR: &str = "GET_CUSTOMER_LOG_ERROR";
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
