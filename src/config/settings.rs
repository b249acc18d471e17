use std::time::Duration;

use serde::Deserialize;

use crate::models::Credentials;
use crate::utils::constants::*;

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Clone, Deserialize)]
pub struct CredentialsConfig {
    pub api_key: String,
    pub client_id: String,
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("api_key", &"***")
            .field("client_id", &self.client_id)
            .finish()
    }
}

impl From<&CredentialsConfig> for Credentials {
    fn from(cfg: &CredentialsConfig) -> Self {
        Credentials::new(cfg.api_key.to_owned(), cfg.client_id.to_owned())
    }
}

/// ================================
/// Outbound HTTP
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// request deadline, seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// max attempts per request, transport faults only
    #[serde(default = "default_retry_times")]
    pub retry_times: u32,
    /// milliseconds, multiplied by the attempt number
    #[serde(default = "default_retry_delay")]
    pub retry_delay: u64,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            retry_times: default_retry_times(),
            retry_delay: default_retry_delay(),
        }
    }
}

/// ================================
/// Token cache
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// seconds
    #[serde(default = "default_ttl")]
    pub ttl: u64,
    #[serde(default = "default_cache_key")]
    pub key: String,
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: default_ttl(),
            key: default_cache_key(),
        }
    }
}

/// ================================
/// Proxy server & metrics
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_path")]
    pub path: String,
    #[serde(default)]
    pub is_enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            path: default_metrics_path(),
            is_enabled: false,
        }
    }
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new("info".to_owned(), LogFormat::Compact)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

fn default_timeout() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

fn default_retry_times() -> u32 {
    DEFAULT_RETRY_TIMES
}

fn default_retry_delay() -> u64 {
    DEFAULT_RETRY_DELAY_MS
}

fn default_true() -> bool {
    true
}

fn default_ttl() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}

fn default_cache_key() -> String {
    DEFAULT_CACHE_KEY.to_owned()
}

fn default_host() -> String {
    "127.0.0.1".to_owned()
}

fn default_port() -> u16 {
    8080
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}
