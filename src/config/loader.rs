use std::path::Path;

use anyhow::{anyhow, Context, Result};
use regex::Regex;
use tracing::{debug, error};

use crate::config::settings::ServiceConfig;

/// Load and validate config from YAML file
pub async fn file_to_config(path: &Path) -> Result<ServiceConfig> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading config file {}", path.display()))?;

    let expanded = expand_env_vars(&content);
    parse_config(&expanded)
}

pub fn parse_config(content: &str) -> Result<ServiceConfig> {
    let mut service_config: ServiceConfig = serde_yaml::from_str(content).inspect_err(|e| {
        error!("parse config error: {}", e);
    })?;

    if service_config.logging.is_none() {
        service_config.logging = Some(Default::default());
    }
    service_config.base_url = service_config.base_url.trim_end_matches('/').to_owned();

    debug!("validation config ...");
    validate_service_config(&service_config)
        .map_err(|errors| anyhow!("config is not valid: {}", errors.join("; ")))?;

    Ok(service_config)
}

/// `${VAR}` and `${VAR:default}`; unset without default expands to an empty string.
pub fn expand_env_vars(input: &str) -> String {
    let re = Regex::new(r"\$\{(\w+)(?::([^\}]+))?\}").expect("static env var pattern");
    re.replace_all(input, |caps: &regex::Captures| {
        let var = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        std::env::var(var).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

/// Returns Ok(()) or every issue found.
pub fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    if !(cfg.base_url.starts_with("http://") || cfg.base_url.starts_with("https://")) {
        errors.push(format!(
            "base_url '{}' must start with http:// or https://",
            cfg.base_url
        ));
    }
    if cfg.credentials.api_key.trim().is_empty() {
        errors.push("credentials.api_key must not be empty".to_owned());
    }
    if cfg.credentials.client_id.trim().is_empty() {
        errors.push("credentials.client_id must not be empty".to_owned());
    }
    if cfg.http.timeout == 0 {
        errors.push("http.timeout must be greater than 0".to_owned());
    }
    if cfg.cache.enabled {
        if cfg.cache.ttl == 0 {
            errors.push("cache.ttl must be greater than 0 when caching is enabled".to_owned());
        }
        if cfg.cache.key.trim().is_empty() {
            errors.push("cache.key must not be empty when caching is enabled".to_owned());
        }
    }
    if cfg.metrics.is_enabled && !cfg.metrics.path.starts_with('/') {
        errors.push(format!("metrics.path '{}' must start with '/'", cfg.metrics.path));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        for e in &errors {
            error!("config error: {}", e);
        }
        Err(errors)
    }
}
