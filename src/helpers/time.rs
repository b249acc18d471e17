use std::time::Duration;

use chrono::Utc;
use tokio::time::Instant;

/// TTL for a freshly issued token: the configured TTL, shortened to the
/// upstream `expiresIn` when that is smaller and non-zero.
pub fn effective_ttl(configured: Duration, expires_in_seconds: Option<u64>) -> Duration {
    expires_in_seconds
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .map(|upstream| upstream.min(configured))
        .unwrap_or(configured)
}

pub fn now_i64() -> i64 {
    Utc::now().timestamp()
}

pub fn get_instant() -> Instant {
    Instant::now()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_expiry_shortens_ttl() {
        let configured = Duration::from_secs(3600);
        assert_eq!(effective_ttl(configured, Some(600)), Duration::from_secs(600));
        assert_eq!(effective_ttl(configured, Some(7200)), configured);
        assert_eq!(effective_ttl(configured, Some(0)), configured);
        assert_eq!(effective_ttl(configured, None), configured);
    }
}
