use tokio::time::{sleep, Duration};
use tracing::{error, warn};

use crate::config::settings::HttpConfig;
use crate::observability::metrics::get_metrics;

#[derive(Debug, Clone)]
pub struct RetrySettings {
    pub attempts: u32,
    /// grows linearly: attempt n waits `delay_ms * n`
    pub delay_ms: u64,
}

impl From<&HttpConfig> for RetrySettings {
    fn from(cfg: &HttpConfig) -> Self {
        Self {
            attempts: cfg.retry_times,
            delay_ms: cfg.retry_delay,
        }
    }
}

impl RetrySettings {
    pub fn delay_after(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.delay_ms.saturating_mul(attempt as u64))
    }

    /// Runs `operation` until it succeeds, `should_retry` rejects the error, or attempts run out.
    pub async fn run_with_retry<F, Fut, T, E, R>(&self, mut operation: F, should_retry: R) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        E: std::fmt::Display,
        R: Fn(&E) -> bool,
    {
        let attempts = self.attempts.max(1);
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < attempts && should_retry(&e) => {
                    warn!("Attempt {attempt}/{attempts} failed: {e}");
                    get_metrics().await.retries.inc();
                    sleep(self.delay_after(attempt)).await;
                    attempt += 1;
                }
                Err(e) => {
                    if attempt > 1 {
                        error!("all {attempt} attempts failed: {e}");
                    }
                    return Err(e);
                }
            }
        }
    }
}
