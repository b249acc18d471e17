use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry};
use tracing::info;
use std::sync::Arc;
use tokio::sync::OnceCell;


// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the static `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE.get_or_init(|| async {
        info!("Initializing Metrics ...");
        Metrics::new()}
    ).await
}


#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Auth metrics
    pub sign_in_requests: IntCounter,
    pub sign_in_failures: IntCounterVec,

    // Cache metrics
    pub token_cache_hits: IntCounter,
    pub token_cache_misses: IntCounter,
    pub token_expiry_unix: IntGauge,

    // Dispatch metrics
    pub dispatch_requests: IntCounterVec,
    pub dispatch_failures: IntCounterVec,
    pub dispatch_duration: HistogramVec,
    pub retries: IntCounter,

    pub up: IntGauge,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("catalogueagent".into()), None).unwrap();

        let metrics: Arc<Metrics> = Arc::new(Self {
            // Auth
            sign_in_requests: IntCounter::new("sign_in_requests_total", "External sign-in calls").unwrap(),
            sign_in_failures: IntCounterVec::new(Opts::new("sign_in_failures_total", "Sign-in failures by reason"),&["reason"],).unwrap(),

            // Cache
            token_cache_hits: IntCounter::new("token_cache_hits_total", "Token served from cache").unwrap(),
            token_cache_misses: IntCounter::new("token_cache_misses_total", "Token absent or expired in cache").unwrap(),
            token_expiry_unix: IntGauge::new("token_expiry_unix_seconds", "Expiry of the cached token").unwrap(),

            // Dispatch
            dispatch_requests: IntCounterVec::new(Opts::new("dispatch_requests_total","Outbound requests by operation",),&["operation", "method"],).unwrap(),
            dispatch_failures: IntCounterVec::new(Opts::new("dispatch_failures_total", "Outbound failures by reason"),&["operation", "reason"],).unwrap(),
            dispatch_duration: HistogramVec::new(HistogramOpts::new("dispatch_duration_seconds", "Outbound request duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),&["operation"],).unwrap(),
            retries: IntCounter::new("dispatch_retries_total", "Retried outbound attempts").unwrap(),

            up: IntGauge::new("up", "1 if service is healthy").unwrap(),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.sign_in_requests.clone())).unwrap();
        reg.register(Box::new(metrics.sign_in_failures.clone())).unwrap();
        reg.register(Box::new(metrics.token_cache_hits.clone())).unwrap();
        reg.register(Box::new(metrics.token_cache_misses.clone())).unwrap();
        reg.register(Box::new(metrics.token_expiry_unix.clone())).unwrap();
        reg.register(Box::new(metrics.dispatch_requests.clone())).unwrap();
        reg.register(Box::new(metrics.dispatch_failures.clone())).unwrap();
        reg.register(Box::new(metrics.dispatch_duration.clone())).unwrap();
        reg.register(Box::new(metrics.retries.clone())).unwrap();
        reg.register(Box::new(metrics.up.clone())).unwrap();

        metrics
    }
}
