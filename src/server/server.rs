use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use tracing::info;

use crate::catalogue::CatalogueClient;
use crate::config::settings::ServiceConfig;
use crate::observability::metrics::get_metrics;
use crate::observability::routes::MetricsState;
use crate::server::handlers;

#[derive(Clone)]
pub struct AppState {
    pub metrics_state: MetricsState,
    pub client: CatalogueClient,
}

impl AppState {
    pub async fn new(client: CatalogueClient) -> Self {
        let metrics = get_metrics().await;
        Self {
            metrics_state: MetricsState::new(metrics.registry.clone()),
            client,
        }
    }
}

/// Catalogue proxy routes under `/api/catalogue`, plus metrics when enabled.
pub fn router(state: AppState, service_config: &ServiceConfig) -> Router {
    let api = Router::new()
        .route("/external-sign-in", post(handlers::external_sign_in))
        .route("/catalogue", get(handlers::get_catalogue))
        .route("/pull-sku", post(handlers::pull_sku))
        .route("/customer-log", get(handlers::get_customer_log))
        .route("/token", get(handlers::get_token));

    Router::new()
        .nest("/api/catalogue", api)
        .merge(state.metrics_state.router(&service_config.metrics))
        .with_state(state)
}

pub async fn start(service_config: &ServiceConfig, client: CatalogueClient) -> Result<()> {
    let state = AppState::new(client).await;
    let app = router(state, service_config);

    let bind_addr = format!("{}:{}", service_config.server.host, service_config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {}", bind_addr))?;
    info!("listening on {}", bind_addr);

    get_metrics().await.up.set(1);
    axum::serve(listener, app).await.context("http server failed")?;
    Ok(())
}
