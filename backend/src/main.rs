//! User registry entry-point: loads settings, picks a store, and serves the
//! `/user` API alongside health probes and OpenAPI docs.

mod server;

#[cfg(feature = "metrics")]
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use user_registry::inbound::http::health::HealthState;
use user_registry::outbound::persistence::DbPool;
use user_registry::settings::ServiceSettings;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let mut settings = ServiceSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let api_key = settings.take_api_key().map_err(std::io::Error::other)?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let policy = settings.policy();
    info!(
        %bind_addr,
        key_fingerprint = %api_key.fingerprint(),
        strict_validation = policy.strict_validation,
        require_existing = policy.require_existing,
        "starting user registry"
    );

    let mut config = ServerConfig::new(api_key, policy, bind_addr);
    if let Some(pool_config) = settings.pool_config() {
        let pool = DbPool::new(pool_config)
            .await
            .map_err(|e| std::io::Error::other(e.into_message()))?;
        config = config.with_db_pool(pool);
    }

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(make_metrics());

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}

#[cfg(feature = "metrics")]
fn make_metrics() -> Option<PrometheusMetrics> {
    match PrometheusMetricsBuilder::new("user_registry")
        .endpoint("/metrics")
        .build()
    {
        Ok(metrics) => Some(metrics),
        Err(error) => {
            warn!(%error, "Prometheus metrics disabled");
            None
        }
    }
}
