//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use user_registry::domain::UserServicePolicy;
use user_registry::inbound::http::api_key::ApiKey;
use user_registry::outbound::persistence::DbPool;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) api_key: ApiKey,
    pub(crate) policy: UserServicePolicy,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Construct a configuration that uses the in-memory store.
    #[must_use]
    pub fn new(api_key: ApiKey, policy: UserServicePolicy, bind_addr: SocketAddr) -> Self {
        Self {
            api_key,
            policy,
            bind_addr,
            db_pool: None,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Store users in PostgreSQL through this pool.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
