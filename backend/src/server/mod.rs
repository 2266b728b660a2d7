//! Server construction and middleware wiring.

mod config;
#[cfg(feature = "metrics")]
mod metrics;

pub use config::ServerConfig;

#[cfg(feature = "metrics")]
use metrics::MetricsLayer;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use user_registry::Trace;
#[cfg(debug_assertions)]
use user_registry::doc::ApiDoc;
use user_registry::domain::UserService;
use user_registry::domain::ports::{UserOperationMetrics, UserRepository};
use user_registry::inbound::http::api_key::ApiKeyGate;
use user_registry::inbound::http::health::{HealthState, live, ready};
use user_registry::inbound::http::state::HttpState;
use user_registry::inbound::http::users;
use user_registry::outbound::memory::InMemoryUserRepository;
#[cfg(feature = "metrics")]
use user_registry::outbound::metrics::PrometheusUserOperationMetrics;
use user_registry::outbound::metrics::TracingUserOperationMetrics;
use user_registry::outbound::persistence::DieselUserRepository;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use std::sync::Arc;
use tracing::warn;

/// Pick the user store: PostgreSQL when a pool is configured, otherwise the
/// process-local map.
fn build_repository(config: &ServerConfig) -> Arc<dyn UserRepository> {
    match &config.db_pool {
        Some(pool) => Arc::new(DieselUserRepository::new(pool.clone())),
        None => {
            warn!("no database configured; users are kept in memory only");
            Arc::new(InMemoryUserRepository::new())
        }
    }
}

/// Operation metrics: a Prometheus histogram when a registry is attached,
/// otherwise one tracing event per operation.
///
/// # Errors
/// Returns [`std::io::Error`] if Prometheus metric registration fails.
#[cfg(feature = "metrics")]
fn build_operation_metrics(config: &ServerConfig) -> std::io::Result<Arc<dyn UserOperationMetrics>> {
    match &config.prometheus {
        Some(prom) => {
            let metrics = PrometheusUserOperationMetrics::new(&prom.registry).map_err(|e| {
                std::io::Error::other(format!("user metrics registration failed: {e}"))
            })?;
            Ok(Arc::new(metrics))
        }
        None => Ok(Arc::new(TracingUserOperationMetrics)),
    }
}

#[cfg(not(feature = "metrics"))]
fn build_operation_metrics(_config: &ServerConfig) -> std::io::Result<Arc<dyn UserOperationMetrics>> {
    Ok(Arc::new(TracingUserOperationMetrics))
}

fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let service = UserService::new(build_repository(config), config.policy)
        .with_metrics(build_operation_metrics(config)?);
    Ok(HttpState::from_service(Arc::new(service)))
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    gate: ApiKeyGate,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        gate,
    } = deps;

    let user_scope = web::scope("/user").wrap(gate).configure(users::configure);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(user_scope)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is bound.
/// - `config`: pre-built [`ServerConfig`] holding the API key, store, and
///   optional metrics settings.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when metric registration, binding the socket,
/// or starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config)?);
    let ServerConfig {
        api_key,
        policy: _,
        bind_addr,
        db_pool: _,
        #[cfg(feature = "metrics")]
        prometheus,
    } = config;
    let gate = ApiKeyGate::new(api_key);

    #[cfg(feature = "metrics")]
    let metrics_layer = MetricsLayer::from_option(prometheus);

    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            gate: gate.clone(),
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics_layer.clone());

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
