//! Outbound adapters for the user operation metrics port.
//!
//! [`TracingUserOperationMetrics`] is always available and writes one log
//! event per operation. The Prometheus adapter is gated behind the `metrics`
//! feature.

#[cfg(feature = "metrics")]
mod prometheus_user_operations;
mod tracing_user_operations;

#[cfg(feature = "metrics")]
pub use prometheus_user_operations::PrometheusUserOperationMetrics;
pub use tracing_user_operations::TracingUserOperationMetrics;
