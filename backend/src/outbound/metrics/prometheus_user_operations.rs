//! Prometheus adapter for user operation metrics.
//!
//! Metrics are registered with a provided registry and exposed through the
//! `/metrics` endpoint served by `actix-web-prom`.

use async_trait::async_trait;
use prometheus::{HistogramOpts, HistogramVec, Registry};

use crate::domain::ports::{UserOperationMetrics, UserOperationMetricsError, UserOperationRecord};

/// Prometheus-backed user operation recorder.
///
/// # Metric Specification
///
/// - **Name**: `user_registry_operation_duration_seconds`
/// - **Type**: Histogram
/// - **Labels**:
///   - `operation`: `create`, `get`, `update`, or `delete`
///   - `outcome`: `success`, `invalid_request`, `not_found`, `conflict`, or
///     `failure`
pub struct PrometheusUserOperationMetrics {
    duration_seconds: HistogramVec,
}

impl PrometheusUserOperationMetrics {
    /// Create and register the histogram with `registry`.
    ///
    /// # Errors
    ///
    /// Returns an error if a metric with the same name is already registered.
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "user_registry_operation_duration_seconds",
                "User operation latency by operation and outcome",
            ),
            &["operation", "outcome"],
        )?;
        registry.register(Box::new(duration_seconds.clone()))?;
        Ok(Self { duration_seconds })
    }
}

#[async_trait]
impl UserOperationMetrics for PrometheusUserOperationMetrics {
    async fn record(&self, record: &UserOperationRecord) -> Result<(), UserOperationMetricsError> {
        self.duration_seconds
            .get_metric_with_label_values(&[record.operation.as_str(), record.outcome.as_str()])
            .map_err(|err| UserOperationMetricsError::export(err.to_string()))?
            .observe(record.elapsed.as_secs_f64());
        Ok(())
    }
}
