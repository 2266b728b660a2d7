//! Log-based recorder for user operation timings.

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{UserOperationMetrics, UserOperationMetricsError, UserOperationRecord};

/// Emits one `info` event per user operation with its outcome and elapsed
/// time in microseconds.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingUserOperationMetrics;

#[async_trait]
impl UserOperationMetrics for TracingUserOperationMetrics {
    async fn record(&self, record: &UserOperationRecord) -> Result<(), UserOperationMetricsError> {
        info!(
            operation = record.operation.as_str(),
            outcome = record.outcome.as_str(),
            elapsed_us = u64::try_from(record.elapsed.as_micros()).unwrap_or(u64::MAX),
            "user operation completed"
        );
        Ok(())
    }
}
