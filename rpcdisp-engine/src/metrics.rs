//! Dispatch metrics
//!
//! OpenTelemetry instruments recorded by dispatch when the host hands the
//! options a [`DispatchMetrics`] handle. They are exported by whatever meter
//! provider the host installed (see `rpcdisp_core::init_observability`); with
//! no provider installed the instruments are no-ops.
//!
//! # Metrics Collected
//!
//! - **rpcdisp.requests.total**: requests dispatched, by `method` and
//!   `outcome` (`success`, `error` or `notification`)
//! - **rpcdisp.request.duration**: per-request latency in seconds
//! - **rpcdisp.batch.size**: members per batch, by `mode`
//! - **rpcdisp.errors.total**: error responses computed, by `code`
//!
//! ```rust,no_run
//! use rpcdisp_engine::{DispatchMetrics, DispatchOptions};
//! use std::sync::Arc;
//!
//! let metrics = Arc::new(DispatchMetrics::new("calculator"));
//! let options = DispatchOptions::default().metrics(metrics);
//! ```

use opentelemetry::{
    global,
    metrics::{Counter, Histogram, Meter},
    InstrumentationScope, KeyValue,
};

/// Dispatch instruments
pub struct DispatchMetrics {
    /// Requests dispatched
    pub requests_total: Counter<u64>,
    /// Request duration in seconds
    pub request_duration: Histogram<f64>,
    /// Batch size distribution
    pub batch_size: Histogram<u64>,
    /// Error responses computed
    pub errors_total: Counter<u64>,
}

impl DispatchMetrics {
    /// Instruments on the global meter provider
    pub fn new(service_name: impl Into<String>) -> Self {
        let scope = InstrumentationScope::builder(service_name.into()).build();
        let meter = global::meter_with_scope(scope);
        Self::new_with_meter(&meter)
    }

    /// Instruments on a caller-supplied meter
    pub fn new_with_meter(meter: &Meter) -> Self {
        Self {
            requests_total: meter
                .u64_counter("rpcdisp.requests.total")
                .with_description("Total number of requests dispatched")
                .build(),
            request_duration: meter
                .f64_histogram("rpcdisp.request.duration")
                .with_description("Request dispatch duration in seconds")
                .with_unit("s")
                .build(),
            batch_size: meter
                .u64_histogram("rpcdisp.batch.size")
                .with_description("Number of requests in a batch")
                .build(),
            errors_total: meter
                .u64_counter("rpcdisp.errors.total")
                .with_description("Total number of error responses computed")
                .build(),
        }
    }

    /// Record one dispatched request
    pub fn record_request(&self, method: &str, outcome: &str, duration_secs: f64) {
        let attributes = &[
            KeyValue::new("method", method.to_string()),
            KeyValue::new("outcome", outcome.to_string()),
        ];
        self.requests_total.add(1, attributes);
        self.request_duration.record(duration_secs, attributes);
    }

    /// Record a batch
    pub fn record_batch(&self, size: u64, mode: &str) {
        let attributes = &[KeyValue::new("mode", mode.to_string())];
        self.batch_size.record(size, attributes);
    }

    /// Record an error response
    pub fn record_error(&self, code: i32) {
        let attributes = &[KeyValue::new("code", i64::from(code))];
        self.errors_total.add(1, attributes);
    }
}

impl std::fmt::Debug for DispatchMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchMetrics").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = DispatchMetrics::new("test-dispatch");

        metrics.record_request("add", "success", 0.01);
        metrics.record_request("missing", "error", 0.001);
        metrics.record_request("log", "notification", 0.002);
        metrics.record_batch(3, "sequential");
        metrics.record_error(-32601);
    }

    #[test]
    fn test_metrics_with_custom_meter() {
        let meter = global::meter("test-dispatch-custom");
        let metrics = DispatchMetrics::new_with_meter(&meter);

        metrics.record_batch(10, "parallel");
        metrics.record_error(-32000);
    }
}
