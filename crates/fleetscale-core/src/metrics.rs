//! Push-based metrics sink contract.
//!
//! Scalers and the decision engine emit gauges and counters through this
//! trait; concrete sinks (StatsD, Prometheus, a recording sink for tests)
//! live in `fleetscale-metrics`.

/// A push-based metrics collaborator.
///
/// Implementations must tolerate being called from the single-threaded
/// control loop at high frequency and must never block it for long.
pub trait MetricsSink: Send + Sync {
    /// Report the current value of a gauge.
    fn gauge(&self, name: &str, value: f64);

    /// Increment a counter by `value`.
    fn incr(&self, name: &str, value: f64);
}

/// A sink that discards everything. Useful as a default when metrics
/// are disabled (`STATSD_ENABLED: false`).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl MetricsSink for NullSink {
    fn gauge(&self, _name: &str, _value: f64) {}
    fn incr(&self, _name: &str, _value: f64) {}
}
