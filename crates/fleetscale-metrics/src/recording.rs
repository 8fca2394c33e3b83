//! In-memory recording sink for tests and for feeding the Prometheus
//! text-exposition renderer.

use std::collections::HashMap;
use std::sync::Mutex;

use fleetscale_core::MetricsSink;

/// Records the latest value of each gauge and the running total of each
/// counter, keyed by name. Safe to share across the single control loop
/// and a concurrent scrape handler.
#[derive(Default)]
pub struct RecordingSink {
    gauges: Mutex<HashMap<String, f64>>,
    counters: Mutex<HashMap<String, f64>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gauge_value(&self, name: &str) -> Option<f64> {
        self.gauges.lock().unwrap().get(name).copied()
    }

    pub fn counter_value(&self, name: &str) -> Option<f64> {
        self.counters.lock().unwrap().get(name).copied()
    }

    /// Snapshot of every recorded gauge, for the Prometheus renderer.
    pub fn gauges(&self) -> HashMap<String, f64> {
        self.gauges.lock().unwrap().clone()
    }
}

impl MetricsSink for RecordingSink {
    fn gauge(&self, name: &str, value: f64) {
        self.gauges.lock().unwrap().insert(name.to_string(), value);
    }

    fn incr(&self, name: &str, value: f64) {
        *self.counters.lock().unwrap().entry(name.to_string()).or_insert(0.0) += value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gauge_records_latest_value() {
        let sink = RecordingSink::new();
        sink.gauge("notify-api.instance-count", 4.0);
        sink.gauge("notify-api.instance-count", 6.0);
        assert_eq!(sink.gauge_value("notify-api.instance-count"), Some(6.0));
    }

    #[test]
    fn incr_accumulates() {
        let sink = RecordingSink::new();
        sink.incr("notify-api.scale-events", 1.0);
        sink.incr("notify-api.scale-events", 1.0);
        assert_eq!(sink.counter_value("notify-api.scale-events"), Some(2.0));
    }

    #[test]
    fn unknown_gauge_is_none() {
        let sink = RecordingSink::new();
        assert_eq!(sink.gauge_value("nonexistent"), None);
    }
}
