//! Prometheus text exposition format.
//!
//! Renders the latest gauge values recorded by a [`RecordingSink`] for
//! scrape-based deployments alongside the push-based StatsD sink.

use crate::recording::RecordingSink;

/// Render a sink's gauges into Prometheus text exposition format.
/// Metric names are sanitized (`.`/`-` become `_`) and sorted for
/// deterministic output.
pub fn render_prometheus(sink: &RecordingSink) -> String {
    let mut gauges: Vec<(String, f64)> = sink.gauges().into_iter().collect();
    gauges.sort_by(|a, b| a.0.cmp(&b.0));

    let mut out = String::new();
    for (name, value) in gauges {
        let metric_name = sanitize(&name);
        out.push_str(&format!("# TYPE fleetscale_{metric_name} gauge\n"));
        out.push_str(&format!("fleetscale_{metric_name} {value}\n"));
    }
    out
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
