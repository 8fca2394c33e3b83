//! Shared behavior every scaler variant embeds rather than inherits:
//! bounds, the final clamp step, and ceiling division.

use std::sync::Arc;

use fleetscale_core::{Clock, MetricsSink};

/// Fields and helpers common to every scaler variant.
///
/// Each concrete scaler (`ElbScaler`, `SqsScaler`, ...) embeds a
/// `ScalerBase` by composition and calls [`ScalerBase::clamp`] as the
/// last step of `get_desired_instance_count`, per this stack's
/// prefer-composition-over-inheritance convention.
pub struct ScalerBase {
    pub app_name: String,
    pub min_instances: u32,
    pub max_instances: u32,
    pub clock: Arc<dyn Clock>,
    pub metrics: Arc<dyn MetricsSink>,
}

impl ScalerBase {
    pub fn new(
        app_name: impl Into<String>,
        min_instances: u32,
        max_instances: u32,
        clock: Arc<dyn Clock>,
        metrics: Arc<dyn MetricsSink>,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            min_instances,
            max_instances,
            clock,
            metrics,
        }
    }

    /// Clamp a raw (possibly negative, possibly out-of-range) estimate
    /// into `[min_instances, max_instances]`. Negative raw estimates are
    /// treated as zero before clamping.
    pub fn clamp(&self, raw: i64) -> u32 {
        let raw = raw.max(0) as u64;
        let min = self.min_instances as u64;
        let max = self.max_instances as u64;
        raw.clamp(min, max) as u32
    }
}

/// Ceiling division for a nonnegative numerator over a positive divisor.
/// An empty metric series should be normalized to `[0]` by the caller
/// before summing/maxing, so this never receives a NaN numerator.
pub fn ceil_div(numerator: f64, divisor: f64) -> i64 {
    (numerator / divisor).ceil() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetscale_core::{MockClock, NullSink};

    fn base(min: u32, max: u32) -> ScalerBase {
        ScalerBase::new("notify-api", min, max, Arc::new(MockClock::new(0)), Arc::new(NullSink))
    }

    #[test]
    fn clamp_within_range_is_unchanged() {
        assert_eq!(base(3, 5).clamp(4), 4);
    }

    #[test]
    fn clamp_above_max_saturates() {
        assert_eq!(base(3, 5).clamp(7), 5);
    }

    #[test]
    fn clamp_below_min_saturates() {
        assert_eq!(base(3, 5).clamp(2), 3);
    }

    #[test]
    fn clamp_negative_is_treated_as_zero_then_clamped() {
        assert_eq!(base(3, 5).clamp(-1), 3);
    }

    #[test]
    fn ceil_div_rounds_up() {
        assert_eq!(ceil_div(1700.0, 300.0), 6);
        assert_eq!(ceil_div(1500.0, 300.0), 5);
        assert_eq!(ceil_div(0.0, 300.0), 0);
    }
}
