//! The `Scaler` variant type — a closed set of signal-specific
//! estimators unified behind one `get_desired_instance_count` operation.

use crate::cpu::CpuScaler;
use crate::elb::ElbScaler;
use crate::schedule::ScheduleScaler;
use crate::scheduled_jobs::ScheduledJobsScaler;
use crate::sqs::SqsScaler;

/// Polymorphic over the single capability every signal source supports.
/// New signal sources are added by extending this enum, not by
/// introducing a trait object — the set of scaler kinds is closed and
/// known at config-parse time.
pub enum Scaler {
    Elb(ElbScaler),
    Sqs(SqsScaler),
    Cpu(CpuScaler),
    ScheduledJobs(ScheduledJobsScaler),
    Schedule(ScheduleScaler),
}

impl Scaler {
    pub async fn get_desired_instance_count(&self) -> u32 {
        match self {
            Scaler::Elb(s) => s.get_desired_instance_count().await,
            Scaler::Sqs(s) => s.get_desired_instance_count().await,
            Scaler::Cpu(s) => s.get_desired_instance_count().await,
            Scaler::ScheduledJobs(s) => s.get_desired_instance_count().await,
            Scaler::Schedule(s) => s.get_desired_instance_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::ScalerBase;
    use fleetscale_core::{MockClock, NullSink};
    use std::sync::Arc;

    #[tokio::test]
    async fn dispatches_to_the_wrapped_variant() {
        let base = ScalerBase::new("notify-api", 4, 10, Arc::new(MockClock::new(0)), Arc::new(NullSink));
        let scaler = Scaler::Schedule(ScheduleScaler::new(base, vec![], vec![], 0.8, true));
        // No ranges configured -> falls through to min_instances.
        assert_eq!(scaler.get_desired_instance_count().await, 4);
    }
}
