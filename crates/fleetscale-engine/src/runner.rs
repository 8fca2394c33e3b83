//! `PeriodicRunner` — a fixed-interval, absolute-deadline scheduler with
//! non-dropping catch-up.
//!
//! Single-threaded and cooperative: one tick runs to completion before
//! the next is considered, and an overrunning tick is never dropped or
//! coalesced — the scheduler simply falls behind and catches up by
//! running back-to-back until the absolute deadline schedule is current.

use std::future::Future;
use std::sync::Arc;

use fleetscale_core::Clock;
use tracing::{debug, info_span, Instrument};

pub struct PeriodicRunner {
    clock: Arc<dyn Clock>,
    interval_secs: u64,
}

impl PeriodicRunner {
    pub fn new(clock: Arc<dyn Clock>, interval_secs: u64) -> Self {
        Self { clock, interval_secs }
    }

    /// Run `tick` forever, once every `interval_secs`, computing each
    /// next deadline as `previous_deadline + interval_secs` rather than
    /// `now + interval_secs` — so a slow tick is made up for by running
    /// the next one immediately rather than skipping it.
    pub async fn run<F, Fut>(&self, mut tick: F) -> !
    where
        F: FnMut(u64) -> Fut,
        Fut: Future<Output = ()>,
    {
        let mut sequence: u64 = 0;
        let mut next_deadline = self.clock.now_unix();

        loop {
            let now = self.clock.now_unix();
            if now < next_deadline {
                tokio::time::sleep(std::time::Duration::from_secs(next_deadline - now)).await;
            } else if now > next_deadline {
                debug!(behind_by_secs = now - next_deadline, "periodic runner catching up");
            }

            sequence += 1;
            tick(sequence).instrument(info_span!("tick", sequence)).await;

            next_deadline += self.interval_secs;
        }
    }
}
