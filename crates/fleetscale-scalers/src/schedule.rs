//! `ScheduleScaler` — desired instance count from a weekly time-of-day
//! schedule, evaluated in Europe/London local time (DST-aware).

use chrono::{Datelike, NaiveTime, TimeZone, Timelike, Utc, Weekday};
use chrono_tz::Europe::London;
use thiserror::Error;

use crate::base::ScalerBase;

#[derive(Debug, Error)]
pub enum ScheduleConfigError {
    #[error("invalid time range {0:?}: expected \"HH:MM-HH:MM\"")]
    InvalidRange(String),
}

/// An inclusive `HH:MM-HH:MM` local-time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeRange {
    pub fn parse(spec: &str) -> Result<Self, ScheduleConfigError> {
        let (start, end) = spec
            .split_once('-')
            .ok_or_else(|| ScheduleConfigError::InvalidRange(spec.to_string()))?;
        let start = NaiveTime::parse_from_str(start, "%H:%M")
            .map_err(|_| ScheduleConfigError::InvalidRange(spec.to_string()))?;
        let end = NaiveTime::parse_from_str(end, "%H:%M")
            .map_err(|_| ScheduleConfigError::InvalidRange(spec.to_string()))?;
        Ok(Self { start, end })
    }

    fn contains(&self, t: NaiveTime) -> bool {
        t >= self.start && t <= self.end
    }
}

/// Weekly schedule scaler. `scale_factor` applies to `max_instances`
/// when the current Europe/London wall-clock time falls within a
/// configured range on a matching day class (workday vs weekend); the
/// autoscaler's `schedule_scaler_enabled` flag can disable it globally.
pub struct ScheduleScaler {
    pub base: ScalerBase,
    pub workdays: Vec<TimeRange>,
    pub weekends: Vec<TimeRange>,
    pub scale_factor: f64,
    pub enabled: bool,
}

impl ScheduleScaler {
    pub fn new(base: ScalerBase, workdays: Vec<TimeRange>, weekends: Vec<TimeRange>, scale_factor: f64, enabled: bool) -> Self {
        Self { base, workdays, weekends, scale_factor, enabled }
    }

    pub fn get_desired_instance_count(&self) -> u32 {
        if !self.enabled {
            return self.base.clamp(self.base.min_instances as i64);
        }

        let now_utc = Utc.timestamp_opt(self.base.clock.now_unix() as i64, 0).unwrap();
        let now_london = now_utc.with_timezone(&London);
        let local_time = now_london.time().with_nanosecond(0).unwrap_or(now_london.time());

        let ranges = match now_london.weekday() {
            Weekday::Sat | Weekday::Sun => &self.weekends,
            _ => &self.workdays,
        };

        let matched = ranges.iter().any(|r| r.contains(local_time));

        let raw = if matched {
            (self.base.max_instances as f64 * self.scale_factor).ceil() as i64
        } else {
            self.base.min_instances as i64
        };

        self.base.clamp(raw)
    }
}
