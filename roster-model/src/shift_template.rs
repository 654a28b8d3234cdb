use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::Time;

/// A reusable daily shift pattern. `duration_hours` is derived once at
/// construction and stored — the evaluator and solvers must never
/// re-derive it inside a hot loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftTemplate {
    pub id: u64,
    pub name: Arc<str>,
    pub start_time: Time,
    pub end_time: Time,
    pub min_staff: u32,
    pub max_staff: u32,
    duration_hours: f64,
}

impl ShiftTemplate {
    pub fn new(
        id: u64,
        name: impl Into<Arc<str>>,
        start_time: Time,
        end_time: Time,
        min_staff: u32,
        max_staff: u32,
    ) -> Self {
        let duration_hours = Self::compute_duration_hours(start_time, end_time);
        Self {
            id,
            name: name.into(),
            start_time,
            end_time,
            min_staff,
            max_staff,
            duration_hours,
        }
    }

    /// `end <= start` denotes a shift crossing midnight: duration is
    /// `24 - start + end` hours rather than a negative span.
    fn compute_duration_hours(start_time: Time, end_time: Time) -> f64 {
        let to_hours = |t: Time| -> f64 {
            t.hour() as f64 + t.minute() as f64 / 60.0 + t.second() as f64 / 3600.0
        };
        let start = to_hours(start_time);
        let end = to_hours(end_time);
        if end_time <= start_time {
            24.0 - start + end
        } else {
            end - start
        }
    }

    pub fn duration_hours(&self) -> f64 {
        self.duration_hours
    }

    pub fn wraps_midnight(&self) -> bool {
        self.end_time <= self.start_time
    }

    pub fn midpoint_staff(&self) -> f64 {
        (self.min_staff as f64 + self.max_staff as f64) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::time;

    #[test]
    fn plain_shift_duration() {
        let shift = ShiftTemplate::new(1, "Early", time!(08:00), time!(16:00), 1, 2);
        assert_eq!(shift.duration_hours(), 8.0);
        assert!(!shift.wraps_midnight());
    }

    #[test]
    fn midnight_wrapping_shift_duration() {
        let shift = ShiftTemplate::new(1, "Night", time!(22:00), time!(06:00), 1, 2);
        assert_eq!(shift.duration_hours(), 8.0);
        assert!(shift.wraps_midnight());
    }
}
