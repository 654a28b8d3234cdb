use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::{Date, Duration, PrimitiveDateTime};

use roster_model::{Problem, Schedule};

use crate::lookups::shift_by_id;

const REQUIRED_REST_HOURS: f64 = 11.0;

/// Real clock gap, in hours, between `shift1` ending on `date1` and
/// `shift2` starting the following calendar day, accounting for
/// midnight-wrapping shifts.
fn rest_gap_hours(shift1: &roster_model::ShiftTemplate, shift2: &roster_model::ShiftTemplate, date1: Date) -> f64 {
    let mut end_first = PrimitiveDateTime::new(date1, shift1.end_time);
    if shift1.wraps_midnight() {
        end_first += Duration::days(1);
    }
    let start_second = PrimitiveDateTime::new(date1 + Duration::days(1), shift2.start_time);
    (start_second - end_first).whole_seconds() as f64 / 3600.0
}

fn violates_rest_period(shift1: &roster_model::ShiftTemplate, shift2: &roster_model::ShiftTemplate, date1: Date) -> bool {
    rest_gap_hours(shift1, shift2, date1) < REQUIRED_REST_HOURS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestViolation {
    pub employee_id: u64,
    pub date1: Date,
    pub date2: Date,
    pub shift1_id: u64,
    pub shift2_id: u64,
    pub actual_rest_hours: f64,
}

/// For every pair of entries on consecutive calendar days for the same
/// employee within `[range_start, range_end]`, checks the real-world rest
/// gap across midnight-wrapping shifts.
pub fn rest_violations(
    schedule: &Schedule,
    problem: &Problem,
    range_start: Date,
    range_end: Date,
) -> (usize, Vec<RestViolation>) {
    let mut by_employee: HashMap<u64, HashMap<Date, Vec<u64>>> = HashMap::new();
    for entry in &schedule.entries {
        if entry.date < range_start || entry.date > range_end {
            continue;
        }
        by_employee
            .entry(entry.employee_id)
            .or_default()
            .entry(entry.date)
            .or_default()
            .push(entry.shift_id);
    }

    let mut detailed = Vec::new();
    let mut employee_ids: Vec<_> = by_employee.keys().copied().collect();
    employee_ids.sort_unstable();

    for employee_id in employee_ids {
        let dates_map = &by_employee[&employee_id];
        let mut dates: Vec<_> = dates_map.keys().copied().collect();
        dates.sort_unstable();

        for window in dates.windows(2) {
            let (d1, d2) = (window[0], window[1]);
            if d2 - d1 != Duration::days(1) {
                continue;
            }
            for &shift1_id in &dates_map[&d1] {
                for &shift2_id in &dates_map[&d2] {
                    let (Some(shift1), Some(shift2)) =
                        (shift_by_id(problem, shift1_id), shift_by_id(problem, shift2_id))
                    else {
                        continue;
                    };
                    if violates_rest_period(shift1, shift2, d1) {
                        detailed.push(RestViolation {
                            employee_id,
                            date1: d1,
                            date2: d2,
                            shift1_id,
                            shift2_id,
                            actual_rest_hours: rest_gap_hours(shift1, shift2, d1),
                        });
                    }
                }
            }
        }
    }

    (detailed.len(), detailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, time};

    #[test]
    fn eight_hour_gap_is_a_violation() {
        let late = roster_model::ShiftTemplate::new(1, "Late", time!(14:00), time!(22:00), 1, 1);
        let early = roster_model::ShiftTemplate::new(2, "Early", time!(06:00), time!(14:00), 1, 1);
        let gap = rest_gap_hours(&late, &early, date!(2025 - 01 - 06));
        assert_eq!(gap, 8.0);
        assert!(violates_rest_period(&late, &early, date!(2025 - 01 - 06)));
    }

    #[test]
    fn midnight_wrap_forces_zero_gap() {
        let night = roster_model::ShiftTemplate::new(1, "Night", time!(22:00), time!(06:00), 1, 1);
        let early = roster_model::ShiftTemplate::new(2, "Early", time!(06:00), time!(14:00), 1, 1);
        let gap = rest_gap_hours(&night, &early, date!(2025 - 03 - 01));
        assert_eq!(gap, 0.0);
        assert!(violates_rest_period(&night, &early, date!(2025 - 03 - 01)));
    }
}
