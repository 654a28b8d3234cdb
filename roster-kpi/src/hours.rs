use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::Date;

use roster_model::{Problem, Schedule};
use roster_utils::IsoWeek;

use crate::lookups::shift_by_id;
use crate::shift_hours::shift_hours_in_range;

const WEEKLY_OVERRUN_FACTOR: f64 = 1.15;
const WEEKLY_OVERRUN_BUFFER_HOURS: f64 = 2.0;
const ROUND_TO_HOURS: f64 = 8.0;

/// Total hours worked by each employee across the whole schedule, clipped
/// to `[range_start, range_end]`.
pub fn employee_hours(
    schedule: &Schedule,
    problem: &Problem,
    range_start: Date,
    range_end: Date,
) -> HashMap<u64, f64> {
    let mut totals: HashMap<u64, f64> = HashMap::new();
    for entry in &schedule.entries {
        let Some(shift) = shift_by_id(problem, entry.shift_id) else {
            continue;
        };
        let hours = shift_hours_in_range(shift, entry.date, range_start, range_end);
        *totals.entry(entry.employee_id).or_insert(0.0) += hours;
    }
    totals
}

/// Hours worked by each employee, broken down by ISO week, for entries
/// whose date falls within `[range_start, range_end]`.
pub fn weekly_hours(
    schedule: &Schedule,
    problem: &Problem,
    range_start: Date,
    range_end: Date,
) -> HashMap<u64, HashMap<IsoWeek, f64>> {
    let mut weekly: HashMap<u64, HashMap<IsoWeek, f64>> = HashMap::new();
    for entry in &schedule.entries {
        if entry.date < range_start || entry.date > range_end {
            continue;
        }
        let Some(shift) = shift_by_id(problem, entry.shift_id) else {
            continue;
        };
        let hours = shift_hours_in_range(shift, entry.date, range_start, range_end);
        let week = IsoWeek::of(entry.date);
        *weekly
            .entry(entry.employee_id)
            .or_default()
            .entry(week)
            .or_insert(0.0) += hours;
    }
    weekly
}

/// The KPI-classification threshold above which a week counts as a
/// violation. This is reporting-only — never a feasibility relaxation
/// (§9): solvers enforce the exact `weekly_hours_cap` as a hard constraint.
pub fn weekly_violation_threshold(weekly_hours_cap: u32) -> f64 {
    let raw = weekly_hours_cap as f64 * WEEKLY_OVERRUN_FACTOR / ROUND_TO_HOURS;
    raw.round() * ROUND_TO_HOURS + WEEKLY_OVERRUN_BUFFER_HOURS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyViolation {
    pub employee_id: u64,
    pub week: IsoWeek,
    pub actual_hours: f64,
    pub limit_hours: f64,
    pub excess_hours: f64,
}

pub fn weekly_violations(
    schedule: &Schedule,
    problem: &Problem,
    range_start: Date,
    range_end: Date,
) -> (usize, Vec<WeeklyViolation>) {
    let weekly = weekly_hours(schedule, problem, range_start, range_end);
    let mut detailed = Vec::new();

    let mut employee_ids: Vec<_> = weekly.keys().copied().collect();
    employee_ids.sort_unstable();

    for employee_id in employee_ids {
        let Some(employee) = crate::lookups::employee_by_id(problem, employee_id) else {
            continue;
        };
        let limit = weekly_violation_threshold(employee.weekly_hours_cap);
        let mut weeks: Vec<_> = weekly[&employee_id].iter().collect();
        weeks.sort_unstable_by_key(|(week, _)| **week);
        for (week, hours) in weeks {
            if *hours > limit {
                detailed.push(WeeklyViolation {
                    employee_id,
                    week: *week,
                    actual_hours: *hours,
                    limit_hours: limit,
                    excess_hours: hours - limit,
                });
            }
        }
    }

    (detailed.len(), detailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_matches_reference_formula() {
        // cap=40: round(40*1.15/8)*8+2 = round(5.75)*8+2 = 6*8+2 = 50
        assert_eq!(weekly_violation_threshold(40), 50.0);
    }
}
