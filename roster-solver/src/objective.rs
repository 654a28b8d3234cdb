use std::collections::HashMap;

use crate::context::Context;
use crate::schedule_map::ScheduleMap;

/// Weights shared by the SA and GA objective (§4.4/§4.5). Declared as
/// constants rather than module-level globals per §9 ("no process-wide
/// globals"): every solver receives them through this one function.
pub const UNDERSTAFF_WEIGHT: f64 = 5_000_000.0;
pub const REST_VIOLATION_WEIGHT: f64 = 50_000_000.0;
pub const WEEKLY_CAP_VIOLATION_WEIGHT: f64 = 2_000_000.0;
pub const COVERAGE_BONUS: f64 = -10_000.0;
pub const FULL_COVERAGE_BONUS: f64 = -5_000.0;
pub const SHIFT_BALANCE_WEIGHT: f64 = 500_000.0;
pub const PREFERENCE_BONUS: f64 = -100.0;
pub const UTIL_BAND_REWARD: f64 = -2_000.0;
pub const UTIL_BAND_PENALTY_SLOPE: f64 = 5_000.0;
pub const UTIL_BAND_LOW: f64 = 0.85;
pub const UTIL_BAND_HIGH: f64 = 0.95;

/// The SA cost function (minimized), reused as the base of the GA fitness.
pub fn evaluate(map: &ScheduleMap, ctx: &Context) -> f64 {
    let mut cost = 0.0;

    cost += understaffing_penalty(map, ctx);
    cost += rest_violation_penalty(map, ctx);
    cost += weekly_cap_violation_penalty(map, ctx);
    cost += coverage_bonus(map);
    cost += full_coverage_bonus(map, ctx);
    cost += utilization_band_term(map, ctx);
    cost += shift_balance_penalty(map, ctx);
    cost += preference_bonus(map, ctx);

    cost
}

fn understaffing_penalty(map: &ScheduleMap, ctx: &Context) -> f64 {
    let mut total = 0.0;
    for shift in &ctx.problem.shifts {
        for &date in &ctx.working_days {
            let assigned = map.get(&(date, shift.id)).map_or(0, |v| v.len()) as u32;
            if assigned < shift.min_staff {
                total += UNDERSTAFF_WEIGHT * (shift.min_staff - assigned) as f64;
            }
        }
    }
    total
}

fn rest_violation_penalty(map: &ScheduleMap, ctx: &Context) -> f64 {
    let mut violations = 0u32;
    for employee in &ctx.problem.employees {
        for window in ctx.working_days.windows(2) {
            let (d1, d2) = (window[0], window[1]);
            if d2 - d1 != time::Duration::days(1) {
                continue;
            }
            let Some(s1) = crate::schedule_map::employee_shift_on(map, d1, employee.id) else {
                continue;
            };
            let Some(s2) = crate::schedule_map::employee_shift_on(map, d2, employee.id) else {
                continue;
            };
            if ctx.violates_rest(s1, s2, d1) {
                violations += 1;
            }
        }
    }
    REST_VIOLATION_WEIGHT * violations as f64
}

fn weekly_cap_violation_penalty(map: &ScheduleMap, ctx: &Context) -> f64 {
    let mut totals: HashMap<(u64, roster_utils::IsoWeek), f64> = HashMap::new();
    for (&(date, shift_id), employees) in map {
        let week = ctx.iso_week(date);
        let duration = ctx.shift(shift_id).duration_hours();
        for &employee_id in employees {
            *totals.entry((employee_id, week)).or_insert(0.0) += duration;
        }
    }
    let mut total_excess = 0.0;
    for ((employee_id, _week), hours) in totals {
        let cap = ctx.employee(employee_id).weekly_hours_cap as f64;
        if hours > cap {
            total_excess += hours - cap;
        }
    }
    WEEKLY_CAP_VIOLATION_WEIGHT * total_excess
}

fn coverage_bonus(map: &ScheduleMap) -> f64 {
    let filled: usize = map.values().map(|v| v.len()).sum();
    COVERAGE_BONUS * filled as f64
}

fn full_coverage_bonus(map: &ScheduleMap, ctx: &Context) -> f64 {
    let mut count = 0.0;
    for shift in &ctx.problem.shifts {
        for &date in &ctx.working_days {
            let assigned = map.get(&(date, shift.id)).map_or(0, |v| v.len()) as u32;
            if assigned == shift.max_staff {
                count += 1.0;
            }
        }
    }
    FULL_COVERAGE_BONUS * count
}

fn utilization_band_term(map: &ScheduleMap, ctx: &Context) -> f64 {
    let mut worked: HashMap<u64, f64> = HashMap::new();
    for (&(_, shift_id), employees) in map {
        let duration = ctx.shift(shift_id).duration_hours();
        for &employee_id in employees {
            *worked.entry(employee_id).or_insert(0.0) += duration;
        }
    }

    let mut term = 0.0;
    for employee in &ctx.problem.employees {
        let expected = ctx.expected_total_hours(employee.id);
        if expected <= 0.0 {
            continue;
        }
        let ratio = worked.get(&employee.id).copied().unwrap_or(0.0) / expected;
        if (UTIL_BAND_LOW..=UTIL_BAND_HIGH).contains(&ratio) {
            term += UTIL_BAND_REWARD;
        } else {
            let distance = if ratio < UTIL_BAND_LOW {
                UTIL_BAND_LOW - ratio
            } else {
                ratio - UTIL_BAND_HIGH
            };
            term += UTIL_BAND_PENALTY_SLOPE * distance;
        }
    }
    term
}

/// Each shift's total deviation from `max_staff` across the whole horizon,
/// squared. Deliberately unnormalized per §4.4 — the magnitude is large by
/// design, consistent with the other weights' scale.
fn shift_balance_penalty(map: &ScheduleMap, ctx: &Context) -> f64 {
    let mut total = 0.0;
    for shift in &ctx.problem.shifts {
        let target = shift.max_staff as f64 * ctx.working_days.len() as f64;
        let actual: f64 = ctx
            .working_days
            .iter()
            .map(|&date| map.get(&(date, shift.id)).map_or(0, |v| v.len()) as f64)
            .sum();
        let deviation = target - actual;
        total += SHIFT_BALANCE_WEIGHT * deviation * deviation;
    }
    total
}

fn preference_bonus(map: &ScheduleMap, ctx: &Context) -> f64 {
    let mut total = 0.0;
    for (&(_, shift_id), employees) in map {
        for &employee_id in employees {
            if ctx.employee(employee_id).prefers(shift_id) {
                total += 1.0;
            }
        }
    }
    PREFERENCE_BONUS * total
}
