//! Neighborhood operators shared by the SA local search (§4.4) and the GA
//! mutation operators (§4.5) — both describe the same handful of
//! schedule-repair moves under different names.

use rand::seq::SliceRandom;
use rand::Rng;
use time::Date;

use crate::context::Context;
use crate::schedule_map::{employee_shift_on, is_feasible_assignment, weekly_hours_so_far, ScheduleMap};

fn gap_slots(map: &ScheduleMap, ctx: &Context) -> Vec<(Date, u64)> {
    ctx.problem
        .shifts
        .iter()
        .flat_map(|shift| {
            ctx.working_days.iter().filter_map(move |&date| {
                let assigned = map.get(&(date, shift.id)).map_or(0, |v| v.len()) as u32;
                (assigned < shift.min_staff).then_some((date, shift.id))
            })
        })
        .collect()
}

fn feasible_candidates(map: &ScheduleMap, ctx: &Context, date: Date, shift_id: u64) -> Vec<u64> {
    ctx.problem
        .employees
        .iter()
        .map(|e| e.id)
        .filter(|&id| is_feasible_assignment(map, ctx, id, date, shift_id))
        .collect()
}

/// Fill an understaffed (day, shift) with a feasible candidate.
pub fn try_fill_gap(map: &mut ScheduleMap, ctx: &Context, rng: &mut impl Rng) -> bool {
    let slots = gap_slots(map, ctx);
    let Some(&(date, shift_id)) = slots.choose(rng) else {
        return false;
    };
    let candidates = feasible_candidates(map, ctx, date, shift_id);
    let Some(&employee_id) = candidates.choose(rng) else {
        return false;
    };
    map.entry((date, shift_id)).or_default().push(employee_id);
    true
}

/// Add to a random shift below `max_staff`, preferring the least-utilized
/// feasible employee.
pub fn try_maximize_shift(map: &mut ScheduleMap, ctx: &Context, rng: &mut impl Rng) -> bool {
    let slots: Vec<(Date, u64)> = ctx
        .problem
        .shifts
        .iter()
        .flat_map(|shift| {
            ctx.working_days.iter().filter_map(move |&date| {
                let assigned = map.get(&(date, shift.id)).map_or(0, |v| v.len()) as u32;
                (assigned < shift.max_staff).then_some((date, shift.id))
            })
        })
        .collect();
    let Some(&(date, shift_id)) = slots.choose(rng) else {
        return false;
    };
    let mut candidates = feasible_candidates(map, ctx, date, shift_id);
    if candidates.is_empty() {
        return false;
    }
    candidates.sort_by(|&a, &b| {
        let week = ctx.iso_week(date);
        let used_a = weekly_hours_so_far(map, ctx, a, week);
        let used_b = weekly_hours_so_far(map, ctx, b, week);
        used_a.partial_cmp(&used_b).expect("hours are never NaN")
    });
    map.entry((date, shift_id)).or_default().push(candidates[0]);
    true
}

/// Move an employee from a full shift to a deficient one on the same day.
pub fn try_redistribute(map: &mut ScheduleMap, ctx: &Context, rng: &mut impl Rng) -> bool {
    let Some(&date) = ctx.working_days.choose(rng) else {
        return false;
    };
    let full: Vec<u64> = ctx
        .problem
        .shifts
        .iter()
        .filter(|s| map.get(&(date, s.id)).map_or(0, |v| v.len()) as u32 >= s.max_staff)
        .map(|s| s.id)
        .collect();
    let deficient: Vec<u64> = ctx
        .problem
        .shifts
        .iter()
        .filter(|s| map.get(&(date, s.id)).map_or(0, |v| v.len()) as u32 < s.min_staff)
        .map(|s| s.id)
        .collect();
    let (Some(&from_shift), Some(&to_shift)) = (full.choose(rng), deficient.choose(rng)) else {
        return false;
    };
    let Some(employee_id) = map.get(&(date, from_shift)).and_then(|v| v.first().copied()) else {
        return false;
    };
    remove_assignment(map, date, from_shift, employee_id);
    if is_feasible_assignment(map, ctx, employee_id, date, to_shift) {
        map.entry((date, to_shift)).or_default().push(employee_id);
        true
    } else {
        map.entry((date, from_shift)).or_default().push(employee_id);
        false
    }
}

/// Swap one employee between two shifts on the same day to reduce deficit.
pub fn try_swap_for_coverage(map: &mut ScheduleMap, ctx: &Context, rng: &mut impl Rng) -> bool {
    let Some(&date) = ctx.working_days.choose(rng) else {
        return false;
    };
    let shifts = &ctx.problem.shifts;
    if shifts.len() < 2 {
        return false;
    }
    let (Some(a), Some(b)) = (shifts.choose(rng), shifts.choose(rng)) else {
        return false;
    };
    if a.id == b.id {
        return false;
    }
    let Some(emp_a) = map.get(&(date, a.id)).and_then(|v| v.first().copied()) else {
        return false;
    };
    let Some(emp_b) = map.get(&(date, b.id)).and_then(|v| v.first().copied()) else {
        return false;
    };
    remove_assignment(map, date, a.id, emp_a);
    remove_assignment(map, date, b.id, emp_b);
    let feasible = is_feasible_assignment(map, ctx, emp_a, date, b.id) && is_feasible_assignment(map, ctx, emp_b, date, a.id);
    if feasible {
        map.entry((date, b.id)).or_default().push(emp_a);
        map.entry((date, a.id)).or_default().push(emp_b);
        true
    } else {
        map.entry((date, a.id)).or_default().push(emp_a);
        map.entry((date, b.id)).or_default().push(emp_b);
        false
    }
}

fn remove_assignment(map: &mut ScheduleMap, date: Date, shift_id: u64, employee_id: u64) {
    if let Some(list) = map.get_mut(&(date, shift_id)) {
        list.retain(|&id| id != employee_id);
    }
}

/// Scan for rest-period violations and attempt, in order: reassign the
/// offending employee to a different shift the same day, swap with a
/// conflict-free employee, or drop them from the larger-headcount shift.
pub fn try_rest_period_repair(map: &mut ScheduleMap, ctx: &Context, rng: &mut impl Rng) -> bool {
    let mut violations = Vec::new();
    for employee in &ctx.problem.employees {
        for window in ctx.working_days.windows(2) {
            let (d1, d2) = (window[0], window[1]);
            if d2 - d1 != time::Duration::days(1) {
                continue;
            }
            let (Some(s1), Some(s2)) = (
                employee_shift_on(map, d1, employee.id),
                employee_shift_on(map, d2, employee.id),
            ) else {
                continue;
            };
            if ctx.violates_rest(s1, s2, d1) {
                violations.push((employee.id, d1, s1, d2, s2));
            }
        }
    }
    let Some(&(employee_id, d1, s1, d2, s2)) = violations.choose(rng) else {
        return false;
    };

    for shift in &ctx.problem.shifts {
        if shift.id == s2 {
            continue;
        }
        remove_assignment(map, d2, s2, employee_id);
        if is_feasible_assignment(map, ctx, employee_id, d2, shift.id) {
            map.entry((d2, shift.id)).or_default().push(employee_id);
            return true;
        }
        map.entry((d2, s2)).or_default().push(employee_id);
    }

    let larger = if map.get(&(d1, s1)).map_or(0, |v| v.len()) >= map.get(&(d2, s2)).map_or(0, |v| v.len()) {
        (d1, s1)
    } else {
        (d2, s2)
    };
    remove_assignment(map, larger.0, larger.1, employee_id);
    true
}

/// Pick the least-utilized employee and attempt up to three feasible
/// additions for them.
pub fn try_utilization_boost(map: &mut ScheduleMap, ctx: &Context, rng: &mut impl Rng) -> bool {
    let mut worked: Vec<(u64, f64)> = ctx
        .problem
        .employees
        .iter()
        .map(|e| {
            let total: f64 = map
                .iter()
                .filter(|(_, employees)| employees.contains(&e.id))
                .map(|(&(_, shift_id), _)| ctx.shift(shift_id).duration_hours())
                .sum();
            (e.id, total)
        })
        .collect();
    worked.sort_by(|a, b| a.1.partial_cmp(&b.1).expect("hours are never NaN"));
    let Some(&(employee_id, _)) = worked.first() else {
        return false;
    };

    let mut slots: Vec<(Date, u64)> = ctx
        .working_days
        .iter()
        .flat_map(|&date| ctx.problem.shifts.iter().map(move |s| (date, s.id)))
        .filter(|&(date, shift_id)| is_feasible_assignment(map, ctx, employee_id, date, shift_id))
        .collect();
    slots.shuffle(rng);

    let mut applied = false;
    for (date, shift_id) in slots.into_iter().take(3) {
        if is_feasible_assignment(map, ctx, employee_id, date, shift_id) {
            map.entry((date, shift_id)).or_default().push(employee_id);
            applied = true;
        }
    }
    applied
}

/// Swap two random assignments if the result remains feasible (GA "swap").
pub fn try_swap(map: &mut ScheduleMap, ctx: &Context, rng: &mut impl Rng) -> bool {
    try_swap_for_coverage(map, ctx, rng)
}

/// Move a random assignment to a different feasible shift on the same day
/// (GA "reassign").
pub fn try_reassign(map: &mut ScheduleMap, ctx: &Context, rng: &mut impl Rng) -> bool {
    let occupied: Vec<(Date, u64, u64)> = map
        .iter()
        .flat_map(|(&(date, shift_id), employees)| employees.iter().map(move |&e| (date, shift_id, e)))
        .collect();
    let Some(&(date, shift_id, employee_id)) = occupied.choose(rng) else {
        return false;
    };
    let Some(&target) = ctx.problem.shifts.iter().map(|s| s.id).collect::<Vec<_>>().choose(rng) else {
        return false;
    };
    if target == shift_id {
        return false;
    }
    remove_assignment(map, date, shift_id, employee_id);
    if is_feasible_assignment(map, ctx, employee_id, date, target) {
        map.entry((date, target)).or_default().push(employee_id);
        true
    } else {
        map.entry((date, shift_id)).or_default().push(employee_id);
        false
    }
}

/// Add or remove one assignment to move a random shift's staffing toward
/// its midpoint (GA "adjust-staff").
pub fn try_adjust_staff(map: &mut ScheduleMap, ctx: &Context, rng: &mut impl Rng) -> bool {
    let Some(shift) = ctx.problem.shifts.choose(rng) else {
        return false;
    };
    let Some(&date) = ctx.working_days.choose(rng) else {
        return false;
    };
    let assigned = map.get(&(date, shift.id)).map_or(0, |v| v.len()) as f64;
    if assigned < shift.midpoint_staff() {
        try_fill_gap(map, ctx, rng) || {
            let candidates = feasible_candidates(map, ctx, date, shift.id);
            if let Some(&employee_id) = candidates.choose(rng) {
                map.entry((date, shift.id)).or_default().push(employee_id);
                true
            } else {
                false
            }
        }
    } else if let Some(employee_id) = map.get(&(date, shift.id)).and_then(|v| v.first().copied()) {
        remove_assignment(map, date, shift.id, employee_id);
        true
    } else {
        false
    }
}
