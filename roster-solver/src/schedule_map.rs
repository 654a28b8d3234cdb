use std::collections::BTreeMap;

use time::Date;

use roster_model::{Schedule, ScheduleEntry};

use crate::context::Context;

/// The working representation the SA and GA engines mutate: only keys for
/// working days exist (§4.4).
pub type ScheduleMap = BTreeMap<(Date, u64), Vec<u64>>;

pub fn to_schedule(map: &ScheduleMap) -> Schedule {
    let mut entries: Vec<ScheduleEntry> = map
        .iter()
        .flat_map(|(&(date, shift_id), employees)| {
            employees
                .iter()
                .map(move |&employee_id| ScheduleEntry::new(employee_id, date, shift_id))
        })
        .collect();
    entries.sort_by_key(|e| (e.employee_id, e.date, e.shift_id));
    Schedule::new(entries)
}

pub fn empty_map(ctx: &Context) -> ScheduleMap {
    let mut map = ScheduleMap::new();
    for &date in &ctx.working_days {
        for shift in &ctx.problem.shifts {
            map.insert((date, shift.id), Vec::new());
        }
    }
    map
}

/// The shift an employee already works on `date`, if any.
pub fn employee_shift_on(map: &ScheduleMap, date: Date, employee_id: u64) -> Option<u64> {
    map.iter()
        .find(|(&(d, _), employees)| d == date && employees.contains(&employee_id))
        .map(|(&(_, shift_id), _)| shift_id)
}

/// Hours this employee has already been assigned within `week`.
pub fn weekly_hours_so_far(map: &ScheduleMap, ctx: &Context, employee_id: u64, week: roster_utils::IsoWeek) -> f64 {
    map.iter()
        .filter(|(&(date, _), employees)| ctx.iso_week(date) == week && employees.contains(&employee_id))
        .map(|(&(_, shift_id), _)| ctx.shift(shift_id).duration_hours())
        .sum()
}

/// Whether assigning `employee_id` to `shift_id` on `date` is feasible
/// given everything already committed in `map`: not absent, no
/// double-booking that day, the employee's weekly cap still holds, and no
/// new rest-period violation with an adjacent committed day.
pub fn is_feasible_assignment(map: &ScheduleMap, ctx: &Context, employee_id: u64, date: Date, shift_id: u64) -> bool {
    if ctx.is_blocked(employee_id, date) {
        return false;
    }
    if employee_shift_on(map, date, employee_id).is_some() {
        return false;
    }

    let week = ctx.iso_week(date);
    let duration = ctx.shift(shift_id).duration_hours();
    let cap = ctx.employee(employee_id).weekly_hours_cap as f64;
    if weekly_hours_so_far(map, ctx, employee_id, week) + duration > cap {
        return false;
    }

    let previous_day = date.previous_day();
    if let Some(prev) = previous_day {
        if let Some(prev_shift) = employee_shift_on(map, prev, employee_id) {
            if ctx.violates_rest(prev_shift, shift_id, prev) {
                return false;
            }
        }
    }
    if let Some(next) = date.next_day() {
        if let Some(next_shift) = employee_shift_on(map, next, employee_id) {
            if ctx.violates_rest(shift_id, next_shift, date) {
                return false;
            }
        }
    }

    true
}
