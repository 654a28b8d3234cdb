use std::collections::HashMap;

use time::Date;

use roster_model::{CoreError, Employee, Problem, ShiftTemplate};
use roster_utils::IsoWeek;

/// Precomputed, read-only lookups shared by the SA and GA engines so that
/// neither recomputes calendar classification or shift durations inside a
/// hot loop (the invariant §3 requires for derived fields).
pub struct Context<'p> {
    pub problem: &'p Problem,
    pub working_days: Vec<Date>,
    shifts_by_id: HashMap<u64, &'p ShiftTemplate>,
    employees_by_id: HashMap<u64, &'p Employee>,
    blocked: HashMap<(u64, Date), bool>,
    expected_month_hours: HashMap<(u64, i32, u8), u32>,
}

impl<'p> Context<'p> {
    pub fn build(problem: &'p Problem) -> Result<Self, CoreError> {
        let working_days = roster_calendar::working_days(&problem.horizon, &problem.policy)?;

        let shifts_by_id = problem.shifts.iter().map(|s| (s.id, s)).collect();
        let employees_by_id = problem.employees.iter().map(|e| (e.id, e)).collect();

        let mut blocked = HashMap::new();
        for employee in &problem.employees {
            for &date in &working_days {
                let is_blocked = roster_calendar::is_blocked(employee, date, &problem.policy)?;
                blocked.insert((employee.id, date), is_blocked);
            }
        }

        let mut expected_month_hours = HashMap::new();
        for employee in &problem.employees {
            let mut year = problem.horizon.start_date.year();
            let mut month = problem.horizon.start_date.month() as u8;
            let (end_year, end_month) = (problem.horizon.end_date.year(), problem.horizon.end_date.month() as u8);
            loop {
                let hours = roster_calendar::expected_month_hours(employee, year, month, &problem.policy)?;
                expected_month_hours.insert((employee.id, year, month), hours);
                if year == end_year && month == end_month {
                    break;
                }
                if month == 12 {
                    month = 1;
                    year += 1;
                } else {
                    month += 1;
                }
            }
        }

        Ok(Self {
            problem,
            working_days,
            shifts_by_id,
            employees_by_id,
            blocked,
            expected_month_hours,
        })
    }

    pub fn shift(&self, shift_id: u64) -> &'p ShiftTemplate {
        self.shifts_by_id[&shift_id]
    }

    pub fn employee(&self, employee_id: u64) -> &'p Employee {
        self.employees_by_id[&employee_id]
    }

    pub fn is_blocked(&self, employee_id: u64, date: Date) -> bool {
        *self.blocked.get(&(employee_id, date)).unwrap_or(&true)
    }

    pub fn expected_month_hours(&self, employee_id: u64, date: Date) -> u32 {
        *self
            .expected_month_hours
            .get(&(employee_id, date.year(), date.month() as u8))
            .unwrap_or(&0)
    }

    pub fn expected_month_hours_ym(&self, employee_id: u64, year: i32, month: u8) -> u32 {
        *self.expected_month_hours.get(&(employee_id, year, month)).unwrap_or(&0)
    }

    /// Every (year, month) touched by the horizon, ascending.
    pub fn touched_months(&self) -> Vec<(i32, u8)> {
        let mut months: Vec<(i32, u8)> = self
            .expected_month_hours
            .keys()
            .map(|&(_, year, month)| (year, month))
            .collect();
        months.sort_unstable();
        months.dedup();
        months
    }

    /// This employee's total expected hours across every month touched by
    /// the horizon — stands in for a literal calendar-year figure when the
    /// horizon spans a partial year (§4.3's yearly total/fairness-band
    /// constraints and §4.4's utilization band both need the same
    /// denominator).
    pub fn expected_total_hours(&self, employee_id: u64) -> f64 {
        self.touched_months()
            .into_iter()
            .map(|(year, month)| self.expected_month_hours_ym(employee_id, year, month) as f64)
            .sum()
    }

    /// Hours this employee could possibly work across every non-blocked
    /// (day, shift) pair in the horizon, used for the fairness band.
    pub fn possible_hours(&self, employee_id: u64) -> f64 {
        let mut total = 0.0;
        for &date in &self.working_days {
            if self.is_blocked(employee_id, date) {
                continue;
            }
            for shift in &self.problem.shifts {
                total += shift.duration_hours();
            }
        }
        total
    }

    /// Real clock gap, in hours, between `shift1` ending on `date` and
    /// `shift2` starting the following day.
    pub fn rest_gap_hours(&self, shift1_id: u64, shift2_id: u64, date: Date) -> f64 {
        let shift1 = self.shift(shift1_id);
        let shift2 = self.shift(shift2_id);
        let mut end_first = time::PrimitiveDateTime::new(date, shift1.end_time);
        if shift1.wraps_midnight() {
            end_first += time::Duration::days(1);
        }
        let start_second = time::PrimitiveDateTime::new(date + time::Duration::days(1), shift2.start_time);
        (start_second - end_first).whole_seconds() as f64 / 3600.0
    }

    pub fn violates_rest(&self, shift1_id: u64, shift2_id: u64, date: Date) -> bool {
        self.rest_gap_hours(shift1_id, shift2_id, date) < 11.0
    }

    pub fn iso_week(&self, date: Date) -> IsoWeek {
        IsoWeek::of(date)
    }
}
