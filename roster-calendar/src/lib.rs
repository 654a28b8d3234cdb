//! C1: Calendar & Policy — classifies calendar dates and (employee, date)
//! pairs. Grounded in the teacher's `shifty-utils::date_utils` week
//! arithmetic and `original_source/rostering_app/utils.py`'s holiday and
//! working-day helpers.

mod holidays;

use time::{Date, Month, Weekday};

use roster_model::{CompanyPolicy, CoreError, Employee, PlanningHorizon};
use roster_utils::weekday_index;

pub use holidays::{fallback_holidays, holidays_2024, holidays_2025, holidays_2026};

const ROUND_TO_HOURS: u32 = 8;

/// True if `date` is a public holiday under `policy`. Years 2024-2026 use
/// hand-curated tables; any other year fails fast unless `policy` supplies
/// an explicit override for that year (§9 open question, resolved).
pub fn is_holiday(date: Date, policy: &CompanyPolicy) -> Result<bool, CoreError> {
    let key = (date.month() as u8, date.day());
    if let Some(table) = policy.holiday_table.get(&date.year()) {
        return Ok(table.contains(&key));
    }
    match holidays::builtin_table_for_year(date.year()) {
        Some(table) => Ok(table.contains(&key)),
        None => Err(CoreError::invalid(
            "date.year",
            format!(
                "no holiday table for year {}; supply CompanyPolicy::holiday_table to override",
                date.year()
            ),
        )),
    }
}

/// Holiday, or a Sunday when the company doesn't work Sundays.
pub fn is_non_working(date: Date, policy: &CompanyPolicy) -> Result<bool, CoreError> {
    if is_holiday(date, policy)? {
        return Ok(true);
    }
    Ok(date.weekday() == Weekday::Sunday && !policy.sunday_is_workday)
}

/// Non-working, an employee-specific absence, or an extra blocked date.
pub fn is_blocked(employee: &Employee, date: Date, policy: &CompanyPolicy) -> Result<bool, CoreError> {
    if is_non_working(date, policy)? {
        return Ok(true);
    }
    Ok(employee.is_absent(date) || policy.extra_blocked_dates.contains(&date))
}

/// All working days within `horizon`, in ascending order.
pub fn working_days(horizon: &PlanningHorizon, policy: &CompanyPolicy) -> Result<Vec<Date>, CoreError> {
    let mut days = Vec::new();
    for date in horizon.dates() {
        if !is_non_working(date, policy)? {
            days.push(date);
        }
    }
    Ok(days)
}

/// Whether `date`'s weekday falls within the company's workweek, i.e. a
/// distinct concept from `sunday_is_workday`: `workweek_size` counts
/// weekdays starting Monday (5 = Mon-Fri, 6 adds Saturday, 7 adds Sunday).
fn is_company_workday(date: Date, policy: &CompanyPolicy) -> Result<bool, CoreError> {
    if weekday_index(date.weekday()) >= policy.workweek_size {
        return Ok(false);
    }
    Ok(!is_holiday(date, policy)?)
}

/// Round-half-to-even, matching Python 3's `round()` (the original this
/// crate is grounded on uses it for `expected_shifts_raw`, which lands on an
/// exact `.5` whenever `workdays_in_month * shifts_per_week` is a multiple of
/// `workweek_size / 2`). Rust's `f64::round` rounds half away from zero and
/// would disagree with the original at exactly those ties.
fn round_half_to_even(value: f64) -> i64 {
    if value.fract().abs() == 0.5 {
        let lower = value.floor();
        let lower_is_even = (lower as i64).rem_euclid(2) == 0;
        if lower_is_even {
            lower as i64
        } else {
            lower as i64 + 1
        }
    } else {
        value.round() as i64
    }
}

fn round_to_multiple_of_8(hours: i64) -> i64 {
    let remainder = hours.rem_euclid(ROUND_TO_HOURS as i64);
    if remainder * 2 >= ROUND_TO_HOURS as i64 {
        hours - remainder + ROUND_TO_HOURS as i64
    } else {
        hours - remainder
    }
}

fn days_in_month(year: i32, month: Month) -> u8 {
    month.length(year)
}

/// The number of hours this employee is expected to work in `year`/`month`,
/// per `kpi_calculator.py::calculate_expected_month_hours`: count company
/// workdays in the month, scale by the employee's weekly-cap-derived shift
/// rate, subtract the employee's absences that fall on a company workday,
/// convert to hours, round to the nearest multiple of 8, clamp at 0.
pub fn expected_month_hours(
    employee: &Employee,
    year: i32,
    month: u8,
    policy: &CompanyPolicy,
) -> Result<u32, CoreError> {
    let month = Month::try_from(month)
        .map_err(|_| CoreError::invalid("month", format!("{month} is not a valid month")))?;

    let mut workdays_in_month: u32 = 0;
    let mut absences_on_workdays: u32 = 0;
    for day in 1..=days_in_month(year, month) {
        let date = Date::from_calendar_date(year, month, day)
            .map_err(|e| CoreError::invalid("date", e.to_string()))?;
        if is_company_workday(date, policy)? {
            workdays_in_month += 1;
            if employee.is_absent(date) {
                absences_on_workdays += 1;
            }
        }
    }

    let shifts_per_week = employee.weekly_hours_cap as f64 / 8.0;
    let expected_shifts_raw =
        workdays_in_month as f64 * shifts_per_week / policy.workweek_size as f64;
    let expected_shifts = round_half_to_even(expected_shifts_raw) - absences_on_workdays as i64;
    let expected_hours = expected_shifts * 8;
    let rounded = round_to_multiple_of_8(expected_hours);
    Ok(rounded.max(0) as u32)
}

/// Sum of the 12 monthly values for `year` (exact, no extra rounding noise).
pub fn expected_year_hours(employee: &Employee, year: i32, policy: &CompanyPolicy) -> Result<u32, CoreError> {
    let mut total = 0u32;
    for month in 1..=12u8 {
        total += expected_month_hours(employee, year, month, policy)?;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn policy() -> CompanyPolicy {
        CompanyPolicy::new(false, 5)
    }

    #[test]
    fn new_year_is_holiday() {
        assert!(is_holiday(date!(2025 - 01 - 01), &policy()).unwrap());
    }

    #[test]
    fn unknown_year_fails_fast() {
        assert!(is_holiday(date!(2030 - 01 - 01), &policy()).is_err());
    }

    #[test]
    fn caller_override_resolves_unknown_year() {
        let mut p = policy();
        p.holiday_table.insert(2030, [(1u8, 1u8)].into_iter().collect());
        assert!(is_holiday(date!(2030 - 01 - 01), &p).unwrap());
        assert!(!is_holiday(date!(2030 - 01 - 02), &p).unwrap());
    }

    #[test]
    fn sunday_is_non_working_by_default() {
        // 2025-01-05 is a Sunday.
        assert!(is_non_working(date!(2025 - 01 - 05), &policy()).unwrap());
    }

    #[test]
    fn sunday_workday_policy_overrides() {
        let p = CompanyPolicy::new(true, 6);
        assert!(!is_non_working(date!(2025 - 01 - 05), &p).unwrap());
    }

    #[test]
    fn working_days_excludes_holiday_and_sunday() {
        let horizon = PlanningHorizon::new(date!(2025 - 01 - 01), date!(2025 - 01 - 05));
        let days = working_days(&horizon, &policy()).unwrap();
        // 01-01 holiday, 01-05 Sunday excluded; 02,03,04 remain.
        assert_eq!(days, vec![date!(2025 - 01 - 02), date!(2025 - 01 - 03), date!(2025 - 01 - 04)]);
    }

    #[test]
    fn expected_year_hours_is_sum_of_months() {
        let employee = Employee::new(1, "Alice", 40);
        let p = policy();
        let year_total = expected_year_hours(&employee, 2025, &p).unwrap();
        let month_sum: u32 = (1..=12)
            .map(|m| expected_month_hours(&employee, 2025, m, &p).unwrap())
            .sum();
        assert_eq!(year_total, month_sum);
    }

    #[test]
    fn absence_reduces_expected_month_hours() {
        let p = policy();
        let base = Employee::new(1, "Alice", 40);
        let with_absence = Employee::new(1, "Alice", 40).with_absences([date!(2025 - 01 - 02)]);
        let base_hours = expected_month_hours(&base, 2025, 1, &p).unwrap();
        let reduced_hours = expected_month_hours(&with_absence, 2025, 1, &p).unwrap();
        assert!(reduced_hours <= base_hours);
    }
}
