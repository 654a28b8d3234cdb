use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::{Date, Month};

use roster_model::{CoreError, Problem, Schedule};

use crate::fairness::gini;
use crate::hours::{employee_hours, weekly_violations};
use crate::rest::rest_violations;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyAnalytics {
    pub total_hours_worked: f64,
    pub avg_hours_per_employee: f64,
    /// Sample standard deviation (n-1 denominator), matching
    /// `kpi_calculator.py::calculate_company_analytics`.
    pub hours_std_dev: f64,
    pub hours_cv: f64,
    pub gini_coefficient: f64,
    pub min_hours: f64,
    pub max_hours: f64,
    pub total_weekly_violations: usize,
    pub rest_period_violations: usize,
    pub employee_hours: HashMap<u64, f64>,
}

/// Aggregates hours, fairness and violation counts for `year`/`month`.
pub fn company_analytics(
    schedule: &Schedule,
    problem: &Problem,
    year: i32,
    month: u8,
) -> Result<CompanyAnalytics, CoreError> {
    let month_enum = Month::try_from(month)
        .map_err(|_| CoreError::invalid("month", format!("{month} is not a valid month")))?;
    let month_start = Date::from_calendar_date(year, month_enum, 1)
        .map_err(|e| CoreError::invalid("date", e.to_string()))?;
    let month_end = Date::from_calendar_date(year, month_enum, month_enum.length(year))
        .map_err(|e| CoreError::invalid("date", e.to_string()))?;

    let hours = employee_hours(schedule, problem, month_start, month_end);
    let mut hours_list: Vec<f64> = hours.values().copied().collect();
    hours_list.sort_by(|a, b| a.partial_cmp(b).expect("hour totals are never NaN"));

    let total_hours_worked: f64 = hours_list.iter().sum();
    let n = hours_list.len();
    let avg_hours_per_employee = if n > 0 {
        total_hours_worked / n as f64
    } else {
        0.0
    };

    let (hours_std_dev, hours_cv) = if n > 1 {
        let variance: f64 = hours_list
            .iter()
            .map(|h| (h - avg_hours_per_employee).powi(2))
            .sum::<f64>()
            / (n as f64 - 1.0);
        let std_dev = variance.sqrt();
        let cv = if avg_hours_per_employee > 0.0 {
            100.0 * std_dev / avg_hours_per_employee
        } else {
            0.0
        };
        (std_dev, cv)
    } else {
        (0.0, 0.0)
    };

    let gini_coefficient = gini(&hours_list);
    let min_hours = hours_list.first().copied().unwrap_or(0.0);
    let max_hours = hours_list.last().copied().unwrap_or(0.0);

    let (total_weekly_violations, _) = weekly_violations(schedule, problem, month_start, month_end);
    let (rest_period_violations, _) = rest_violations(schedule, problem, month_start, month_end);

    Ok(CompanyAnalytics {
        total_hours_worked,
        avg_hours_per_employee,
        hours_std_dev,
        hours_cv,
        gini_coefficient,
        min_hours,
        max_hours,
        total_weekly_violations,
        rest_period_violations,
        employee_hours: hours,
    })
}
