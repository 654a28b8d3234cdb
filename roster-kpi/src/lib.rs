//! C2: KPI Evaluator — pure, deterministic functions over `(Schedule,
//! Problem)`. No hidden state; grounded in
//! `original_source/rostering_app/services/kpi_calculator.py`.

mod analytics;
mod coverage;
mod fairness;
mod hours;
mod lookups;
mod rest;
mod shift_hours;

pub use analytics::{company_analytics, CompanyAnalytics};
pub use coverage::{coverage_stats, CoverageStat, CoverageStatus};
pub use fairness::{gini, jain_index, utilization};
pub use hours::{employee_hours, weekly_hours, weekly_violation_threshold, weekly_violations, WeeklyViolation};
pub use rest::{rest_violations, RestViolation};
pub use shift_hours::shift_hours_in_range;
