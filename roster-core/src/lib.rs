//! Single in-process library surface over the shift-rostering core (§6).
//! Re-exports every public type from `roster-model`, `roster-calendar` and
//! `roster-kpi`, and provides the one façade operation, `solve`, that
//! validates a `Problem` and dispatches to whichever engine it names —
//! mirrors the teacher's `app` wiring crate, minus the HTTP/DB layers.

mod config;

pub use config::SolveConfig;

pub use roster_model::{
    Algorithm, CancelToken, CompanyPolicy, CoolingSchedule, CoreError, Employee, GaConfig, IlpConfig, PlanningHorizon,
    Problem, SaConfig, Schedule, ScheduleEntry, ShiftTemplate, SolveResult, SolveStatus, Solver,
};

pub use roster_calendar::{expected_month_hours, expected_year_hours, is_blocked, is_holiday, is_non_working, working_days};

pub use roster_kpi::{
    company_analytics, coverage_stats, employee_hours, gini, jain_index, rest_violations, shift_hours_in_range,
    utilization, weekly_hours, weekly_violations, weekly_violation_threshold, CompanyAnalytics, CoverageStat,
    CoverageStatus, RestViolation, WeeklyViolation,
};

/// Validates `problem` and delegates to the engine named by
/// `problem.algorithm`. A time-limited or cancelled solve is still `Ok` —
/// see `SolveStatus`; only invalid input or an internal invariant break is
/// `Err` (§4.6).
pub fn solve(problem: &Problem, config: SolveConfig) -> Result<SolveResult, CoreError> {
    problem.validate()?;
    tracing::info!(algorithm = ?problem.algorithm, "dispatching solve");
    roster_solver::solve(problem, &config.cancel)
}
