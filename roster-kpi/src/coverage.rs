use serde::{Deserialize, Serialize};
use time::Date;

use roster_model::{CoreError, PlanningHorizon, Problem, Schedule};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoverageStatus {
    Understaffed,
    Optimal,
    Overstaffed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageStat {
    pub shift_id: u64,
    pub avg_staff: f64,
    pub coverage_percent: f64,
    pub status: CoverageStatus,
}

/// Average staffing per working day for each shift over `[range_start,
/// range_end]`, with a status tag relative to `min_staff`/`max_staff`.
pub fn coverage_stats(
    schedule: &Schedule,
    problem: &Problem,
    range_start: Date,
    range_end: Date,
) -> Result<Vec<CoverageStat>, CoreError> {
    let horizon = PlanningHorizon::new(range_start, range_end);
    let working_days = roster_calendar::working_days(&horizon, &problem.policy)?;
    let total_working_days = working_days.len().max(1) as f64;

    let mut stats = Vec::with_capacity(problem.shifts.len());
    for shift in &problem.shifts {
        let assigned = schedule
            .entries
            .iter()
            .filter(|e| e.shift_id == shift.id && e.date >= range_start && e.date <= range_end)
            .count();
        let avg_staff = assigned as f64 / total_working_days;
        let coverage_percent = if shift.max_staff > 0 {
            100.0 * avg_staff / shift.max_staff as f64
        } else {
            0.0
        };
        let status = if avg_staff < shift.min_staff as f64 {
            CoverageStatus::Understaffed
        } else if avg_staff > shift.max_staff as f64 {
            CoverageStatus::Overstaffed
        } else {
            CoverageStatus::Optimal
        };
        stats.push(CoverageStat {
            shift_id: shift.id,
            avg_staff,
            coverage_percent,
            status,
        });
    }
    Ok(stats)
}
