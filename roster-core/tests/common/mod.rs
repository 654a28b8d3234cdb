//! Shared fixtures and cross-cutting assertions for the integration suite.
//! Mirrors the teacher's `app::integration_test` helpers (`TestSetup`,
//! `verify_employee_report`) which re-derive an aggregate from the services
//! under test and compare it against what was actually produced.

use std::collections::HashSet;

use time::Date;

use roster_core::{rest_violations, weekly_hours, working_days, Algorithm, CompanyPolicy, Problem, Schedule, SolveConfig, SolveResult};

pub fn default_policy() -> CompanyPolicy {
    CompanyPolicy::default()
}

pub fn algorithms() -> [Algorithm; 3] {
    [Algorithm::Ilp, Algorithm::Sa, Algorithm::Ga]
}

/// Shrinks SA/GA iteration counts so these toy-sized instances don't run
/// the full default budget.
pub fn tune_for_toy_instance(problem: &mut Problem) {
    problem.sa.max_iters = 500;
    problem.ga.population = 12;
    problem.ga.generations = 15;
}

pub fn solve(problem: &Problem) -> SolveResult {
    roster_core::solve(problem, SolveConfig::new()).expect("a validated, structurally sound problem should never error")
}

/// Every hard invariant from the testable-properties list that holds
/// regardless of which scenario produced the schedule: no double-booking,
/// no entry on a blocked day, no rest-period violation, staffing never
/// exceeds `max_staff`, and nobody's ISO week ever exceeds their cap.
pub fn assert_structurally_feasible(problem: &Problem, result: &SolveResult) {
    let schedule = Schedule::new(result.entries.clone());

    let mut seen: HashSet<(u64, Date)> = HashSet::new();
    for entry in &schedule.entries {
        assert!(
            seen.insert((entry.employee_id, entry.date)),
            "employee {} double-booked on {:?}",
            entry.employee_id,
            entry.date
        );
    }

    let working: HashSet<Date> = working_days(&problem.horizon, &problem.policy)
        .expect("policy covers every year this horizon touches")
        .into_iter()
        .collect();
    for entry in &schedule.entries {
        assert!(working.contains(&entry.date), "entry on non-working day {:?}", entry.date);
        let employee = problem
            .employees
            .iter()
            .find(|e| e.id == entry.employee_id)
            .expect("entries only ever name employees from the problem");
        assert!(!employee.is_absent(entry.date), "entry on employee {}'s absence day {:?}", employee.id, entry.date);
        assert!(
            !problem.policy.extra_blocked_dates.contains(&entry.date),
            "entry on an extra-blocked date {:?}",
            entry.date
        );
    }

    let (rest_violation_count, _) = rest_violations(&schedule, problem, problem.horizon.start_date, problem.horizon.end_date);
    assert_eq!(rest_violation_count, 0, "schedule contains a rest-period violation");

    for shift in &problem.shifts {
        for &date in &working {
            let count = schedule.entries.iter().filter(|e| e.date == date && e.shift_id == shift.id).count() as u32;
            assert!(count <= shift.max_staff, "shift {} overstaffed on {:?}: {count} > {}", shift.id, date, shift.max_staff);
        }
    }

    let weekly = weekly_hours(&schedule, problem, problem.horizon.start_date, problem.horizon.end_date);
    for employee in &problem.employees {
        if let Some(weeks) = weekly.get(&employee.id) {
            for (week, hours) in weeks {
                assert!(
                    *hours <= employee.weekly_hours_cap as f64 + 1e-9,
                    "employee {} exceeded their weekly cap in {week:?}: {hours} > {}",
                    employee.id,
                    employee.weekly_hours_cap
                );
            }
        }
    }
}
