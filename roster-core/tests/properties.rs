//! Property-based invariant suite over small randomly generated problems,
//! grounded in the teacher's `app::integration_test` `prop_compose!`/
//! `proptest!` style.

mod common;

use common::*;
use proptest::prelude::*;
use time::macros::{date, time};
use time::Duration;

use roster_core::{Algorithm, Employee, PlanningHorizon, Problem, ShiftTemplate};

/// Monday, holiday-free in the built-in German table (the next one after
/// New Year / Epiphany falls in April).
fn epoch_monday() -> time::Date {
    date!(2025 - 01 - 13)
}

prop_compose! {
    fn arb_problem()(
        employee_count in 1..=3usize,
        min_staff in 0..=1u32,
        extra_capacity in 0..=2u32,
        horizon_days in 1..=10i64,
        algorithm in prop_oneof![Just(Algorithm::Sa), Just(Algorithm::Ga)],
        seed in any::<u64>(),
    ) -> Problem {
        let employees = (1..=employee_count as u64)
            .map(|id| Employee::new(id, format!("Employee{id}"), 40))
            .collect();
        let shifts = vec![ShiftTemplate::new(
            1,
            "Day",
            time!(08:00),
            time!(16:00),
            min_staff,
            min_staff + extra_capacity,
        )];
        let horizon = PlanningHorizon::new(epoch_monday(), epoch_monday() + Duration::days(horizon_days - 1));
        let mut problem = Problem::new(employees, shifts, horizon, default_policy(), algorithm).with_seed(seed);
        tune_for_toy_instance(&mut problem);
        problem
    }
}

proptest! {
    #[test]
    fn any_solved_problem_satisfies_the_hard_invariants(problem in arb_problem()) {
        let result = solve(&problem);
        assert_structurally_feasible(&problem, &result);
    }

    #[test]
    fn solving_the_same_problem_twice_is_deterministic(problem in arb_problem()) {
        let first = solve(&problem);
        let second = solve(&problem);
        prop_assert_eq!(first.entries, second.entries);
        prop_assert_eq!(first.status, second.status);
        prop_assert_eq!(first.objective, second.objective);
    }
}
