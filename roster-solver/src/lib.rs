//! The three `Solver` implementations (§4.3–4.5): `IlpSolver`, `SaSolver`
//! and `GaSolver`, plus the shared context/objective machinery they build
//! on. `roster-core` dispatches on `Problem::algorithm` to pick one.

mod context;
mod ga;
mod ilp;
mod moves;
mod objective;
mod sa;
mod schedule_map;

pub use ga::GaSolver;
pub use ilp::IlpSolver;
pub use sa::SaSolver;

pub use context::Context;
pub use objective::evaluate as objective_value;
pub use schedule_map::{to_schedule, ScheduleMap};

use roster_model::{Algorithm, CancelToken, CoreError, Problem, SolveResult, Solver};

/// Dispatches to the solver named by `problem.algorithm`.
pub fn solve(problem: &Problem, cancel: &CancelToken) -> Result<SolveResult, CoreError> {
    let seed = problem.seed;
    match problem.algorithm {
        Algorithm::Ilp => IlpSolver.solve(problem, seed, cancel),
        Algorithm::Sa => SaSolver.solve(problem, seed, cancel),
        Algorithm::Ga => GaSolver.solve(problem, seed, cancel),
    }
}
