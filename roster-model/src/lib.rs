//! Entities, error taxonomy and the `Solver` seam shared by every roster
//! core crate. Mirrors the teacher's `service` crate: this crate defines
//! contracts and data, `roster-solver` supplies the implementations.

mod company_policy;
mod config;
mod employee;
mod error;
mod planning_horizon;
mod problem;
mod schedule;
mod shift_template;
mod solver;

pub use company_policy::CompanyPolicy;
pub use config::{Algorithm, CoolingSchedule, GaConfig, IlpConfig, SaConfig};
pub use employee::Employee;
pub use error::CoreError;
pub use planning_horizon::PlanningHorizon;
pub use problem::Problem;
pub use schedule::{Schedule, ScheduleEntry};
pub use shift_template::ShiftTemplate;
pub use solver::{CancelToken, SolveResult, SolveStatus, Solver};
