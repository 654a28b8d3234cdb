use serde::{Deserialize, Serialize};

use crate::company_policy::CompanyPolicy;
use crate::config::{Algorithm, GaConfig, IlpConfig, SaConfig};
use crate::employee::Employee;
use crate::error::CoreError;
use crate::planning_horizon::PlanningHorizon;
use crate::shift_template::ShiftTemplate;

/// The full input to a solve: workforce, shift catalogue, horizon, policy
/// and the chosen engine's configuration. Owns all of its entities;
/// a `Schedule` produced from it holds only ids, never a reference back in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    pub employees: Vec<Employee>,
    pub shifts: Vec<ShiftTemplate>,
    pub horizon: PlanningHorizon,
    pub policy: CompanyPolicy,
    pub algorithm: Algorithm,
    pub ilp: IlpConfig,
    pub sa: SaConfig,
    pub ga: GaConfig,
    pub seed: Option<u64>,
}

impl Problem {
    pub fn new(
        employees: Vec<Employee>,
        shifts: Vec<ShiftTemplate>,
        horizon: PlanningHorizon,
        policy: CompanyPolicy,
        algorithm: Algorithm,
    ) -> Self {
        Self {
            employees,
            shifts,
            horizon,
            policy,
            algorithm,
            ilp: IlpConfig::default(),
            sa: SaConfig::default(),
            ga: GaConfig::default(),
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the structural invariants the façade promises before ever
    /// delegating to a solver (§4.6). Surfaces the first violation found;
    /// no partial work is attempted on an invalid `Problem`.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.employees.is_empty() {
            return Err(CoreError::invalid("employees", "must not be empty"));
        }
        if self.shifts.is_empty() {
            return Err(CoreError::invalid("shifts", "must not be empty"));
        }
        if self.horizon.is_empty_or_inverted() {
            return Err(CoreError::invalid(
                "horizon",
                "end_date must be >= start_date",
            ));
        }
        if !(5..=7).contains(&self.policy.workweek_size) {
            return Err(CoreError::invalid(
                "policy.workweek_size",
                "must be between 5 and 7",
            ));
        }
        for employee in &self.employees {
            if employee.weekly_hours_cap % 8 != 0 {
                return Err(CoreError::invalid(
                    "employee.weekly_hours_cap",
                    format!(
                        "employee {} has weekly_hours_cap {} which is not a multiple of 8",
                        employee.id, employee.weekly_hours_cap
                    ),
                ));
            }
        }
        for shift in &self.shifts {
            if shift.min_staff > shift.max_staff {
                return Err(CoreError::invalid(
                    "shift.min_staff",
                    format!(
                        "shift {} has min_staff {} greater than max_staff {}",
                        shift.id, shift.min_staff, shift.max_staff
                    ),
                ));
            }
            if shift.duration_hours() <= 0.0 {
                return Err(CoreError::invalid(
                    "shift.duration_hours",
                    format!("shift {} has non-positive duration after wrap", shift.id),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, time};

    fn sample_problem() -> Problem {
        Problem::new(
            vec![Employee::new(1, "Alice", 40)],
            vec![ShiftTemplate::new(1, "Early", time!(08:00), time!(16:00), 1, 2)],
            PlanningHorizon::new(date!(2025 - 01 - 06), date!(2025 - 01 - 12)),
            CompanyPolicy::default(),
            Algorithm::Ilp,
        )
    }

    #[test]
    fn valid_problem_passes() {
        assert!(sample_problem().validate().is_ok());
    }

    #[test]
    fn empty_employees_rejected() {
        let mut problem = sample_problem();
        problem.employees.clear();
        assert!(matches!(
            problem.validate(),
            Err(CoreError::InvalidInput { field: "employees", .. })
        ));
    }

    #[test]
    fn non_multiple_of_eight_cap_rejected() {
        let mut problem = sample_problem();
        problem.employees[0].weekly_hours_cap = 37;
        assert!(problem.validate().is_err());
    }

    #[test]
    fn inverted_horizon_rejected() {
        let mut problem = sample_problem();
        problem.horizon = PlanningHorizon::new(date!(2025 - 01 - 12), date!(2025 - 01 - 06));
        assert!(problem.validate().is_err());
    }

    #[test]
    fn min_staff_above_max_rejected() {
        let mut problem = sample_problem();
        problem.shifts[0].min_staff = 5;
        problem.shifts[0].max_staff = 2;
        assert!(problem.validate().is_err());
    }
}
