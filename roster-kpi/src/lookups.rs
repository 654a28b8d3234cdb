use roster_model::{Employee, Problem, ShiftTemplate};

pub(crate) fn shift_by_id(problem: &Problem, shift_id: u64) -> Option<&ShiftTemplate> {
    problem.shifts.iter().find(|s| s.id == shift_id)
}

pub(crate) fn employee_by_id(problem: &Problem, employee_id: u64) -> Option<&Employee> {
    problem.employees.iter().find(|e| e.id == employee_id)
}
