//! Branch-and-bound ILP model (§4.3), built with `good_lp` the way the
//! retrieved corpus models linear programs in Rust: a `variables!()` builder,
//! `constraint!` macros folded onto the model, then `.solve()`.

use std::collections::HashMap;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use good_lp::solvers::highs::HighsModelStatus;
use good_lp::{constraint, default_solver, variable, variables, Expression, Solution, SolverModel, Variable};
use time::Date;
use tracing::{info, warn};

use roster_model::{CancelToken, CoreError, Problem, ScheduleEntry, SolveResult, SolveStatus, Solver};

use crate::context::Context;

pub const W_OVER: f64 = 1e7;
pub const W_UNDER: f64 = 1e6;
pub const W_OPTDEV: f64 = 1e5;
pub const W_OT: f64 = 5e4;
pub const W_UT: f64 = 2.5e4;
pub const W_MU_FAIR: f64 = 5e4;
pub const W_FAIR: f64 = 7.5e4;
pub const W_PREF: f64 = -5.0;
pub const W_UTIL: f64 = -50.0;

pub struct IlpSolver;

impl Solver for IlpSolver {
    fn solve(&self, problem: &Problem, _seed: Option<u64>, cancel: &CancelToken) -> Result<SolveResult, CoreError> {
        problem.validate()?;
        let ctx = Context::build(problem)?;

        if cancel.is_cancelled() {
            return Ok(SolveResult::empty(SolveStatus::Cancelled));
        }

        let months = ctx.touched_months();
        let mut vars = variables!();

        let x = build_assignment_vars(&mut vars, problem, &ctx);
        let (under, over, dev) = build_coverage_slacks(&mut vars, problem, &ctx);
        let (ot, ut, mu_def) = build_monthly_vars(&mut vars, problem, &ctx, &months);
        let total_hours = build_total_hours_vars(&mut vars, problem);
        let alpha_min = vars.add(variable().clamp(0.0, 1.0));
        let alpha_max = vars.add(variable().clamp(0.0, 1.0));

        let objective = build_objective(
            problem, &ctx, &x, &under, &over, &dev, &ot, &ut, &mu_def, &total_hours, alpha_min, alpha_max,
        );

        let threads = problem.ilp.threads.unwrap_or_else(|| num_cpus::get().saturating_sub(2).max(1));
        info!(
            threads,
            time_limit_s = problem.ilp.time_limit_s,
            rel_gap = problem.ilp.rel_gap,
            "ILP model built, starting solve"
        );

        let mut model = vars.minimise(objective).using(default_solver);
        model.set_option("time_limit", problem.ilp.time_limit_s as f64);
        model.set_option("threads", threads as i32);
        if problem.ilp.rel_gap > 0.0 {
            model.set_option("mip_rel_gap", problem.ilp.rel_gap);
        }

        model = add_one_shift_per_day_constraints(model, problem, &ctx, &x);
        model = add_coverage_constraints(model, problem, &ctx, &x, &under, &over, &dev);
        model = add_rest_period_constraints(model, &ctx, &x);
        model = add_monthly_constraints(model, problem, &ctx, &x, &ot, &ut, &mu_def, &months);
        model = add_yearly_constraints(model, &ctx, &x, &total_hours);
        model = add_fairness_constraints(model, &ctx, &total_hours, alpha_min, alpha_max);

        // HiGHS's own `time_limit` option is the primary bound; the worker
        // thread lets us poll `cancel` while that blocking solve runs
        // instead of only checking it before the model was ever built.
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(model.solve());
        });

        let backstop = Duration::from_secs(problem.ilp.time_limit_s.max(1)) + Duration::from_secs(5);
        let started = Instant::now();
        let solution = loop {
            if cancel.is_cancelled() {
                warn!("ILP solve cancelled while HiGHS was still searching");
                return Ok(SolveResult::empty(SolveStatus::Cancelled));
            }
            match rx.recv_timeout(Duration::from_millis(50)) {
                Ok(outcome) => break outcome,
                Err(mpsc::RecvTimeoutError::Timeout) => {
                    if started.elapsed() >= backstop {
                        warn!("HiGHS did not return within its configured time limit plus margin");
                        return Ok(SolveResult::empty(SolveStatus::TimeLimit));
                    }
                }
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    return Err(CoreError::internal("ILP worker thread exited without a result"));
                }
            }
        };

        let solution = match solution {
            Ok(solution) => solution,
            Err(err) => {
                warn!(%err, "ILP model proved infeasible or failed to solve");
                return Ok(SolveResult::empty(SolveStatus::Infeasible));
            }
        };

        let status = match solution.status() {
            HighsModelStatus::Optimal => SolveStatus::Optimal,
            HighsModelStatus::TimeLimit | HighsModelStatus::IterationLimit => SolveStatus::TimeLimit,
            other => {
                warn!(?other, "HiGHS returned a non-optimal status alongside a feasible incumbent");
                SolveStatus::Feasible
            }
        };

        let mut entries = Vec::new();
        for (&(employee_id, date, shift_id), &var) in &x {
            if solution.value(var) > 0.5 {
                entries.push(ScheduleEntry::new(employee_id, date, shift_id));
            }
        }
        entries.sort_by_key(|e| (e.employee_id, e.date, e.shift_id));

        let mut result = SolveResult::empty(status);
        result.objective = solution.eval(&build_objective(
            problem, &ctx, &x, &under, &over, &dev, &ot, &ut, &mu_def, &total_hours, alpha_min, alpha_max,
        ));
        if status == SolveStatus::TimeLimit {
            result.gap = Some(problem.ilp.rel_gap);
        }
        result.entries = entries;
        Ok(result)
    }
}

type AssignmentVars = HashMap<(u64, Date, u64), Variable>;
type SlackVars = HashMap<(Date, u64), Variable>;
type MonthlyVars = HashMap<(u64, i32, u8), Variable>;
type TotalHoursVars = HashMap<u64, Variable>;

fn build_assignment_vars(vars: &mut good_lp::ProblemVariables, problem: &Problem, ctx: &Context) -> AssignmentVars {
    let mut x = HashMap::new();
    for employee in &problem.employees {
        for &date in &ctx.working_days {
            if ctx.is_blocked(employee.id, date) {
                continue;
            }
            for shift in &problem.shifts {
                x.insert((employee.id, date, shift.id), vars.add(variable().binary()));
            }
        }
    }
    x
}

fn build_coverage_slacks(
    vars: &mut good_lp::ProblemVariables,
    problem: &Problem,
    ctx: &Context,
) -> (SlackVars, SlackVars, SlackVars) {
    let mut under = HashMap::new();
    let mut over = HashMap::new();
    let mut dev = HashMap::new();
    for &date in &ctx.working_days {
        for shift in &problem.shifts {
            under.insert((date, shift.id), vars.add(variable().min(0.0)));
            over.insert((date, shift.id), vars.add(variable().min(0.0)));
            dev.insert((date, shift.id), vars.add(variable().min(0.0)));
        }
    }
    (under, over, dev)
}

fn build_monthly_vars(
    vars: &mut good_lp::ProblemVariables,
    problem: &Problem,
    ctx: &Context,
    months: &[(i32, u8)],
) -> (MonthlyVars, MonthlyVars, MonthlyVars) {
    let mut ot = HashMap::new();
    let mut ut = HashMap::new();
    let mut mu_def = HashMap::new();
    for employee in &problem.employees {
        for &(year, month) in months {
            let expected = ctx.expected_month_hours_ym(employee.id, year, month) as f64;
            let ot_cap = ((expected * problem.ilp.monthly_ot_cap / 8.0).floor() * 8.0).max(0.0);
            ot.insert((employee.id, year, month), vars.add(variable().clamp(0.0, ot_cap)));
            ut.insert((employee.id, year, month), vars.add(variable().min(0.0)));
            mu_def.insert((employee.id, year, month), vars.add(variable().min(0.0)));
        }
    }
    (ot, ut, mu_def)
}

fn build_total_hours_vars(vars: &mut good_lp::ProblemVariables, problem: &Problem) -> TotalHoursVars {
    problem
        .employees
        .iter()
        .map(|e| (e.id, vars.add(variable().min(0.0))))
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn build_objective(
    problem: &Problem,
    ctx: &Context,
    x: &AssignmentVars,
    under: &SlackVars,
    over: &SlackVars,
    dev: &SlackVars,
    ot: &MonthlyVars,
    ut: &MonthlyVars,
    mu_def: &MonthlyVars,
    total_hours: &TotalHoursVars,
    alpha_min: Variable,
    alpha_max: Variable,
) -> Expression {
    let mut objective = Expression::from(0.0);
    for &v in under.values() {
        objective += W_UNDER * v;
    }
    for &v in over.values() {
        objective += W_OVER * v;
    }
    for &v in dev.values() {
        objective += W_OPTDEV * v;
    }
    for &v in ot.values() {
        objective += W_OT * v;
    }
    for &v in ut.values() {
        objective += W_UT * v;
    }
    for &v in mu_def.values() {
        objective += W_MU_FAIR * v;
    }
    objective += W_FAIR * (alpha_max - alpha_min);

    for (&(employee_id, _, shift_id), &var) in x {
        if ctx.employee(employee_id).prefers(shift_id) {
            objective += W_PREF * var;
        }
    }

    for employee in &problem.employees {
        let year_cap = ctx.expected_total_hours(employee.id);
        if year_cap > 0.0 {
            let var = total_hours[&employee.id];
            objective += W_UTIL * (1.0 - var / year_cap);
        }
    }

    objective
}

fn add_one_shift_per_day_constraints<M: SolverModel>(mut model: M, problem: &Problem, ctx: &Context, x: &AssignmentVars) -> M {
    for employee in &problem.employees {
        for &date in &ctx.working_days {
            let sum: Expression = problem
                .shifts
                .iter()
                .filter_map(|s| x.get(&(employee.id, date, s.id)))
                .sum();
            model = model.with(constraint!(sum <= 1));
        }
    }
    model
}

#[allow(clippy::too_many_arguments)]
fn add_coverage_constraints<M: SolverModel>(
    mut model: M,
    problem: &Problem,
    ctx: &Context,
    x: &AssignmentVars,
    under: &SlackVars,
    over: &SlackVars,
    dev: &SlackVars,
) -> M {
    for &date in &ctx.working_days {
        for shift in &problem.shifts {
            let coverage: Expression = problem
                .employees
                .iter()
                .filter_map(|e| x.get(&(e.id, date, shift.id)))
                .sum();
            let u = under[&(date, shift.id)];
            let o = over[&(date, shift.id)];
            let d = dev[&(date, shift.id)];
            let midpoint = shift.midpoint_staff();
            model = model.with(constraint!(coverage.clone() + u >= shift.min_staff as f64));
            model = model.with(constraint!(coverage.clone() - o <= shift.max_staff as f64));
            model = model.with(constraint!(d.clone() >= coverage.clone() - midpoint));
            model = model.with(constraint!(d >= midpoint - coverage));
        }
    }
    model
}

fn add_rest_period_constraints<M: SolverModel>(mut model: M, ctx: &Context, x: &AssignmentVars) -> M {
    for employee in &ctx.problem.employees {
        for window in ctx.working_days.windows(2) {
            let (d1, d2) = (window[0], window[1]);
            if d2 - d1 != time::Duration::days(1) {
                continue;
            }
            for shift1 in &ctx.problem.shifts {
                for shift2 in &ctx.problem.shifts {
                    if !ctx.violates_rest(shift1.id, shift2.id, d1) {
                        continue;
                    }
                    let (Some(&v1), Some(&v2)) = (x.get(&(employee.id, d1, shift1.id)), x.get(&(employee.id, d2, shift2.id)))
                    else {
                        continue;
                    };
                    model = model.with(constraint!(v1 + v2 <= 1));
                }
            }
        }
    }
    model
}

#[allow(clippy::too_many_arguments)]
fn add_monthly_constraints<M: SolverModel>(
    mut model: M,
    problem: &Problem,
    ctx: &Context,
    x: &AssignmentVars,
    ot: &MonthlyVars,
    ut: &MonthlyVars,
    mu_def: &MonthlyVars,
    months: &[(i32, u8)],
) -> M {
    for employee in &problem.employees {
        for &(year, month) in months {
            let expected = ctx.expected_month_hours_ym(employee.id, year, month) as f64;
            let worked: Expression = ctx
                .working_days
                .iter()
                .filter(|d| d.year() == year && d.month() as u8 == month)
                .flat_map(|&date| {
                    problem.shifts.iter().filter_map(move |s| {
                        x.get(&(employee.id, date, s.id)).map(|&v| v * ctx.shift(s.id).duration_hours())
                    })
                })
                .sum();

            let ot_v = ot[&(employee.id, year, month)];
            let ut_v = ut[&(employee.id, year, month)];
            let mu_v = mu_def[&(employee.id, year, month)];

            model = model.with(constraint!(worked.clone() == expected - ut_v + ot_v));
            model = model.with(constraint!(worked.clone() + mu_v >= expected * problem.ilp.min_util_factor));
            model = model.with(constraint!(worked <= expected * (1.0 + problem.ilp.monthly_ot_cap)));
        }
    }
    model
}

fn add_yearly_constraints<M: SolverModel>(mut model: M, ctx: &Context, x: &AssignmentVars, total_hours: &TotalHoursVars) -> M {
    for employee in &ctx.problem.employees {
        let worked: Expression = ctx
            .working_days
            .iter()
            .flat_map(|&date| {
                ctx.problem
                    .shifts
                    .iter()
                    .filter_map(move |s| x.get(&(employee.id, date, s.id)).map(|&v| v * ctx.shift(s.id).duration_hours()))
            })
            .sum();
        let total = total_hours[&employee.id];
        let year_cap = ctx.expected_total_hours(employee.id);
        model = model.with(constraint!(total == worked));
        model = model.with(constraint!(total <= year_cap));
        model = model.with(constraint!(total >= 0.85 * year_cap));
    }
    model
}

fn add_fairness_constraints<M: SolverModel>(
    mut model: M,
    ctx: &Context,
    total_hours: &TotalHoursVars,
    alpha_min: Variable,
    alpha_max: Variable,
) -> M {
    for employee in &ctx.problem.employees {
        let possible = ctx.possible_hours(employee.id);
        if possible <= 0.0 {
            continue;
        }
        let total = total_hours[&employee.id];
        model = model.with(constraint!(alpha_min * possible <= total));
        model = model.with(constraint!(total <= alpha_max * possible));
    }
    model
}
