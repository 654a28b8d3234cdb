//! Simulated annealing engine (§4.4): aggressive greedy construction,
//! weighted neighborhood moves under Metropolis acceptance, configurable
//! cooling, restart on stagnation, and a final greedy-repair pass.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::{debug, info};

use roster_model::{CancelToken, CoolingSchedule, CoreError, Problem, SaConfig, SolveResult, SolveStatus, Solver};

use crate::context::Context;
use crate::moves;
use crate::objective::evaluate;
use crate::schedule_map::{empty_map, to_schedule, ScheduleMap};

/// Consecutive non-improving iterations before a restart.
const RESTART_AFTER_STAGNANT_ITERS: u64 = 300;

pub struct SaSolver;

impl Solver for SaSolver {
    fn solve(&self, problem: &Problem, seed: Option<u64>, cancel: &CancelToken) -> Result<SolveResult, CoreError> {
        problem.validate()?;
        let ctx = Context::build(problem)?;
        let mut rng = match seed {
            Some(s) => ChaCha20Rng::seed_from_u64(s),
            None => ChaCha20Rng::from_entropy(),
        };

        let mut current = aggressive_greedy_init(&ctx, &mut rng);
        let mut current_cost = evaluate(&current, &ctx);
        let mut best = current.clone();
        let mut best_cost = current_cost;
        let mut stagnant = 0u64;
        let mut cancelled = false;

        // `restart_origin`/`restart_temp` track the last reseed: temperature
        // is evaluated as if a fresh run of `k - restart_origin` iterations
        // had started at `restart_temp` (T0 on the first run, 0.3*T0 after).
        let mut restart_origin = 0u64;
        let mut restart_temp = problem.sa.initial_temp;

        info!(initial_cost = current_cost, "SA starting");

        for k in 0..problem.sa.max_iters {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            let temp = temperature(&problem.sa, k - restart_origin, restart_temp);
            if temp <= problem.sa.final_temp {
                break;
            }

            let mut candidate = current.clone();
            if !apply_random_move(&mut candidate, &ctx, &mut rng) {
                continue;
            }
            let candidate_cost = evaluate(&candidate, &ctx);
            let delta = candidate_cost - current_cost;

            let accept = delta < 0.0 || rng.gen::<f64>() < (-delta / temp.max(1e-9)).exp();
            if accept {
                current = candidate;
                current_cost = candidate_cost;
                if current_cost < best_cost {
                    best = current.clone();
                    best_cost = current_cost;
                    stagnant = 0;
                } else {
                    stagnant += 1;
                }
            } else {
                stagnant += 1;
            }

            if stagnant >= RESTART_AFTER_STAGNANT_ITERS {
                debug!(iteration = k, "SA restarting with fresh aggressive-greedy after stagnation");
                current = aggressive_greedy_init(&ctx, &mut rng);
                current_cost = evaluate(&current, &ctx);
                restart_origin = k + 1;
                restart_temp = 0.3 * problem.sa.initial_temp;
                stagnant = 0;
            }
        }

        finalize(&mut best, &ctx, &mut rng);
        let final_cost = evaluate(&best, &ctx);

        let status = if cancelled {
            SolveStatus::Cancelled
        } else if is_feasible(&best, &ctx) {
            SolveStatus::Feasible
        } else {
            SolveStatus::Infeasible
        };

        info!(final_cost, ?status, "SA finished");

        let mut result = SolveResult::empty(status);
        result.entries = to_schedule(&best).entries;
        result.objective = final_cost;
        Ok(result)
    }
}

fn adaptive_multiplier(k: u64, max_iters: u64) -> f64 {
    let progress = k as f64 / max_iters.max(1) as f64;
    if progress < 0.3 {
        1.0
    } else if progress < 0.7 {
        0.7
    } else {
        0.3
    }
}

/// Temperature at local step `k` (since the last restart) of a cooling run
/// starting at `start_temp` and ending at `cfg.final_temp` over
/// `cfg.max_iters` steps.
fn temperature(cfg: &SaConfig, k: u64, start_temp: f64) -> f64 {
    let k_f = k as f64;
    let max = cfg.max_iters.max(1) as f64;
    let base = match cfg.cooling {
        CoolingSchedule::Exponential => start_temp * (cfg.final_temp / start_temp).powf(k_f / max),
        CoolingSchedule::Linear => start_temp - (start_temp - cfg.final_temp) * (k_f / max),
        CoolingSchedule::Logarithmic => {
            let c = if cfg.final_temp > 0.0 {
                (start_temp / cfg.final_temp - 1.0) / (1.0 + max).ln()
            } else {
                0.0
            };
            start_temp / (1.0 + c * (1.0 + k_f).ln())
        }
    };
    base * adaptive_multiplier(k, cfg.max_iters)
}

/// Weighted neighborhood move selection per §4.4: fill-gap 0.30,
/// maximize-shift 0.20, redistribute 0.15, swap-for-coverage 0.10,
/// rest-period-repair 0.15, utilization-boost 0.10.
fn apply_random_move(map: &mut ScheduleMap, ctx: &Context, rng: &mut impl Rng) -> bool {
    let roll: f64 = rng.gen();
    if roll < 0.30 {
        moves::try_fill_gap(map, ctx, rng)
    } else if roll < 0.50 {
        moves::try_maximize_shift(map, ctx, rng)
    } else if roll < 0.65 {
        moves::try_redistribute(map, ctx, rng)
    } else if roll < 0.75 {
        moves::try_swap_for_coverage(map, ctx, rng)
    } else if roll < 0.90 {
        moves::try_rest_period_repair(map, ctx, rng)
    } else {
        moves::try_utilization_boost(map, ctx, rng)
    }
}

/// Build an initial schedule by walking working days and, for each shift in
/// priority order (deficit proxy via `min_staff`, ties by longer duration),
/// assigning the top `min(max_staff, max(min_staff, |candidates|))` feasible
/// employees ranked by remaining weekly capacity and preference.
pub(crate) fn aggressive_greedy_init(ctx: &Context, rng: &mut impl Rng) -> ScheduleMap {
    use crate::schedule_map::{is_feasible_assignment, weekly_hours_so_far};
    use rand::seq::SliceRandom;

    let mut map = empty_map(ctx);

    for &date in &ctx.working_days {
        let mut shifts: Vec<_> = ctx.problem.shifts.iter().collect();
        shifts.sort_by(|a, b| {
            b.min_staff
                .cmp(&a.min_staff)
                .then(b.duration_hours().partial_cmp(&a.duration_hours()).expect("hours are never NaN"))
        });

        for shift in shifts {
            let mut candidates: Vec<u64> = ctx
                .problem
                .employees
                .iter()
                .map(|e| e.id)
                .filter(|&id| is_feasible_assignment(&map, ctx, id, date, shift.id))
                .collect();
            candidates.shuffle(rng);
            let week = ctx.iso_week(date);
            candidates.sort_by(|&a, &b| {
                let score = |id: u64| {
                    let remaining = ctx.employee(id).weekly_hours_cap as f64 - weekly_hours_so_far(&map, ctx, id, week);
                    let pref = if ctx.employee(id).prefers(shift.id) { 1000.0 } else { 0.0 };
                    remaining + pref
                };
                score(b).partial_cmp(&score(a)).expect("scores are never NaN")
            });

            let target = shift.min_staff.max(candidates.len() as u32).min(shift.max_staff);
            let take = (target as usize).min(candidates.len());
            let entry = map.entry((date, shift.id)).or_default();
            entry.extend_from_slice(&candidates[..take]);
        }
    }

    map
}

/// Final pass (§4.4): one greedy sweep fills any still-open gaps, then a
/// validator trims any shift left above `max_staff`.
pub(crate) fn finalize(map: &mut ScheduleMap, ctx: &Context, rng: &mut impl Rng) {
    for _ in 0..(ctx.working_days.len() * ctx.problem.shifts.len()) {
        if !moves::try_fill_gap(map, ctx, rng) {
            break;
        }
    }
    for shift in &ctx.problem.shifts {
        for &date in &ctx.working_days {
            if let Some(list) = map.get_mut(&(date, shift.id)) {
                list.truncate(shift.max_staff as usize);
            }
        }
    }
}

fn is_feasible(map: &ScheduleMap, ctx: &Context) -> bool {
    for shift in &ctx.problem.shifts {
        for &date in &ctx.working_days {
            let assigned = map.get(&(date, shift.id)).map_or(0, |v| v.len()) as u32;
            if assigned < shift.min_staff {
                return false;
            }
        }
    }
    true
}
