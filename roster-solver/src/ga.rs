//! Genetic algorithm engine (§4.5): seeded population, tournament
//! selection, coverage-weighted crossover, adaptive mutation, elitism.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::info;

use roster_model::{CancelToken, CoreError, GaConfig, Problem, SolveResult, SolveStatus, Solver};

use crate::context::Context;
use crate::moves;
use crate::objective::evaluate;
use crate::schedule_map::{empty_map, to_schedule, ScheduleMap};

const TOURNAMENT_SIZE: usize = 3;

pub struct GaSolver;

impl Solver for GaSolver {
    fn solve(&self, problem: &Problem, seed: Option<u64>, cancel: &CancelToken) -> Result<SolveResult, CoreError> {
        problem.validate()?;
        let ctx = Context::build(problem)?;
        let mut rng = match seed {
            Some(s) => ChaCha20Rng::seed_from_u64(s),
            None => ChaCha20Rng::from_entropy(),
        };

        let mut population = seed_population(&ctx, &problem.ga, &mut rng);
        let mut fitness: Vec<f64> = population.iter().map(|m| fitness_of(m, &ctx)).collect();

        let mut best_idx = best_index(&fitness);
        let mut best = population[best_idx].clone();
        let mut best_fitness = fitness[best_idx];
        let mut cancelled = false;

        for generation in 0..problem.ga.generations {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            let mut next_gen = Vec::with_capacity(population.len());

            let mut elite_indices: Vec<usize> = (0..population.len()).collect();
            elite_indices.sort_by(|&a, &b| fitness[a].partial_cmp(&fitness[b]).expect("fitness never NaN"));
            for &idx in elite_indices.iter().take(problem.ga.elitism) {
                next_gen.push(population[idx].clone());
            }

            while next_gen.len() < population.len() {
                let parent_a = tournament_select(&population, &fitness, &mut rng);
                let parent_b = tournament_select(&population, &fitness, &mut rng);

                let mut child = if rng.gen::<f64>() < problem.ga.crossover_rate {
                    crossover(parent_a, parent_b, &ctx, &mut rng)
                } else {
                    parent_a.clone()
                };

                let progress = generation as f64 / problem.ga.generations.max(1) as f64;
                if rng.gen::<f64>() < problem.ga.mutation_rate {
                    mutate(&mut child, &ctx, progress, &mut rng);
                }

                next_gen.push(child);
            }

            population = next_gen;
            fitness = population.iter().map(|m| fitness_of(m, &ctx)).collect();
            best_idx = best_index(&fitness);
            if fitness[best_idx] < best_fitness {
                best = population[best_idx].clone();
                best_fitness = fitness[best_idx];
            }
        }

        final_improvement_pass(&mut best, &ctx);
        let final_cost = evaluate(&best, &ctx);

        let status = if cancelled {
            SolveStatus::Cancelled
        } else if is_feasible(&best, &ctx) {
            SolveStatus::Feasible
        } else {
            SolveStatus::Infeasible
        };

        info!(final_cost, ?status, "GA finished");

        let mut result = SolveResult::empty(status);
        result.entries = to_schedule(&best).entries;
        result.objective = final_cost;
        Ok(result)
    }
}

/// Population fitness (§4.5): the shared SA objective plus a coverage-rate
/// term — a low-coverage penalty below 80% and a high-coverage bonus above
/// 90%, where `coverage_rate` is filled positions over total capacity
/// (`Σ max_staff` across the horizon).
fn fitness_of(map: &ScheduleMap, ctx: &Context) -> f64 {
    let mut cost = evaluate(map, ctx);

    let capacity: u32 = ctx
        .problem
        .shifts
        .iter()
        .map(|s| s.max_staff * ctx.working_days.len() as u32)
        .sum();
    if capacity > 0 {
        let filled: usize = map.values().map(|v| v.len()).sum();
        let rate = filled as f64 / capacity as f64;
        if rate < 0.8 {
            cost += 1_000_000.0 * (0.8 - rate);
        } else if rate > 0.9 {
            cost -= 500_000.0 * (rate - 0.9);
        }
    }
    cost
}

fn best_index(fitness: &[f64]) -> usize {
    fitness
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.partial_cmp(b).expect("fitness never NaN"))
        .map(|(i, _)| i)
        .expect("population is never empty")
}

/// 70% of the population targets 90-100% of `max_staff` per shift
/// ("aggressive"), the remaining 30% targets 70-85% ("conservative");
/// §4.5. Both honor every hard constraint at construction.
fn seed_population(ctx: &Context, cfg: &GaConfig, rng: &mut impl Rng) -> Vec<ScheduleMap> {
    let aggressive_count = (cfg.population as f64 * 0.7).round() as usize;
    let mut population = Vec::with_capacity(cfg.population);
    for _ in 0..aggressive_count {
        population.push(targeted_init(ctx, rng, 0.90, 1.00));
    }
    while population.len() < cfg.population {
        population.push(targeted_init(ctx, rng, 0.70, 0.85));
    }
    population
}

/// Greedily fill each (day, shift) up to `round(uniform(low, high) *
/// max_staff)` feasible candidates, floored at `min_staff` so the result
/// still satisfies coverage wherever the workforce allows it.
fn targeted_init(ctx: &Context, rng: &mut impl Rng, low: f64, high: f64) -> ScheduleMap {
    use crate::schedule_map::is_feasible_assignment;
    let mut map = empty_map(ctx);
    for &date in &ctx.working_days {
        for shift in &ctx.problem.shifts {
            let mut candidates: Vec<u64> = ctx
                .problem
                .employees
                .iter()
                .map(|e| e.id)
                .filter(|&id| is_feasible_assignment(&map, ctx, id, date, shift.id))
                .collect();
            candidates.shuffle(rng);

            let ratio = rng.gen_range(low..=high);
            let target = (shift.max_staff as f64 * ratio).round() as u32;
            let target = target.max(shift.min_staff).min(shift.max_staff);
            let take = (target as usize).min(candidates.len());
            map.entry((date, shift.id)).or_default().extend_from_slice(&candidates[..take]);
        }
    }
    map
}

fn tournament_select<'a>(population: &'a [ScheduleMap], fitness: &[f64], rng: &mut impl Rng) -> &'a ScheduleMap {
    let mut best: Option<usize> = None;
    for _ in 0..TOURNAMENT_SIZE {
        let idx = rng.gen_range(0..population.len());
        best = match best {
            Some(b) if fitness[b] <= fitness[idx] => Some(b),
            _ => Some(idx),
        };
    }
    &population[best.expect("tournament size > 0")]
}

/// Coverage-ratio-weighted crossover: for each (day, shift) slot, take it
/// from whichever parent has the better-covered slot, breaking ties by a
/// coin flip.
fn crossover(parent_a: &ScheduleMap, parent_b: &ScheduleMap, ctx: &Context, rng: &mut impl Rng) -> ScheduleMap {
    let mut child = empty_map(ctx);
    for key in child.keys().copied().collect::<Vec<_>>() {
        let a = parent_a.get(&key).map_or(0, |v| v.len());
        let b = parent_b.get(&key).map_or(0, |v| v.len());
        let from_a = match a.cmp(&b) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Less => false,
            std::cmp::Ordering::Equal => rng.gen(),
        };
        let source = if from_a { parent_a } else { parent_b };
        if let Some(employees) = source.get(&key) {
            child.insert(key, employees.clone());
        }
    }
    repair_duplicates(&mut child, ctx);
    child
}

/// Crossover can assign the same employee twice on one day when two
/// different shift slots are each pulled from a different parent; drop the
/// later duplicate to keep the schedule feasible.
fn repair_duplicates(map: &mut ScheduleMap, ctx: &Context) {
    use std::collections::HashSet;
    for &date in &ctx.working_days {
        let mut seen = HashSet::new();
        for shift in &ctx.problem.shifts {
            if let Some(list) = map.get_mut(&(date, shift.id)) {
                list.retain(|employee_id| seen.insert(*employee_id));
            }
        }
    }
}

/// Operator weights {swap, reassign, adjust-staff, fill-gaps} by generation
/// progress `p = g/G` (§4.5).
fn mutation_weights(progress: f64) -> [f64; 4] {
    if progress < 0.3 {
        [0.3, 0.3, 0.3, 0.1]
    } else if progress < 0.7 {
        [0.2, 0.2, 0.3, 0.3]
    } else {
        [0.1, 0.1, 0.3, 0.5]
    }
}

fn apply_one_mutation(map: &mut ScheduleMap, ctx: &Context, progress: f64, rng: &mut impl Rng) {
    let weights = mutation_weights(progress);
    let roll: f64 = rng.gen();
    let cumulative = [weights[0], weights[0] + weights[1], weights[0] + weights[1] + weights[2]];
    if roll < cumulative[0] {
        moves::try_swap(map, ctx, rng);
    } else if roll < cumulative[1] {
        moves::try_reassign(map, ctx, rng);
    } else if roll < cumulative[2] {
        moves::try_adjust_staff(map, ctx, rng);
    } else {
        moves::try_fill_gap(map, ctx, rng);
    }
}

/// Adaptive mutation (§4.5): one operator draw from the progress-dependent
/// weight table, with a 30% chance of a second draw and a 10% chance of a
/// third.
fn mutate(map: &mut ScheduleMap, ctx: &Context, progress: f64, rng: &mut impl Rng) {
    apply_one_mutation(map, ctx, progress, rng);
    if rng.gen::<f64>() < 0.3 {
        apply_one_mutation(map, ctx, progress, rng);
        if rng.gen::<f64>() < 0.1 {
            apply_one_mutation(map, ctx, progress, rng);
        }
    }
}

/// Deterministic final improvement pass (§4.5): repeatedly take the
/// understaffed (day, shift) slot with the largest gap and fill it with any
/// feasible candidate, until no gap remains or none can be filled.
fn final_improvement_pass(map: &mut ScheduleMap, ctx: &Context) {
    use crate::schedule_map::is_feasible_assignment;

    loop {
        let mut gaps: Vec<(u32, time::Date, u64)> = ctx
            .problem
            .shifts
            .iter()
            .flat_map(|shift| {
                ctx.working_days.iter().filter_map(move |&date| {
                    let assigned = map.get(&(date, shift.id)).map_or(0, |v| v.len()) as u32;
                    (assigned < shift.min_staff).then_some((shift.min_staff - assigned, date, shift.id))
                })
            })
            .collect();
        if gaps.is_empty() {
            break;
        }
        gaps.sort_by(|a, b| b.0.cmp(&a.0));

        let mut filled_any = false;
        for (_, date, shift_id) in gaps {
            let candidate = ctx
                .problem
                .employees
                .iter()
                .map(|e| e.id)
                .find(|&id| is_feasible_assignment(map, ctx, id, date, shift_id));
            if let Some(employee_id) = candidate {
                map.entry((date, shift_id)).or_default().push(employee_id);
                filled_any = true;
            }
        }
        if !filled_any {
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

#[cfg(test)]
mod tests {
    use super::*;
    use roster_model::{Algorithm, CompanyPolicy, Employee, PlanningHorizon, ShiftTemplate};
    use time::macros::{date, time};

    fn toy_problem() -> Problem {
        let employees = vec![
            Employee::new(1, "Alice", 40),
            Employee::new(2, "Bob", 40),
            Employee::new(3, "Carol", 40),
        ];
        let shifts = vec![ShiftTemplate::new(1, "Day", time!(8:00), time!(16:00), 1, 2)];
        let horizon = PlanningHorizon::new(date!(2025 - 01 - 06), date!(2025 - 01 - 08));
        let mut problem = Problem::new(employees, shifts, horizon, CompanyPolicy::default(), Algorithm::Ga);
        problem.ga.population = 8;
        problem.ga.generations = 5;
        problem
    }

    #[test]
    fn ga_produces_a_feasible_schedule_for_a_toy_instance() {
        let problem = toy_problem();
        let solver = GaSolver;
        let cancel = CancelToken::new();
        let result = solver.solve(&problem, Some(3), &cancel).expect("ga should not error");
        assert_eq!(result.status, SolveStatus::Feasible);
    }

    #[test]
    fn ga_is_deterministic_given_the_same_seed() {
        let problem = toy_problem();
        let solver = GaSolver;
        let cancel = CancelToken::new();
        let a = solver.solve(&problem, Some(11), &cancel).unwrap();
        let b = solver.solve(&problem, Some(11), &cancel).unwrap();
        assert_eq!(a.entries, b.entries);
    }
}
