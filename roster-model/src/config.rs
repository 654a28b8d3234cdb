use serde::{Deserialize, Serialize};

/// Which of the three interchangeable engines handles a given `Problem`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Algorithm {
    Ilp,
    Sa,
    Ga,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoolingSchedule {
    Exponential,
    Linear,
    Logarithmic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IlpConfig {
    pub time_limit_s: u64,
    pub rel_gap: f64,
    pub min_util_factor: f64,
    pub monthly_ot_cap: f64,
    pub yearly_ot_cap: f64,
    /// `None` defaults to `max(1, num_cpus::get() - 2)` at solve time.
    pub threads: Option<usize>,
}

impl Default for IlpConfig {
    fn default() -> Self {
        Self {
            time_limit_s: 3600,
            rel_gap: 0.0,
            min_util_factor: 0.9,
            monthly_ot_cap: 0.05,
            yearly_ot_cap: 0.0,
            threads: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaConfig {
    pub initial_temp: f64,
    pub final_temp: f64,
    pub max_iters: u64,
    pub cooling: CoolingSchedule,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temp: 2000.0,
            final_temp: 1.0,
            max_iters: 2000,
            cooling: CoolingSchedule::Exponential,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaConfig {
    pub population: usize,
    pub generations: u64,
    pub mutation_rate: f64,
    pub crossover_rate: f64,
    pub elitism: usize,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population: 50,
            generations: 100,
            mutation_rate: 0.2,
            crossover_rate: 0.8,
            elitism: 2,
        }
    }
}
