use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::problem::Problem;
use crate::schedule::ScheduleEntry;

/// Cooperative cancellation signal. The caller holds one end, a solver
/// polls the other; no other synchronization is required since the flag
/// only ever transitions false -> true.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    Optimal,
    Feasible,
    Infeasible,
    TimeLimit,
    Cancelled,
    Error,
}

/// The uniform result every engine returns through `Ok`. A time-limited or
/// cancelled solve is a successful library call; it is only ever `Err`
/// when the input was invalid or an internal invariant broke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveResult {
    pub entries: Vec<ScheduleEntry>,
    pub status: SolveStatus,
    pub objective: f64,
    pub gap: Option<f64>,
    pub diagnostics: HashMap<String, f64>,
}

impl SolveResult {
    pub fn empty(status: SolveStatus) -> Self {
        Self {
            entries: Vec::new(),
            status,
            objective: 0.0,
            gap: None,
            diagnostics: HashMap::new(),
        }
    }
}

/// The single capability shared by the ILP, SA and GA engines. `Algorithm`
/// tags which dispatcher struct implements it; the façade matches on the
/// tag rather than relying on an inheritance hierarchy (§9).
pub trait Solver {
    fn solve(
        &self,
        problem: &Problem,
        seed: Option<u64>,
        cancel: &CancelToken,
    ) -> Result<SolveResult, CoreError>;
}
