// src/solver/traits.rs

use crate::solver::model::{MipModel, VarId};
use serde::Serialize;
use std::fmt::Debug;
use std::time::Duration;

/// Whether a returned solution is a proven optimum or the incumbent held when
/// the time limit fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    Optimal,
    TimeLimited,
}

/// Budget handed to the backend for a single solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveLimits {
    pub time_limit: Duration,
    /// Relative optimality gap at which branch-and-bound may stop.
    pub mip_gap: f64,
}

/// Values for every variable of the solved model, plus the termination status.
#[derive(Debug, Clone, PartialEq)]
pub struct MipSolution {
    status: SolveStatus,
    values: Vec<f64>,
}

impl MipSolution {
    pub fn new(status: SolveStatus, values: Vec<f64>) -> Self {
        Self { status, values }
    }

    pub fn status(&self) -> SolveStatus {
        self.status
    }

    pub fn value(&self, var: VarId) -> f64 {
        self.values[var.index()]
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Termination reasons that carry no usable solution.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendError {
    Infeasible,
    Unbounded,
    /// The time limit elapsed before any incumbent was found.
    TimedOut,
    Failed(String),
}

/// A mixed-integer linear programming engine.
///
/// We require `Debug` so the backend can be logged alongside a solve.
/// We require `Send` + `Sync` so both formulations can share one backend
/// while running on separate threads.
pub trait MipBackend: Debug + Send + Sync {
    /// Solves `model` within `limits`.
    ///
    /// # Returns
    /// * `Ok` with status `Optimal` or `TimeLimited` (a feasible incumbent).
    /// * `Err` when the engine reports infeasibility, unboundedness, a timeout
    ///   without incumbent, or an internal failure.
    fn solve(&self, model: &MipModel, limits: &SolveLimits) -> Result<MipSolution, BackendError>;
}
