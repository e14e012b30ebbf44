// src/solver/good_lp_backend.rs

use crate::solver::model::{LinearExpr, MipModel, Relation, Sense, VarKind};
use crate::solver::traits::{BackendError, MipBackend, MipSolution, SolveLimits, SolveStatus};
use good_lp::solvers::highs::highs;
use good_lp::solvers::{WithMipGap, WithTimeLimit};
use good_lp::{
    constraint, variable, Expression, ProblemVariables, ResolutionError, Solution, SolverModel,
    Variable,
};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Row tolerance used to decide whether a time-limited answer is a real
/// incumbent.
const INCUMBENT_TOLERANCE: f64 = 1e-3;

/// `good_lp` backend on the HiGHS engine.
///
/// HiGHS enforces `limits.time_limit` and `limits.mip_gap` itself. A solve
/// that used the whole time budget is reported as `TimeLimited` when its
/// values satisfy every row, and as `TimedOut` otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoodLpBackend;

impl GoodLpBackend {
    pub fn new() -> Self {
        Self
    }
}

impl MipBackend for GoodLpBackend {
    fn solve(&self, model: &MipModel, limits: &SolveLimits) -> Result<MipSolution, BackendError> {
        let started = Instant::now();
        let outcome = solve_with_highs(model, limits);
        let elapsed = started.elapsed();
        let hit_limit = reached_limit(elapsed, limits.time_limit);

        debug!(
            model = model.name(),
            elapsed_ms = elapsed.as_millis() as u64,
            hit_limit,
            ok = outcome.is_ok(),
            "highs finished"
        );

        let values = match outcome {
            Ok(values) => values,
            Err(BackendError::Failed(message)) if hit_limit => {
                warn!(model = model.name(), %message, "time limit reached without incumbent");
                return Err(BackendError::TimedOut);
            }
            Err(err) => return Err(err),
        };

        classify(model, values, hit_limit)
    }
}

fn reached_limit(elapsed: Duration, time_limit: Duration) -> bool {
    elapsed >= time_limit
}

/// Turns the raw values into a solution with the right status.
fn classify(
    model: &MipModel,
    values: Vec<f64>,
    hit_limit: bool,
) -> Result<MipSolution, BackendError> {
    if !hit_limit {
        return Ok(MipSolution::new(SolveStatus::Optimal, values));
    }
    let violated = model.violations(&values, INCUMBENT_TOLERANCE);
    if violated.is_empty() {
        warn!(model = model.name(), "time limit reached; returning incumbent");
        Ok(MipSolution::new(SolveStatus::TimeLimited, values))
    } else {
        warn!(
            model = model.name(),
            violated = violated.len(),
            "time limit reached before a feasible incumbent"
        );
        Err(BackendError::TimedOut)
    }
}

fn solve_with_highs(model: &MipModel, limits: &SolveLimits) -> Result<Vec<f64>, BackendError> {
    if !limits.mip_gap.is_finite() || limits.mip_gap < 0.0 {
        return Err(BackendError::Failed(format!(
            "invalid relative MIP gap {}",
            limits.mip_gap
        )));
    }

    let mut vars = ProblemVariables::new();
    let handles: Vec<Variable> = model
        .variables()
        .iter()
        .map(|def| {
            let mut definition = variable().name(def.name.clone());
            if def.kind == VarKind::Integer {
                definition = definition.integer();
            }
            if let Some(lower) = def.lower {
                definition = definition.min(lower);
            }
            if let Some(upper) = def.upper {
                definition = definition.max(upper);
            }
            vars.add(definition)
        })
        .collect();

    let objective = to_expression(model.objective(), &handles);
    let unsolved = match model.sense() {
        Sense::Maximise => vars.maximise(objective),
        Sense::Minimise => vars.minimise(objective),
    };

    let mut problem = unsolved
        .using(highs)
        .with_time_limit(limits.time_limit.as_secs_f64())
        .with_mip_gap(limits.mip_gap as f32)
        .map_err(|e| BackendError::Failed(e.to_string()))?;
    for c in model.constraints() {
        let lhs = to_expression(&c.expr, &handles);
        problem = problem.with(match c.relation {
            Relation::Eq => constraint::eq(lhs, c.rhs),
            Relation::Le => constraint::leq(lhs, c.rhs),
            Relation::Ge => constraint::geq(lhs, c.rhs),
        });
    }

    let solution = problem.solve().map_err(BackendError::from)?;

    Ok(model
        .variables()
        .iter()
        .zip(&handles)
        .map(|(def, handle)| {
            let raw = solution.value(*handle);
            match def.kind {
                VarKind::Integer => raw.round(),
                VarKind::Continuous => raw,
            }
        })
        .collect())
}

fn to_expression(expr: &LinearExpr, handles: &[Variable]) -> Expression {
    let mut out = Expression::from(expr.constant);
    for (var, coef) in &expr.terms {
        out += *coef * handles[var.index()];
    }
    out
}

impl From<ResolutionError> for BackendError {
    fn from(err: ResolutionError) -> Self {
        match err {
            ResolutionError::Infeasible => BackendError::Infeasible,
            ResolutionError::Unbounded => BackendError::Unbounded,
            other => BackendError::Failed(other.to_string()),
        }
    }
}
