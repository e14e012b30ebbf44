// src/planning/envelope.rs

//! Feasibility envelope: the most the plan could sell under inventory policy.
//!
//! The model maximises window sales subject only to the inventory flow and
//! the days-of-supply band. It ignores the annual target and places no upper
//! bound on monthly sales beyond what `max_dos` and non-negative inventory
//! imply, so the result is a ceiling for any target-tracking plan.

use crate::error::PlanResult;
use crate::model::plan::ValidatedPlan;
use crate::model::result::EnvelopeResult;
use crate::planning::config::SolverSettings;
use crate::planning::projector::project;
use crate::planning::window::{declare_inventory_window, run_backend, WindowVars};
use crate::solver::model::{LinearExpr, MipModel, Sense};
use crate::solver::traits::{MipBackend, SolveStatus};
use tracing::{info, instrument};

pub const FORMULATION: &str = "max_feasible_sales";

/// Builds the envelope model without solving it.
pub fn build_model(plan: &ValidatedPlan) -> (MipModel, WindowVars) {
    let mut model = MipModel::new(FORMULATION);
    let vars = declare_inventory_window(plan, &mut model);
    model.set_objective(Sense::Maximise, LinearExpr::sum(&vars.sales));
    (model, vars)
}

/// Maximum total sales achievable over the year.
///
/// A fully frozen plan needs no solve: the ceiling is its baseline total.
#[instrument(skip_all, fields(start_month = plan.start_month))]
pub fn max_feasible_sales(
    plan: &ValidatedPlan,
    settings: &SolverSettings,
    backend: &dyn MipBackend,
) -> PlanResult<EnvelopeResult> {
    if plan.is_fully_frozen() {
        let projection = project(plan, &[], &[]);
        info!(
            max_total_sales = projection.total_sales(),
            "plan fully frozen; envelope equals baseline"
        );
        return Ok(EnvelopeResult {
            max_total_sales: projection.total_sales(),
            projection,
            status: SolveStatus::Optimal,
        });
    }

    let (model, vars) = build_model(plan);
    let solution = run_backend(FORMULATION, &model, backend, settings)?;
    let (sales, inventory) = vars.read(&solution);
    let projection = project(plan, &sales, &inventory);

    info!(
        max_total_sales = projection.total_sales(),
        status = ?solution.status(),
        "envelope solved"
    );

    Ok(EnvelopeResult {
        max_total_sales: projection.total_sales(),
        projection,
        status: solution.status(),
    })
}
