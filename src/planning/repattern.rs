// src/planning/repattern.rs

//! Repattern optimizer: rescale the baseline toward the annual target while
//! keeping its seasonal shape.
//!
//! For every adjustable month the ratio `sales / original_sales` is boxed by
//! two scalars, `R_minus <= ratio <= R_plus`. Shrinking `R_plus - R_minus`
//! pushes all months toward one common scale factor. The target is tracked
//! softly through a free `deviation` whose absolute value is penalised:
//!
//! ```text
//! minimise  alpha * (R_plus - R_minus) + lambda * |deviation|
//! s.t.      Σ window sales + deviation = target - frozen-prefix sales
//! ```
//!
//! Inventory flow and the days-of-supply band are shared with the envelope.

use crate::error::PlanResult;
use crate::model::plan::{MonthKind, ValidatedPlan};
use crate::model::result::{PlanWarning, RepatternResult};
use crate::planning::config::{RepatternWeights, SolverSettings};
use crate::planning::projector::{project, sales_ratios};
use crate::planning::window::{declare_inventory_window, run_backend, WindowVars};
use crate::solver::model::{LinearExpr, MipModel, Relation, Sense, VarDef, VarId};
use crate::solver::traits::{MipBackend, SolveStatus};
use tracing::{info, instrument, warn};

pub const FORMULATION: &str = "sales_repattern";

/// Target left for the window once frozen-prefix sales are booked.
///
/// Clamped at zero, with a warning, when history already exceeds the target.
pub fn remaining_target(plan: &ValidatedPlan, sales_target: i64) -> (i64, Option<PlanWarning>) {
    let locked_sales = plan.locked_sales();
    let remaining = sales_target - locked_sales;
    if remaining < 0 {
        (
            0,
            Some(PlanWarning::TargetAlreadyExceeded {
                sales_target,
                locked_sales,
            }),
        )
    } else {
        (remaining, None)
    }
}

/// Handles to the repattern-specific variables.
#[derive(Debug, Clone)]
pub struct RepatternVars {
    pub window: WindowVars,
    pub r_plus: VarId,
    pub r_minus: VarId,
    pub deviation: VarId,
    pub abs_deviation: VarId,
}

/// Builds the repattern model without solving it.
pub fn build_model(
    plan: &ValidatedPlan,
    adjusted_target: i64,
    weights: &RepatternWeights,
) -> (MipModel, RepatternVars) {
    let mut model = MipModel::new(FORMULATION);
    let window = declare_inventory_window(plan, &mut model);

    let r_plus = model.add_var(VarDef::non_negative("R_plus"));
    let r_minus = model.add_var(VarDef::non_negative("R_minus"));
    let deviation = model.add_var(VarDef::free("sls_tgt_deviation"));
    let abs_deviation = model.add_var(VarDef::non_negative("sls_tgt_dev_abs"));

    model.add_constraint(
        "target",
        LinearExpr::sum(&window.sales).term(deviation, 1.0),
        Relation::Eq,
        adjusted_target as f64,
    );
    model.add_constraint(
        "abs_dev_pos",
        LinearExpr::new().term(abs_deviation, 1.0).term(deviation, -1.0),
        Relation::Ge,
        0.0,
    );
    model.add_constraint(
        "abs_dev_neg",
        LinearExpr::new().term(abs_deviation, 1.0).term(deviation, 1.0),
        Relation::Ge,
        0.0,
    );
    // Redundant while some adjustable month has a positive baseline; keeps
    // the spread bounded when none does.
    model.add_constraint(
        "ratio_order",
        LinearExpr::new().term(r_plus, 1.0).term(r_minus, -1.0),
        Relation::Ge,
        0.0,
    );

    for (slot, &sales) in plan.window().iter().zip(&window.sales) {
        if slot.kind != MonthKind::Adjustable {
            continue;
        }
        let original = f64::from(slot.original_sales);
        model.add_constraint(
            format!("ratio_floor_{}", slot.index),
            LinearExpr::new().term(sales, 1.0).term(r_minus, -original),
            Relation::Ge,
            0.0,
        );
        model.add_constraint(
            format!("ratio_ceiling_{}", slot.index),
            LinearExpr::new().term(sales, 1.0).term(r_plus, -original),
            Relation::Le,
            0.0,
        );
    }

    model.set_objective(
        Sense::Minimise,
        LinearExpr::new()
            .term(r_plus, weights.alpha)
            .term(r_minus, -weights.alpha)
            .term(abs_deviation, weights.lambda),
    );

    (
        model,
        RepatternVars {
            window,
            r_plus,
            r_minus,
            deviation,
            abs_deviation,
        },
    )
}

/// Recommended monthly plan balancing seasonality against the sales target.
#[instrument(skip_all, fields(start_month = plan.start_month, sales_target = sales_target))]
pub fn sales_repattern(
    plan: &ValidatedPlan,
    sales_target: i64,
    weights: &RepatternWeights,
    settings: &SolverSettings,
    backend: &dyn MipBackend,
) -> PlanResult<RepatternResult> {
    weights.validate()?;

    let (adjusted_target, warning) = remaining_target(plan, sales_target);
    if let Some(w) = &warning {
        warn!("{}", w);
    }
    let warnings: Vec<PlanWarning> = warning.into_iter().collect();

    if plan.is_fully_frozen() {
        let projection = project(plan, &[], &[]);
        let ratios = sales_ratios(plan, &projection.final_sales);
        info!(adjusted_target, "plan fully frozen; nothing to repattern");
        return Ok(RepatternResult {
            projection,
            r_plus: 0.0,
            r_minus: 0.0,
            ratios,
            target_deviation: adjusted_target as f64,
            adjusted_target,
            status: SolveStatus::Optimal,
            warnings,
        });
    }

    let (model, vars) = build_model(plan, adjusted_target, weights);
    let solution = run_backend(FORMULATION, &model, backend, settings)?;

    let (sales, inventory) = vars.window.read(&solution);
    let projection = project(plan, &sales, &inventory);
    let ratios = sales_ratios(plan, &projection.final_sales);
    let r_plus = solution.value(vars.r_plus);
    let r_minus = solution.value(vars.r_minus);
    let target_deviation = solution.value(vars.deviation);

    info!(
        r_plus,
        r_minus,
        target_deviation,
        total_sales = projection.total_sales(),
        status = ?solution.status(),
        "repattern solved"
    );

    Ok(RepatternResult {
        projection,
        r_plus,
        r_minus,
        ratios,
        target_deviation,
        adjusted_target,
        status: solution.status(),
        warnings,
    })
}
