// src/planning/compare.rs

use crate::error::PlanResult;
use crate::model::plan::ValidatedPlan;
use crate::model::result::{EnvelopeResult, RepatternResult};
use crate::planning::config::PlanningConfig;
use crate::planning::envelope::max_feasible_sales;
use crate::planning::repattern::sales_repattern;
use crate::solver::traits::MipBackend;
use serde::Serialize;
use std::thread;

/// Ceiling vs. recommended plan, as the planner reads it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanComparison {
    pub max_sales_push: f64,
    pub original_total: i64,
    pub target: i64,
    pub final_total: f64,
    pub gap_to_target: f64,
    pub envelope: EnvelopeResult,
    pub repattern: RepatternResult,
}

/// Runs both formulations against one plan.
///
/// The envelope solve runs on a scoped thread while the repattern solve runs
/// on the caller's thread; neither shares state with the other.
pub fn compare_plans(
    plan: &ValidatedPlan,
    config: &PlanningConfig,
    backend: &dyn MipBackend,
) -> PlanResult<PlanComparison> {
    let (envelope, repattern) = thread::scope(|scope| {
        let envelope = scope.spawn(|| max_feasible_sales(plan, &config.solver, backend));
        let repattern = sales_repattern(
            plan,
            config.sales_target,
            &config.weights,
            &config.solver,
            backend,
        );
        let envelope = envelope
            .join()
            .unwrap_or_else(|payload| std::panic::resume_unwind(payload));
        (envelope, repattern)
    });
    let envelope = envelope?;
    let repattern = repattern?;

    Ok(PlanComparison {
        max_sales_push: envelope.max_total_sales,
        original_total: plan.original_total(),
        target: config.sales_target,
        final_total: repattern.projection.total_sales(),
        gap_to_target: repattern.target_deviation,
        envelope,
        repattern,
    })
}
