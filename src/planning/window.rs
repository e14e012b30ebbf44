// src/planning/window.rs

use crate::error::{PlanError, PlanResult};
use crate::model::plan::{MonthKind, ValidatedPlan};
use crate::planning::config::SolverSettings;
use crate::solver::model::{LinearExpr, MipModel, Relation, VarDef, VarId};
use crate::solver::traits::{BackendError, MipBackend, MipSolution};
use tracing::debug;

/// Decision variables of the solve window, indexed by position in
/// `ValidatedPlan::window()` (month `start_month + k` sits at `k`).
#[derive(Debug, Clone)]
pub struct WindowVars {
    pub sales: Vec<VarId>,
    pub inventory: Vec<VarId>,
}

impl WindowVars {
    pub fn read(&self, solution: &MipSolution) -> (Vec<f64>, Vec<f64>) {
        let sales = self.sales.iter().map(|&v| solution.value(v)).collect();
        let inventory = self.inventory.iter().map(|&v| solution.value(v)).collect();
        (sales, inventory)
    }
}

/// Declares sales and inventory for every window month together with the
/// constraints both formulations share:
///
/// * pinned months keep their baseline sales,
/// * `inventory[i] = inventory[i-1] + inflow[i] - sales[i]`, seeded by the
///   plan's opening inventory,
/// * `inventory[i] * selling_days[i]` lies between `min_dos[i] * sales[i]`
///   and `max_dos[i] * sales[i]`.
///
/// Sales are integral and non-negative; inventory is continuous and
/// non-negative. The DoS band is kept in product form so it stays linear and
/// well defined at zero sales.
pub fn declare_inventory_window(plan: &ValidatedPlan, model: &mut MipModel) -> WindowVars {
    let mut vars = WindowVars {
        sales: Vec::with_capacity(plan.window().len()),
        inventory: Vec::with_capacity(plan.window().len()),
    };

    for slot in plan.window() {
        let i = slot.index;
        let sales = model.add_var(VarDef::non_negative(format!("adjusted_sales_{}", i)).integer());
        let inventory = model.add_var(VarDef::non_negative(format!("inventory_{}", i)));

        if slot.kind == MonthKind::Pinned {
            model.add_constraint(
                format!("pinned_{}", i),
                LinearExpr::new().term(sales, 1.0),
                Relation::Eq,
                f64::from(slot.original_sales),
            );
        }

        // inventory[i] + sales[i] - inventory[i-1] = inflow[i]  (+ opening stock in the first window month)
        let mut flow = LinearExpr::new().term(inventory, 1.0).term(sales, 1.0);
        let mut rhs = f64::from(slot.wholesale_inflow);
        match vars.inventory.last() {
            Some(&previous) => flow = flow.term(previous, -1.0),
            None => rhs += plan.initial_inventory,
        }
        model.add_constraint(format!("flow_{}", i), flow, Relation::Eq, rhs);

        let days = f64::from(slot.selling_days);
        model.add_constraint(
            format!("min_dos_{}", i),
            LinearExpr::new()
                .term(inventory, days)
                .term(sales, -slot.min_dos),
            Relation::Ge,
            0.0,
        );
        model.add_constraint(
            format!("max_dos_{}", i),
            LinearExpr::new()
                .term(inventory, days)
                .term(sales, -slot.max_dos),
            Relation::Le,
            0.0,
        );

        vars.sales.push(sales);
        vars.inventory.push(inventory);
    }

    vars
}

/// Runs the backend and turns its termination status into a `PlanError`.
pub fn run_backend(
    formulation: &'static str,
    model: &MipModel,
    backend: &dyn MipBackend,
    settings: &SolverSettings,
) -> PlanResult<MipSolution> {
    debug!(
        formulation,
        variables = model.variables().len(),
        constraints = model.constraints().len(),
        ?backend,
        "solving"
    );

    backend
        .solve(model, &settings.limits())
        .map_err(|err| match err {
            BackendError::Infeasible => PlanError::Infeasible { formulation },
            BackendError::TimedOut => PlanError::Timeout {
                formulation,
                limit_secs: settings.time_limit.as_secs_f64(),
            },
            BackendError::Unbounded => PlanError::Solver {
                formulation,
                message: "model is unbounded".to_string(),
            },
            BackendError::Failed(message) => PlanError::Solver {
                formulation,
                message,
            },
        })
}
