// src/lib.rs

//! Days-of-supply constrained sales planning.
//!
//! Two MILP formulations over a twelve-month plan: a feasibility envelope
//! (the most the plan can sell under inventory policy) and a repattern
//! optimizer (rescale the baseline toward a target while keeping its seasonal
//! shape). Both share the plan validator and result projector in `planning`
//! and talk to the solver through the `solver::traits::MipBackend` trait.

pub mod error;
pub mod io;
pub mod logging;
pub mod model;
pub mod planning;
pub mod solver;

pub use error::{InputError, PlanError, PlanResult};
pub use model::plan::{MonthKind, PlanInputs, ValidatedPlan, MONTHS};
pub use model::result::{EnvelopeResult, MonthlyProjection, PlanWarning, RepatternResult};
pub use planning::compare::{compare_plans, PlanComparison};
pub use planning::config::{PlanningConfig, RepatternWeights, SolverSettings};
pub use planning::envelope::max_feasible_sales;
pub use planning::repattern::sales_repattern;
pub use planning::validator::validate;
pub use solver::good_lp_backend::GoodLpBackend;
pub use solver::traits::{MipBackend, SolveStatus};
