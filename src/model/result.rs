// src/model/result.rs

use crate::model::plan::MONTHS;
use crate::solver::traits::SolveStatus;
use serde::Serialize;
use std::fmt;

/// Non-fatal conditions attached to a result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanWarning {
    /// Frozen-month sales alone already exceed the annual target; the target
    /// for the adjustable months was clamped to zero.
    TargetAlreadyExceeded { sales_target: i64, locked_sales: i64 },
}

impl fmt::Display for PlanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanWarning::TargetAlreadyExceeded {
                sales_target,
                locked_sales,
            } => write!(
                f,
                "frozen-month sales ({}) already exceed the sales target ({}); remaining target clamped to 0",
                locked_sales, sales_target
            ),
        }
    }
}

/// Full 12-month series rebuilt from a solve, frozen history spliced back in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyProjection {
    pub final_sales: [f64; MONTHS],
    pub inventory_levels: [f64; MONTHS],
    /// `None` where final sales are zero (coverage is undefined).
    pub days_of_supply: [Option<f64>; MONTHS],
}

impl MonthlyProjection {
    pub fn total_sales(&self) -> f64 {
        self.final_sales.iter().sum()
    }
}

/// Output of the feasibility envelope (maximum achievable sales).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvelopeResult {
    pub max_total_sales: f64,
    #[serde(flatten)]
    pub projection: MonthlyProjection,
    pub status: SolveStatus,
}

/// Output of the repattern optimizer (recommended plan).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepatternResult {
    #[serde(flatten)]
    pub projection: MonthlyProjection,
    #[serde(rename = "R_plus")]
    pub r_plus: f64,
    #[serde(rename = "R_minus")]
    pub r_minus: f64,
    /// Final over original sales; `None` where the baseline is zero.
    pub ratios: [Option<f64>; MONTHS],
    /// Signed gap to the remaining target: positive means under target.
    pub target_deviation: f64,
    /// Target left for the adjustable months after frozen sales.
    pub adjusted_target: i64,
    pub status: SolveStatus,
    pub warnings: Vec<PlanWarning>,
}

impl RepatternResult {
    /// Spread of the ratio envelope, the seasonality-distortion term.
    pub fn ratio_spread(&self) -> f64 {
        self.r_plus - self.r_minus
    }
}
