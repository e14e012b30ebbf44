// src/planning/config.rs

use crate::error::{PlanError, PlanResult};
use crate::solver::traits::SolveLimits;
use std::time::Duration;

/// Budget applied to every solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverSettings {
    pub time_limit: Duration,
    pub mip_gap: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_secs(10),
            mip_gap: 0.001,
        }
    }
}

impl SolverSettings {
    pub fn limits(&self) -> SolveLimits {
        SolveLimits {
            time_limit: self.time_limit,
            mip_gap: self.mip_gap,
        }
    }
}

/// Objective weights of the repattern optimizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepatternWeights {
    /// Weight on the ratio spread `R_plus - R_minus` (seasonality).
    pub alpha: f64,
    /// Weight on the absolute deviation from the target.
    pub lambda: f64,
}

impl Default for RepatternWeights {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            lambda: 10.0,
        }
    }
}

impl RepatternWeights {
    pub fn validate(&self) -> PlanResult<()> {
        for (name, value) in [("alpha", self.alpha), ("lambda", self.lambda)] {
            if !value.is_finite() || value < 0.0 {
                return Err(PlanError::InvalidWeight { name, value });
            }
        }
        Ok(())
    }
}

/// Everything a full planning run needs besides the plan itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanningConfig {
    pub solver: SolverSettings,
    pub weights: RepatternWeights,
    pub sales_target: i64,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            solver: SolverSettings::default(),
            weights: RepatternWeights::default(),
            sales_target: 150_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_planner() {
        let config = PlanningConfig::default();
        assert_eq!(config.solver.time_limit, Duration::from_secs(10));
        assert_eq!(config.solver.mip_gap, 0.001);
        assert_eq!(config.weights.alpha, 1.0);
        assert_eq!(config.weights.lambda, 10.0);
        assert_eq!(config.sales_target, 150_000);
    }

    #[test]
    fn rejects_negative_or_nan_weights() {
        let negative = RepatternWeights {
            alpha: -0.5,
            lambda: 10.0,
        };
        assert_eq!(
            negative.validate(),
            Err(PlanError::InvalidWeight {
                name: "alpha",
                value: -0.5
            })
        );

        let nan = RepatternWeights {
            alpha: 1.0,
            lambda: f64::NAN,
        };
        assert!(matches!(
            nan.validate(),
            Err(PlanError::InvalidWeight { name: "lambda", .. })
        ));

        assert!(RepatternWeights {
            alpha: 0.0,
            lambda: 0.0
        }
        .validate()
        .is_ok());
    }
}
