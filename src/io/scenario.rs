// src/io/scenario.rs

use crate::error::InputError;
use crate::model::plan::{PlanInputs, MONTHS};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use std::f64::consts::PI;

/// Annual target used when the caller gives none.
pub const DEFAULT_SALES_TARGET: i64 = 150_000;

/// The planner's starting table: a flat 10k/month plan with matching
/// wholesale, 7.5k dealer stock, a 15–60 day band and 24 selling days.
pub fn default_plan() -> PlanInputs {
    PlanInputs::uniform(10_000, 10_000, 7_500, (15.0, 60.0), 24)
}

/// Parameters of a random seasonal plan.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalScenario {
    /// Average monthly baseline sales.
    pub base_sales: f64,
    /// Relative height of the yearly sine wave (0.25 = ±25%).
    pub amplitude: f64,
    /// Standard deviation of the month-level noise, in units.
    pub noise_sd: f64,
    /// Days of supply the reference dealer stock is built around.
    pub stock_cover_days: f64,
    pub dos_band: (f64, f64),
    pub selling_days: u32,
    pub frozen_months: usize,
}

impl Default for SeasonalScenario {
    fn default() -> Self {
        Self {
            base_sales: 10_000.0,
            amplitude: 0.25,
            noise_sd: 800.0,
            stock_cover_days: 30.0,
            dos_band: (15.0, 60.0),
            selling_days: 24,
            frozen_months: 0,
        }
    }
}

/// Generates a baseline plan with a sinusoidal season plus normal noise.
///
/// Wholesale inflow follows the baseline with its own noise, and dealer stock
/// holds `stock_cover_days` of the month's sales. Every baseline month stays
/// at one unit or more.
pub fn generate_seasonal_plan<R: Rng + ?Sized>(
    rng: &mut R,
    scenario: &SeasonalScenario,
) -> Result<PlanInputs, InputError> {
    if !scenario.noise_sd.is_finite() || scenario.noise_sd < 0.0 {
        return Err(InputError::InvalidScenario(format!(
            "noise_sd must be finite and non-negative, got {}",
            scenario.noise_sd
        )));
    }
    let noise = Normal::new(0.0, scenario.noise_sd)
        .map_err(|e| InputError::InvalidScenario(e.to_string()))?;
    if scenario.selling_days == 0 {
        return Err(InputError::InvalidScenario(
            "selling_days must be positive".to_string(),
        ));
    }

    let mut sample = |mean: f64| -> u32 {
        let value = (mean + noise.sample(&mut *rng)).round();
        if value < 1.0 {
            1
        } else {
            value as u32
        }
    };

    let mut original_sales = Vec::with_capacity(MONTHS);
    let mut wholesale_inflow = Vec::with_capacity(MONTHS);
    let mut dealer_stock = Vec::with_capacity(MONTHS);

    for month in 0..MONTHS {
        let season = 1.0 + scenario.amplitude * (2.0 * PI * month as f64 / MONTHS as f64).sin();
        let sales = sample(scenario.base_sales * season);
        let inflow = sample(f64::from(sales));
        let stock =
            (f64::from(sales) * scenario.stock_cover_days / f64::from(scenario.selling_days)).round();

        original_sales.push(sales);
        wholesale_inflow.push(inflow);
        dealer_stock.push(stock as u32);
    }

    Ok(PlanInputs {
        original_sales,
        wholesale_inflow,
        dealer_stock,
        min_dos: vec![scenario.dos_band.0; MONTHS],
        max_dos: vec![scenario.dos_band.1; MONTHS],
        frozen: vec![false; MONTHS],
        selling_days: vec![scenario.selling_days; MONTHS],
    }
    .with_frozen_prefix(scenario.frozen_months))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn default_plan_matches_planner_table() {
        let plan = default_plan();
        assert_eq!(plan.original_sales, vec![10_000; 12]);
        assert_eq!(plan.dealer_stock, vec![7_500; 12]);
        assert_eq!(plan.min_dos, vec![15.0; 12]);
        assert_eq!(plan.max_dos, vec![60.0; 12]);
        assert!(plan.frozen.iter().all(|f| !f));
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let scenario = SeasonalScenario::default();
        let a = generate_seasonal_plan(&mut StdRng::seed_from_u64(7), &scenario).unwrap();
        let b = generate_seasonal_plan(&mut StdRng::seed_from_u64(7), &scenario).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn noiseless_plan_follows_the_season() {
        let scenario = SeasonalScenario {
            noise_sd: 0.0,
            frozen_months: 3,
            ..SeasonalScenario::default()
        };
        let plan = generate_seasonal_plan(&mut StdRng::seed_from_u64(1), &scenario).unwrap();

        assert_eq!(plan.original_sales[0], 10_000);
        assert_eq!(plan.original_sales[3], 12_500);
        assert_eq!(plan.original_sales[9], 7_500);
        assert_eq!(plan.wholesale_inflow, plan.original_sales);
        // 12500 * 30 / 24
        assert_eq!(plan.dealer_stock[3], 15_625);
        assert_eq!(plan.frozen[..4], [true, true, true, false]);
    }

    #[test]
    fn rejects_negative_or_non_finite_noise() {
        for noise_sd in [-1.0, -1e-9, f64::NAN, f64::INFINITY] {
            let scenario = SeasonalScenario {
                noise_sd,
                ..SeasonalScenario::default()
            };
            assert!(
                matches!(
                    generate_seasonal_plan(&mut StdRng::seed_from_u64(1), &scenario),
                    Err(InputError::InvalidScenario(_))
                ),
                "noise_sd {} accepted",
                noise_sd
            );
        }
    }
}
