// tests/common/mod.rs

#![allow(dead_code)]

use dos_repattern::{MonthlyProjection, PlanInputs, ValidatedPlan, MONTHS};

pub const TOL: f64 = 1e-3;

pub fn approx(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

/// `inventory[i] = inventory[i-1] + inflow[i] - sales[i]` for every window
/// month, seeded by the plan's opening stock.
pub fn assert_inventory_recurrence(plan: &ValidatedPlan, inputs: &PlanInputs, p: &MonthlyProjection) {
    for i in plan.start_month..MONTHS {
        let previous = if i == plan.start_month {
            plan.initial_inventory
        } else {
            p.inventory_levels[i - 1]
        };
        let expected = previous + f64::from(inputs.wholesale_inflow[i]) - p.final_sales[i];
        assert!(
            approx(p.inventory_levels[i], expected, TOL),
            "month {}: inventory {} != {}",
            i,
            p.inventory_levels[i],
            expected
        );
        assert!(p.inventory_levels[i] >= -TOL, "month {} inventory negative", i);
    }
}

/// `min_dos <= days_of_supply <= max_dos` wherever sales are positive.
pub fn assert_dos_band(plan: &ValidatedPlan, inputs: &PlanInputs, p: &MonthlyProjection) {
    for i in plan.start_month..MONTHS {
        if p.final_sales[i] <= 0.0 {
            assert_eq!(p.days_of_supply[i], None);
            continue;
        }
        let dos = p.days_of_supply[i].expect("positive sales must have a DoS");
        assert!(
            dos >= inputs.min_dos[i] - TOL && dos <= inputs.max_dos[i] + TOL,
            "month {}: DoS {} outside [{}, {}]",
            i,
            dos,
            inputs.min_dos[i],
            inputs.max_dos[i]
        );
    }
}

pub fn assert_frozen_months_kept(inputs: &PlanInputs, p: &MonthlyProjection) {
    for i in 0..MONTHS {
        if inputs.frozen[i] {
            assert_eq!(p.final_sales[i], f64::from(inputs.original_sales[i]), "month {}", i);
        }
    }
}

pub fn assert_integral_sales(p: &MonthlyProjection) {
    for (i, s) in p.final_sales.iter().enumerate() {
        assert_eq!(s.fract(), 0.0, "month {} sales {} not integral", i, s);
    }
}
