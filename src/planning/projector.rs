// src/planning/projector.rs

use crate::model::plan::{MonthKind, ValidatedPlan, MONTHS};
use crate::model::result::MonthlyProjection;

/// Days of supply: stock over the daily sales rate. `None` at zero sales.
pub fn days_of_supply(inventory: f64, sales: f64, selling_days: u32) -> Option<f64> {
    if sales > 0.0 {
        Some(inventory / (sales / f64::from(selling_days)))
    } else {
        None
    }
}

/// Rebuilds the twelve-month series from window values.
///
/// `window_sales` and `window_inventory` are indexed like
/// `ValidatedPlan::window()`. Frozen months keep their baseline sales;
/// months before the window keep their recorded dealer stock.
pub fn project(
    plan: &ValidatedPlan,
    window_sales: &[f64],
    window_inventory: &[f64],
) -> MonthlyProjection {
    debug_assert_eq!(window_sales.len(), plan.window().len());
    debug_assert_eq!(window_inventory.len(), plan.window().len());

    let final_sales: [f64; MONTHS] = std::array::from_fn(|i| {
        let slot = &plan.months[i];
        match slot.kind {
            MonthKind::Locked | MonthKind::Pinned => f64::from(slot.original_sales),
            MonthKind::Adjustable => window_sales[i - plan.start_month],
        }
    });

    let inventory_levels: [f64; MONTHS] = std::array::from_fn(|i| {
        let slot = &plan.months[i];
        if slot.kind.in_window() {
            window_inventory[i - plan.start_month]
        } else {
            f64::from(slot.dealer_stock)
        }
    });

    let days_of_supply = std::array::from_fn(|i| {
        days_of_supply(
            inventory_levels[i],
            final_sales[i],
            plan.months[i].selling_days,
        )
    });

    MonthlyProjection {
        final_sales,
        inventory_levels,
        days_of_supply,
    }
}

/// Final over baseline sales per month; `None` where the baseline is zero.
pub fn sales_ratios(plan: &ValidatedPlan, final_sales: &[f64; MONTHS]) -> [Option<f64>; MONTHS] {
    std::array::from_fn(|i| {
        let original = plan.months[i].original_sales;
        (original != 0).then(|| final_sales[i] / f64::from(original))
    })
}
