// src/planning/validator.rs

use crate::error::{PlanError, PlanResult};
use crate::model::plan::{MonthKind, MonthSlot, PlanInputs, ValidatedPlan, MONTHS};

fn check_len<T>(series: &'static str, values: &[T]) -> PlanResult<()> {
    if values.len() != MONTHS {
        return Err(PlanError::Shape {
            series,
            len: values.len(),
        });
    }
    Ok(())
}

/// Checks the twelve-month shape and derives the solve window.
///
/// The only failure is `PlanError::Shape`; value ranges are left to the solver.
pub fn validate(inputs: &PlanInputs) -> PlanResult<ValidatedPlan> {
    check_len("original_sales", &inputs.original_sales)?;
    check_len("wholesale_inflow", &inputs.wholesale_inflow)?;
    check_len("dealer_stock", &inputs.dealer_stock)?;
    check_len("min_dos", &inputs.min_dos)?;
    check_len("max_dos", &inputs.max_dos)?;
    check_len("frozen", &inputs.frozen)?;
    check_len("selling_days", &inputs.selling_days)?;

    let start_month = first_adjustable_month(&inputs.frozen);

    let months = std::array::from_fn(|index| MonthSlot {
        index,
        kind: if index < start_month {
            MonthKind::Locked
        } else if inputs.frozen[index] {
            MonthKind::Pinned
        } else {
            MonthKind::Adjustable
        },
        original_sales: inputs.original_sales[index],
        wholesale_inflow: inputs.wholesale_inflow[index],
        dealer_stock: inputs.dealer_stock[index],
        min_dos: inputs.min_dos[index],
        max_dos: inputs.max_dos[index],
        selling_days: inputs.selling_days[index],
    });

    Ok(ValidatedPlan {
        initial_inventory: opening_inventory(&months, start_month),
        months,
        start_month,
    })
}

/// Index of the first month with `frozen = false`, or `MONTHS` if none.
pub fn first_adjustable_month(frozen: &[bool]) -> usize {
    frozen.iter().position(|f| !f).unwrap_or(MONTHS)
}

/// Stock carried into `start_month`.
///
/// With frozen history it is the last recorded dealer stock. Without history,
/// month 0's dealer stock is taken to already include month-0 activity, so
/// the opening balance is backed out: `stock[0] - inflow[0] + sales[0]`.
pub fn opening_inventory(months: &[MonthSlot; MONTHS], start_month: usize) -> f64 {
    if start_month > 0 {
        f64::from(months[start_month - 1].dealer_stock)
    } else {
        let first = &months[0];
        f64::from(first.dealer_stock) - f64::from(first.wholesale_inflow)
            + f64::from(first.original_sales)
    }
}
