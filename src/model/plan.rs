// src/model/plan.rs

use serde::{Deserialize, Serialize};

/// Length of every planning horizon handled by the crate.
pub const MONTHS: usize = 12;

pub const MONTH_NAMES: [&str; MONTHS] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Raw month-aligned series as supplied by a caller or a plan file.
///
/// Lengths are not trusted here; `planning::validator::validate` checks them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanInputs {
    pub original_sales: Vec<u32>,
    pub wholesale_inflow: Vec<u32>,
    pub dealer_stock: Vec<u32>,
    pub min_dos: Vec<f64>,
    pub max_dos: Vec<f64>,
    pub frozen: Vec<bool>,
    pub selling_days: Vec<u32>,
}

impl PlanInputs {
    /// Every month carries the same values, nothing frozen.
    pub fn uniform(
        sales: u32,
        inflow: u32,
        dealer_stock: u32,
        dos_band: (f64, f64),
        selling_days: u32,
    ) -> Self {
        Self {
            original_sales: vec![sales; MONTHS],
            wholesale_inflow: vec![inflow; MONTHS],
            dealer_stock: vec![dealer_stock; MONTHS],
            min_dos: vec![dos_band.0; MONTHS],
            max_dos: vec![dos_band.1; MONTHS],
            frozen: vec![false; MONTHS],
            selling_days: vec![selling_days; MONTHS],
        }
    }

    /// Freezes the first `count` months (history already booked).
    pub fn with_frozen_prefix(mut self, count: usize) -> Self {
        for (i, flag) in self.frozen.iter_mut().enumerate() {
            *flag = i < count;
        }
        self
    }
}

/// How a month takes part in a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthKind {
    /// Before the first adjustable month. Sales and stock are history.
    Locked,
    /// Frozen, but after the first adjustable month. Sales stay at baseline,
    /// inventory still flows through the solver.
    Pinned,
    /// Sales are a decision variable.
    Adjustable,
}

impl MonthKind {
    /// Whether the month lies inside the solver window.
    pub fn in_window(self) -> bool {
        !matches!(self, MonthKind::Locked)
    }
}

/// One validated month of the plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthSlot {
    pub index: usize,
    pub kind: MonthKind,
    pub original_sales: u32,
    pub wholesale_inflow: u32,
    pub dealer_stock: u32,
    pub min_dos: f64,
    pub max_dos: f64,
    pub selling_days: u32,
}

impl MonthSlot {
    pub fn name(&self) -> &'static str {
        MONTH_NAMES[self.index]
    }
}

/// A plan that passed shape validation, with its derived solve window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedPlan {
    pub months: [MonthSlot; MONTHS],
    /// First month with `frozen = false`; `MONTHS` when the plan is fully frozen.
    pub start_month: usize,
    /// Dealer stock carried into `start_month`. Can be negative when it is
    /// back-derived from inconsistent month-0 figures.
    pub initial_inventory: f64,
}

impl ValidatedPlan {
    /// Months inside the solver window, in order.
    pub fn window(&self) -> &[MonthSlot] {
        &self.months[self.start_month..]
    }

    pub fn is_fully_frozen(&self) -> bool {
        self.start_month == MONTHS
    }

    /// Baseline sales already booked before the window opens.
    pub fn locked_sales(&self) -> i64 {
        self.months[..self.start_month]
            .iter()
            .map(|m| i64::from(m.original_sales))
            .sum()
    }

    pub fn original_total(&self) -> i64 {
        self.months.iter().map(|m| i64::from(m.original_sales)).sum()
    }
}
