// src/io/reporting.rs

use crate::error::InputError;
use crate::model::plan::{ValidatedPlan, MONTHS};
use crate::model::result::MonthlyProjection;
use crate::planning::compare::PlanComparison;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs::File;
use std::path::Path;

/// One month of the breakdown table. Serialized as a CSV row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyBreakdownRow {
    pub month: &'static str,
    pub original_sales: u32,
    pub final_sales: f64,
    /// Original minus final.
    pub delta_sales: f64,
    pub final_dealer_stock: f64,
    pub max_dos_target: f64,
    pub final_days_of_supply: Option<f64>,
    pub min_dos_target: f64,
    pub ratio: Option<f64>,
}

pub fn breakdown_rows(
    plan: &ValidatedPlan,
    projection: &MonthlyProjection,
    ratios: Option<&[Option<f64>; MONTHS]>,
) -> Vec<MonthlyBreakdownRow> {
    plan.months
        .iter()
        .map(|slot| {
            let i = slot.index;
            MonthlyBreakdownRow {
                month: slot.name(),
                original_sales: slot.original_sales,
                final_sales: projection.final_sales[i],
                delta_sales: f64::from(slot.original_sales) - projection.final_sales[i],
                final_dealer_stock: projection.inventory_levels[i],
                max_dos_target: slot.max_dos,
                final_days_of_supply: projection.days_of_supply[i],
                min_dos_target: slot.min_dos,
                ratio: ratios.and_then(|r| r[i]),
            }
        })
        .collect()
}

/// Formats a unit count the way the planner tables do: rounded, with
/// thousands separators.
pub fn format_units(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

fn format_optional(value: Option<f64>) -> String {
    value.map(format_units).unwrap_or_else(|| "-".to_string())
}

/// Summary table: ceiling, baseline, target, repatterned total and gap.
pub fn render_summary(comparison: &PlanComparison) -> String {
    let rows = [
        ("Max Sales Push", comparison.max_sales_push),
        ("Original", comparison.original_total as f64),
        ("Target", comparison.target as f64),
        ("Final Repattern", comparison.final_total),
        ("Gap to Target", comparison.gap_to_target),
    ];

    let mut out = String::new();
    let _ = writeln!(out, "{:<18}{:>12}", "", "Total Sales");
    for (label, value) in rows {
        let _ = writeln!(out, "{:<18}{:>12}", label, format_units(value));
    }
    for warning in &comparison.repattern.warnings {
        let _ = writeln!(out, "warning: {}", warning);
    }
    out
}

/// Monthly breakdown with metrics as rows and months as columns.
pub fn render_breakdown(rows: &[MonthlyBreakdownRow]) -> String {
    type Cell = fn(&MonthlyBreakdownRow) -> String;
    let metrics: [(&str, Cell); 8] = [
        ("Original Sales", |r| format_units(f64::from(r.original_sales))),
        ("Final Sales", |r| format_units(r.final_sales)),
        ("Δ Sales (Original - Final)", |r| format_units(r.delta_sales)),
        ("Final Dealer Stock", |r| format_units(r.final_dealer_stock)),
        ("Max DoS Target", |r| format_units(r.max_dos_target)),
        ("Final Days of Supply", |r| format_optional(r.final_days_of_supply)),
        ("Min DoS Target", |r| format_units(r.min_dos_target)),
        ("Ratio", |r| {
            r.ratio
                .map(|v| format!("{:.3}", v))
                .unwrap_or_else(|| "-".to_string())
        }),
    ];

    let mut out = String::new();
    let _ = write!(out, "{:<28}", "");
    for row in rows {
        let _ = write!(out, "{:>9}", row.month);
    }
    out.push('\n');
    for (label, cell) in metrics {
        let _ = write!(out, "{:<28}", label);
        for row in rows {
            let _ = write!(out, "{:>9}", cell(row));
        }
        out.push('\n');
    }
    out
}

/// Writes the monthly breakdown to a CSV file.
///
/// # Arguments
/// * `path` - Destination file (e.g. "results/breakdown.csv").
/// * `rows` - Rows produced by `breakdown_rows`.
pub fn write_breakdown_csv(path: &Path, rows: &[MonthlyBreakdownRow]) -> Result<(), InputError> {
    let mut wtr = csv::Writer::from_path(path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush().map_err(|source| InputError::Io {
        path: path.display().to_string(),
        source,
    })?;

    tracing::info!(rows = rows.len(), path = %path.display(), "breakdown exported");
    Ok(())
}

/// Writes any result record as pretty-printed JSON.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), InputError> {
    let file = File::create(path).map_err(|source| InputError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::to_writer_pretty(file, value)?;
    tracing::info!(path = %path.display(), "result exported");
    Ok(())
}
