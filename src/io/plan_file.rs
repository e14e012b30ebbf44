// src/io/plan_file.rs

use crate::error::InputError;
use crate::model::plan::{PlanInputs, MONTH_NAMES};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Rows of the plan table, one per input series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Series {
    OriginalSales,
    WholesaleInflow,
    DealerStock,
    MinDos,
    MaxDos,
    Frozen,
    SellingDays,
}

impl Series {
    const ALL: [Series; 7] = [
        Series::OriginalSales,
        Series::WholesaleInflow,
        Series::DealerStock,
        Series::MinDos,
        Series::MaxDos,
        Series::Frozen,
        Series::SellingDays,
    ];

    fn name(self) -> &'static str {
        match self {
            Series::OriginalSales => "original_sales",
            Series::WholesaleInflow => "wholesale_inflow",
            Series::DealerStock => "dealer_stock",
            Series::MinDos => "min_dos",
            Series::MaxDos => "max_dos",
            Series::Frozen => "frozen",
            Series::SellingDays => "selling_days",
        }
    }

    /// Accepts snake_case names and the planner's table captions
    /// ("Original Sales", "Wholesales", "Min DoS", "Frozen Months (1=Frozen, ...)").
    fn from_label(label: &str) -> Option<Series> {
        let key: String = label
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "originalsales" => Some(Series::OriginalSales),
            "wholesales" | "wholesaleinflow" => Some(Series::WholesaleInflow),
            "dealerstock" => Some(Series::DealerStock),
            "mindos" | "mindostargets" => Some(Series::MinDos),
            "maxdos" | "maxdostargets" => Some(Series::MaxDos),
            "sellingdays" => Some(Series::SellingDays),
            k if k.starts_with("frozen") => Some(Series::Frozen),
            _ => None,
        }
    }
}

fn parse_count(series: Series, column: usize, raw: &str) -> Result<u32, InputError> {
    let bad = || InputError::BadValue {
        series: series.name(),
        column,
        value: raw.to_string(),
    };
    if let Ok(v) = raw.parse::<u32>() {
        return Ok(v);
    }
    // Spreadsheet exports often write integral cells as `10000.0`.
    let v: f64 = raw.parse().map_err(|_| bad())?;
    if v >= 0.0 && v.fract() == 0.0 && v <= f64::from(u32::MAX) {
        Ok(v as u32)
    } else {
        Err(bad())
    }
}

fn parse_days(series: Series, column: usize, raw: &str) -> Result<f64, InputError> {
    raw.parse::<f64>().map_err(|_| InputError::BadValue {
        series: series.name(),
        column,
        value: raw.to_string(),
    })
}

fn parse_flag(series: Series, column: usize, raw: &str) -> Result<bool, InputError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Ok(true),
        "0" | "false" | "no" | "n" | "" => Ok(false),
        _ => Err(InputError::BadValue {
            series: series.name(),
            column,
            value: raw.to_string(),
        }),
    }
}

fn parse_all<T>(
    series: Series,
    cells: &[String],
    parse: fn(Series, usize, &str) -> Result<T, InputError>,
) -> Result<Vec<T>, InputError> {
    cells
        .iter()
        .enumerate()
        .map(|(i, raw)| parse(series, i + 1, raw))
        .collect()
}

/// Reads a plan laid out as the planner's input table: a header row, then one
/// row per series with a label followed by one cell per month.
///
/// Row lengths are kept as found; the validator reports any series that does
/// not have twelve months.
pub fn read_plan_csv<R: Read>(reader: R) -> Result<PlanInputs, InputError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows: [Option<Vec<String>>; 7] = Default::default();
    for record in rdr.records() {
        let record = record?;
        let label = record.get(0).unwrap_or_default();
        if label.is_empty() {
            continue;
        }
        let series =
            Series::from_label(label).ok_or_else(|| InputError::UnknownSeries(label.to_string()))?;
        let slot = &mut rows[series as usize];
        if slot.is_some() {
            return Err(InputError::DuplicateSeries(series.name()));
        }
        *slot = Some(record.iter().skip(1).map(str::to_string).collect());
    }

    let mut take = |series: Series| {
        rows[series as usize]
            .take()
            .ok_or(InputError::MissingSeries(series.name()))
    };

    Ok(PlanInputs {
        original_sales: parse_all(Series::OriginalSales, &take(Series::OriginalSales)?, parse_count)?,
        wholesale_inflow: parse_all(
            Series::WholesaleInflow,
            &take(Series::WholesaleInflow)?,
            parse_count,
        )?,
        dealer_stock: parse_all(Series::DealerStock, &take(Series::DealerStock)?, parse_count)?,
        min_dos: parse_all(Series::MinDos, &take(Series::MinDos)?, parse_days)?,
        max_dos: parse_all(Series::MaxDos, &take(Series::MaxDos)?, parse_days)?,
        frozen: parse_all(Series::Frozen, &take(Series::Frozen)?, parse_flag)?,
        selling_days: parse_all(Series::SellingDays, &take(Series::SellingDays)?, parse_count)?,
    })
}

/// Writes `plan` in the layout `read_plan_csv` expects.
pub fn write_plan_csv<W: Write>(writer: W, plan: &PlanInputs) -> Result<(), InputError> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["series".to_string()];
    header.extend(MONTH_NAMES.iter().map(|m| m.to_string()));
    wtr.write_record(&header)?;

    for series in Series::ALL {
        let cells: Vec<String> = match series {
            Series::OriginalSales => plan.original_sales.iter().map(u32::to_string).collect(),
            Series::WholesaleInflow => plan.wholesale_inflow.iter().map(u32::to_string).collect(),
            Series::DealerStock => plan.dealer_stock.iter().map(u32::to_string).collect(),
            Series::MinDos => plan.min_dos.iter().map(f64::to_string).collect(),
            Series::MaxDos => plan.max_dos.iter().map(f64::to_string).collect(),
            Series::Frozen => plan
                .frozen
                .iter()
                .map(|&f| if f { "1" } else { "0" }.to_string())
                .collect(),
            Series::SellingDays => plan.selling_days.iter().map(u32::to_string).collect(),
        };
        let mut row = vec![series.name().to_string()];
        row.extend(cells);
        wtr.write_record(&row)?;
    }

    wtr.flush().map_err(|source| InputError::Io {
        path: "<plan csv>".to_string(),
        source,
    })?;
    Ok(())
}

pub fn read_plan_json<R: Read>(reader: R) -> Result<PlanInputs, InputError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Loads a plan file, choosing the format from its extension.
pub fn load_plan(path: &Path) -> Result<PlanInputs, InputError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let open = || {
        File::open(path).map_err(|source| InputError::Io {
            path: path.display().to_string(),
            source,
        })
    };

    match extension.as_str() {
        "csv" => read_plan_csv(open()?),
        "json" => read_plan_json(open()?),
        other => Err(InputError::UnsupportedFormat(other.to_string())),
    }
}
