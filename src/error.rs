// src/error.rs

use thiserror::Error;

/// Failures of the planning core: validation and the two solve calls.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    /// An input series does not cover exactly twelve months.
    #[error("series `{series}` has {len} entries, expected 12")]
    Shape { series: &'static str, len: usize },

    /// The solver proved that no assignment satisfies the model.
    #[error("{formulation}: no plan satisfies the inventory and days-of-supply constraints")]
    Infeasible { formulation: &'static str },

    /// The time limit elapsed before the solver produced any incumbent.
    #[error("{formulation}: time limit of {limit_secs:.1}s reached without a feasible solution")]
    Timeout {
        formulation: &'static str,
        limit_secs: f64,
    },

    /// Any other backend failure (unbounded model, internal solver error).
    #[error("{formulation}: solver failed: {message}")]
    Solver {
        formulation: &'static str,
        message: String,
    },

    #[error("weight `{name}` must be finite and non-negative, got {value}")]
    InvalidWeight { name: &'static str, value: f64 },
}

/// Failures while loading a plan or writing reports.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("failed to read or write `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown series label `{0}`")]
    UnknownSeries(String),

    #[error("series `{0}` appears more than once")]
    DuplicateSeries(&'static str),

    #[error("missing series `{0}`")]
    MissingSeries(&'static str),

    #[error("series `{series}`, column {column}: cannot parse `{value}`")]
    BadValue {
        series: &'static str,
        column: usize,
        value: String,
    },

    #[error("unsupported plan file extension `{0}` (expected .csv or .json)")]
    UnsupportedFormat(String),

    #[error("invalid scenario parameters: {0}")]
    InvalidScenario(String),
}

pub type PlanResult<T> = Result<T, PlanError>;
