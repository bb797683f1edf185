//! Error taxonomy for the scoring pipeline

use std::fmt;

use polars::error::PolarsError;
use thiserror::Error;

/// The three behavioral signals scored by the pipeline.
///
/// Each metric maps to a fixed input column name; error messages and the
/// threshold report refer to metrics by that column name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Recency,
    Frequency,
    Measurement,
}

impl Metric {
    /// All metrics, in scoring order (R, then F, then M).
    pub const ALL: [Metric; 3] = [Metric::Recency, Metric::Frequency, Metric::Measurement];

    /// Input column name carrying this metric's raw values.
    pub fn column(&self) -> &'static str {
        match self {
            Metric::Recency => "r_value",
            Metric::Frequency => "f_value",
            Metric::Measurement => "m_value",
        }
    }

    /// Single-letter score column name written to the output table.
    pub fn score_column(&self) -> &'static str {
        match self {
            Metric::Recency => "R",
            Metric::Frequency => "F",
            Metric::Measurement => "M",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Errors raised by dataset loading, binning, and aggregation.
///
/// The first error encountered aborts the whole invocation; the pipeline
/// never returns a partially scored table.
#[derive(Debug, Error)]
pub enum ScoreError {
    /// A required metric column is absent from the input table.
    #[error("required column `{column}` is missing from the input table")]
    SchemaMismatch { column: String },

    /// A metric cell is null, non-numeric, or non-finite.
    #[error("row {row} of column `{column}` holds a missing or non-numeric value")]
    InvalidValue { row: usize, column: String },

    /// Fewer usable rows than requested bins for some metric.
    #[error("column `{column}` has {rows} usable rows, fewer than the {bins} requested bins")]
    InsufficientData {
        column: String,
        rows: usize,
        bins: usize,
    },

    /// Value ties collapsed two quantile boundaries into one.
    #[error(
        "column `{column}` is too heavily tied for the requested bins: \
         quantile boundary {boundary} repeats the value {value}"
    )]
    DegenerateDistribution {
        column: String,
        boundary: usize,
        value: f64,
    },

    /// A partition failed validation (bounds, ordering, or bin count).
    #[error("invalid partition: {reason}")]
    InvalidPartition { reason: String },

    /// A label set failed validation (count, distinctness, or rendering).
    #[error("invalid labels: {reason}")]
    InvalidLabels { reason: String },

    #[error(transparent)]
    Table(#[from] PolarsError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
