//! Dataset loading and metric column extraction using Polars

use std::fs::File;

use polars::prelude::*;

use crate::error::{Metric, ScoreError};
use crate::report::ThresholdReport;
use crate::score::ScoredDataset;

/// A validated input table: the original frame plus the three metric
/// columns extracted to plain vectors.
///
/// Row order is preserved; any passthrough columns (user identifiers,
/// attributes) stay untouched in `frame` and realign positionally with the
/// score columns added later.
#[derive(Debug, Clone)]
pub struct RfmDataset {
    frame: DataFrame,
    recency: Vec<f64>,
    frequency: Vec<f64>,
    measurement: Vec<f64>,
}

impl RfmDataset {
    /// Validate a table and extract its metric columns.
    ///
    /// Fails with `SchemaMismatch` when a required column is absent, or
    /// `InvalidValue` naming the first row whose cell is null, non-numeric,
    /// or non-finite.
    pub fn from_frame(frame: DataFrame) -> crate::Result<Self> {
        let recency = extract_metric(&frame, Metric::Recency)?;
        let frequency = extract_metric(&frame, Metric::Frequency)?;
        let measurement = extract_metric(&frame, Metric::Measurement)?;
        Ok(Self {
            frame,
            recency,
            frequency,
            measurement,
        })
    }

    /// The original table, passthrough columns included.
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Raw values for one metric, in row order.
    pub fn values(&self, metric: Metric) -> &[f64] {
        match metric {
            Metric::Recency => &self.recency,
            Metric::Frequency => &self.frequency,
            Metric::Measurement => &self.measurement,
        }
    }
}

/// Load a CSV file into a validated dataset.
///
/// The file must carry a header row with at least the `r_value`, `f_value`,
/// and `m_value` columns; any further columns pass through unmodified.
pub fn load_dataset(path: &str) -> crate::Result<RfmDataset> {
    let frame = CsvReader::from_path(path)?.has_header(true).finish()?;
    RfmDataset::from_frame(frame)
}

/// Write the scored table (original columns plus `R`, `F`, `M`,
/// `RFM_score`, `RFM_class`) to a CSV file.
pub fn write_scored(path: &str, scored: &ScoredDataset) -> crate::Result<()> {
    let mut frame = scored.frame.clone();
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).finish(&mut frame)?;
    Ok(())
}

/// Write the threshold table (one row per metric, one column per label) to
/// a CSV file.
pub fn write_thresholds(path: &str, report: &ThresholdReport) -> crate::Result<()> {
    let mut frame = report.to_frame()?;
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).finish(&mut frame)?;
    Ok(())
}

/// Pull one metric column out of the frame as `Vec<f64>`.
fn extract_metric(frame: &DataFrame, metric: Metric) -> crate::Result<Vec<f64>> {
    let column = metric.column();
    let series = frame
        .column(column)
        .map_err(|_| ScoreError::SchemaMismatch {
            column: column.to_string(),
        })?;

    // Non-strict cast: integer columns widen, text columns turn
    // unparseable cells into nulls caught by the scan below.
    let series = series
        .cast(&DataType::Float64)
        .map_err(|_| ScoreError::InvalidValue {
            row: 0,
            column: column.to_string(),
        })?;
    let cells = series.f64()?;

    let mut values = Vec::with_capacity(cells.len());
    for (row, cell) in cells.into_iter().enumerate() {
        match cell {
            Some(v) if v.is_finite() => values.push(v),
            _ => {
                return Err(ScoreError::InvalidValue {
                    row,
                    column: column.to_string(),
                })
            }
        }
    }
    Ok(values)
}
