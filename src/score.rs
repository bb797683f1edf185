//! RFM aggregation: per-metric binning composed into RFM_score and RFM_class

use polars::prelude::*;

use crate::binning::{bin, QuantilePartition, ScoreLabels};
use crate::data::RfmDataset;
use crate::error::Metric;

/// Quantile boundary vectors for the three metrics, K+1 values each.
///
/// Exposed so callers can explain a score: `boundaries.get(metric)[i]` and
/// `[i + 1]` bracket the raw values awarded the i-th label.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricBoundaries {
    pub recency: Vec<f64>,
    pub frequency: Vec<f64>,
    pub measurement: Vec<f64>,
}

impl MetricBoundaries {
    pub fn get(&self, metric: Metric) -> &[f64] {
        match metric {
            Metric::Recency => &self.recency,
            Metric::Frequency => &self.frequency,
            Metric::Measurement => &self.measurement,
        }
    }
}

/// The scored table plus the boundaries that produced it.
///
/// `frame` holds every input column unchanged and in the original row
/// order, followed by `R`, `F`, `M`, `RFM_score`, and `RFM_class`.
#[derive(Debug, Clone)]
pub struct ScoredDataset {
    pub frame: DataFrame,
    pub boundaries: MetricBoundaries,
    pub labels: ScoreLabels,
}

impl ScoredDataset {
    /// Number of rows awarded each label for one metric, aligned with the
    /// label order.
    pub fn label_counts(&self, metric: Metric) -> crate::Result<Vec<usize>> {
        let scores = self.frame.column(metric.score_column())?.u32()?;
        let mut counts = vec![0usize; self.labels.len()];
        for cell in scores.into_iter().flatten() {
            if let Some(pos) = self.labels.values().iter().position(|&l| l == cell) {
                counts[pos] += 1;
            }
        }
        Ok(counts)
    }
}

/// Score a dataset: bin each metric against its population distribution,
/// then compose the per-record composite score and class code.
///
/// All three metrics share the same partition and labels. Any binning
/// failure aborts the whole invocation; no partially scored table is ever
/// returned, and the error names the originating metric column.
///
/// # Arguments
/// * `dataset` - Validated input table
/// * `partition` - Quantile fractions defining the bins
/// * `labels` - One ordinal label per bin, ascending = better
pub fn score(
    dataset: &RfmDataset,
    partition: &QuantilePartition,
    labels: &ScoreLabels,
) -> crate::Result<ScoredDataset> {
    let r = bin(dataset.values(Metric::Recency), Metric::Recency, partition, labels)?;
    let f = bin(
        dataset.values(Metric::Frequency),
        Metric::Frequency,
        partition,
        labels,
    )?;
    let m = bin(
        dataset.values(Metric::Measurement),
        Metric::Measurement,
        partition,
        labels,
    )?;

    let n = dataset.len();
    let mut rfm_score = Vec::with_capacity(n);
    let mut rfm_class = Vec::with_capacity(n);
    for i in 0..n {
        let (ri, fi, mi) = (r.assignments[i], f.assignments[i], m.assignments[i]);
        rfm_score.push(ri + fi + mi);
        rfm_class.push(format!("{ri}{fi}{mi}"));
    }

    let mut frame = dataset.frame().clone();
    frame.with_column(Series::new("R", r.assignments))?;
    frame.with_column(Series::new("F", f.assignments))?;
    frame.with_column(Series::new("M", m.assignments))?;
    frame.with_column(Series::new("RFM_score", rfm_score))?;
    frame.with_column(Series::new("RFM_class", rfm_class))?;

    Ok(ScoredDataset {
        frame,
        boundaries: MetricBoundaries {
            recency: r.boundaries,
            frequency: f.boundaries,
            measurement: m.boundaries,
        },
        labels: labels.clone(),
    })
}
