//! Threshold report: the raw value a record must reach for each score

use polars::prelude::*;

use crate::binning::ScoreLabels;
use crate::error::Metric;
use crate::score::MetricBoundaries;

/// Per metric and label, the lower boundary value a record must meet to
/// receive that label. Derived from boundaries already computed by the
/// aggregator; no new computation happens here.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdReport {
    labels: Vec<u32>,
    rows: Vec<(Metric, Vec<f64>)>,
}

impl ThresholdReport {
    pub fn new(boundaries: &MetricBoundaries, labels: &ScoreLabels) -> Self {
        let k = labels.len();
        let rows = Metric::ALL
            .iter()
            .map(|&metric| (metric, boundaries.get(metric)[..k].to_vec()))
            .collect();
        Self {
            labels: labels.values().to_vec(),
            rows,
        }
    }

    /// Lower bound for awarding `label` on `metric`, if the label exists.
    pub fn lower_bound(&self, metric: Metric, label: u32) -> Option<f64> {
        let pos = self.labels.iter().position(|&l| l == label)?;
        self.rows
            .iter()
            .find(|(m, _)| *m == metric)
            .map(|(_, bounds)| bounds[pos])
    }

    /// Render as a table: one row per metric, one `score_<label>` column
    /// per label.
    pub fn to_frame(&self) -> crate::Result<DataFrame> {
        let metric_names: Vec<&str> = self.rows.iter().map(|(m, _)| m.column()).collect();
        let mut columns = vec![Series::new("metric", metric_names)];
        for (pos, &label) in self.labels.iter().enumerate() {
            let bounds: Vec<f64> = self.rows.iter().map(|(_, b)| b[pos]).collect();
            columns.push(Series::new(&format!("score_{label}"), bounds));
        }
        Ok(DataFrame::new(columns)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (MetricBoundaries, ScoreLabels) {
        let boundaries = MetricBoundaries {
            recency: vec![0.0, 3.75, 7.5, 11.25, 15.0],
            frequency: vec![3.0, 6.0, 10.5, 15.75, 21.0],
            measurement: vec![12.0, 25.5, 37.625, 54.0625, 80.5],
        };
        (boundaries, ScoreLabels::ascending(4).unwrap())
    }

    #[test]
    fn test_lower_bounds_drop_the_final_boundary() {
        let (boundaries, labels) = sample();
        let report = ThresholdReport::new(&boundaries, &labels);

        assert_eq!(report.lower_bound(Metric::Recency, 1), Some(0.0));
        assert_eq!(report.lower_bound(Metric::Recency, 4), Some(11.25));
        assert_eq!(report.lower_bound(Metric::Frequency, 3), Some(10.5));
        assert_eq!(report.lower_bound(Metric::Measurement, 2), Some(25.5));
        // The top boundary is a maximum, not a threshold
        assert_eq!(report.lower_bound(Metric::Recency, 5), None);
    }

    #[test]
    fn test_frame_shape() {
        let (boundaries, labels) = sample();
        let frame = ThresholdReport::new(&boundaries, &labels).to_frame().unwrap();

        assert_eq!(frame.height(), 3);
        assert_eq!(
            frame.get_column_names(),
            &["metric", "score_1", "score_2", "score_3", "score_4"]
        );
    }
}
