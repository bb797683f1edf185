//! Quantile binning of a raw metric column into ordinal score labels

use crate::error::{Metric, ScoreError};

/// A quantile partition: K+1 fractions in [0, 1] defining K bins.
///
/// Fractions must start at 0.0, end at 1.0, and be strictly increasing.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantilePartition {
    fractions: Vec<f64>,
}

impl QuantilePartition {
    /// Build a uniform partition of `k` equal-width quantile bins.
    ///
    /// `k = 4` yields the quartile partition `[0, 0.25, 0.5, 0.75, 1]`.
    pub fn uniform(k: usize) -> crate::Result<Self> {
        if k < 2 {
            return Err(ScoreError::InvalidPartition {
                reason: format!("at least 2 bins are required, got {k}"),
            });
        }
        let fractions = (0..=k).map(|i| i as f64 / k as f64).collect();
        Ok(Self { fractions })
    }

    /// Build a partition from an explicit fraction list for non-uniform bins.
    pub fn from_fractions(fractions: Vec<f64>) -> crate::Result<Self> {
        if fractions.len() < 3 {
            return Err(ScoreError::InvalidPartition {
                reason: format!(
                    "a partition needs at least 3 fractions (2 bins), got {}",
                    fractions.len()
                ),
            });
        }
        if fractions[0] != 0.0 {
            return Err(ScoreError::InvalidPartition {
                reason: format!("the first fraction must be 0, got {}", fractions[0]),
            });
        }
        if *fractions.last().unwrap() != 1.0 {
            return Err(ScoreError::InvalidPartition {
                reason: format!(
                    "the last fraction must be 1, got {}",
                    fractions.last().unwrap()
                ),
            });
        }
        for pair in fractions.windows(2) {
            if !(pair[1] > pair[0]) {
                return Err(ScoreError::InvalidPartition {
                    reason: format!("fractions must strictly increase, got {} after {}", pair[1], pair[0]),
                });
            }
        }
        Ok(Self { fractions })
    }

    /// The K+1 quantile fractions.
    pub fn fractions(&self) -> &[f64] {
        &self.fractions
    }

    /// Number of bins (K).
    pub fn bin_count(&self) -> usize {
        self.fractions.len() - 1
    }
}

/// Ordinal score labels, one per bin, ascending position = better score.
///
/// Labels must be distinct and render as a single decimal digit so that the
/// composite class code (three concatenated labels) stays unambiguous.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreLabels {
    values: Vec<u32>,
}

impl ScoreLabels {
    /// Default label set: ascending integers `1..=k`.
    pub fn ascending(k: usize) -> crate::Result<Self> {
        Self::from_values((1..=k as u32).collect())
    }

    /// Build a label set from explicit values.
    pub fn from_values(values: Vec<u32>) -> crate::Result<Self> {
        if values.len() < 2 {
            return Err(ScoreError::InvalidLabels {
                reason: format!("at least 2 labels are required, got {}", values.len()),
            });
        }
        for (i, &label) in values.iter().enumerate() {
            if label > 9 {
                return Err(ScoreError::InvalidLabels {
                    reason: format!(
                        "label {label} does not render as a single digit; \
                         multi-digit labels make the class code ambiguous"
                    ),
                });
            }
            if values[..i].contains(&label) {
                return Err(ScoreError::InvalidLabels {
                    reason: format!("label {label} appears more than once"),
                });
            }
        }
        Ok(Self { values })
    }

    /// The labels in bin order.
    pub fn values(&self) -> &[u32] {
        &self.values
    }

    /// Number of labels (K).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Result of binning one metric column: per-row label assignments plus the
/// K+1 boundary values cut from the empirical distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct Binned {
    pub assignments: Vec<u32>,
    pub boundaries: Vec<f64>,
}

/// Assign each value an ordinal score label from its population quantile.
///
/// Boundaries are the empirical quantiles of `values` at each partition
/// fraction, using linear interpolation between order statistics. A value
/// lands in the lowest bin whose range contains it, with every bin's upper
/// bound inclusive, so a value equal to an interior boundary scores into the
/// lower of the two adjacent bins.
///
/// Heavily tied columns can collapse two boundaries into one; that fails
/// with `DegenerateDistribution` rather than silently merging bins.
///
/// # Arguments
/// * `values` - Raw metric column, one value per row
/// * `metric` - Which metric the column carries, for error attribution
/// * `partition` - Quantile fractions defining the bins
/// * `labels` - One label per bin
pub fn bin(
    values: &[f64],
    metric: Metric,
    partition: &QuantilePartition,
    labels: &ScoreLabels,
) -> crate::Result<Binned> {
    let k = labels.len();
    if partition.bin_count() != k {
        return Err(ScoreError::InvalidPartition {
            reason: format!(
                "partition defines {} bins but {} labels were supplied",
                partition.bin_count(),
                k
            ),
        });
    }
    if values.len() < k {
        return Err(ScoreError::InsufficientData {
            column: metric.column().to_string(),
            rows: values.len(),
            bins: k,
        });
    }
    if let Some(row) = values.iter().position(|v| !v.is_finite()) {
        return Err(ScoreError::InvalidValue {
            row,
            column: metric.column().to_string(),
        });
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let boundaries: Vec<f64> = partition
        .fractions()
        .iter()
        .map(|&q| quantile(&sorted, q))
        .collect();

    for i in 1..boundaries.len() {
        if boundaries[i] <= boundaries[i - 1] {
            return Err(ScoreError::DegenerateDistribution {
                column: metric.column().to_string(),
                boundary: i,
                value: boundaries[i],
            });
        }
    }

    // Interior boundaries only: the index of the first one not below the
    // value is the bin index, which puts boundary ties in the lower bin.
    let inner = &boundaries[1..boundaries.len() - 1];
    let assignments = values
        .iter()
        .map(|&v| {
            let idx = inner.partition_point(|b| *b < v);
            labels.values()[idx]
        })
        .collect();

    Ok(Binned {
        assignments,
        boundaries,
    })
}

/// Empirical quantile with linear interpolation between order statistics.
/// `sorted` must be ascending and non-empty; `q` in [0, 1].
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let rank = q * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let w = rank - lo as f64;
        sorted[lo] * (1.0 - w) + sorted[hi] * w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quartiles() -> QuantilePartition {
        QuantilePartition::uniform(4).unwrap()
    }

    fn labels(k: usize) -> ScoreLabels {
        ScoreLabels::ascending(k).unwrap()
    }

    #[test]
    fn test_quartile_boundaries_and_assignments() {
        let values = [0.0, 5.0, 10.0, 15.0];
        let binned = bin(&values, Metric::Recency, &quartiles(), &labels(4)).unwrap();

        assert_eq!(binned.boundaries, vec![0.0, 3.75, 7.5, 11.25, 15.0]);
        assert_eq!(binned.assignments, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_boundary_tie_scores_into_lower_bin() {
        // Median of [0, 2, 2, 4] is exactly 2; both rows holding 2 take
        // the lower label.
        let values = [0.0, 2.0, 2.0, 4.0];
        let partition = QuantilePartition::uniform(2).unwrap();
        let binned = bin(&values, Metric::Measurement, &partition, &labels(2)).unwrap();

        assert_eq!(binned.boundaries, vec![0.0, 2.0, 4.0]);
        assert_eq!(binned.assignments, vec![1, 1, 1, 2]);
    }

    #[test]
    fn test_extremes_take_first_and_last_label() {
        let values = [3.0, 1.0, 4.0, 1.5, 9.0, 2.6, 5.0, 3.5];
        let binned = bin(&values, Metric::Frequency, &quartiles(), &labels(4)).unwrap();

        let min_pos = 1; // value 1.0
        let max_pos = 4; // value 9.0
        assert_eq!(binned.assignments[min_pos], 1);
        assert_eq!(binned.assignments[max_pos], 4);
    }

    #[test]
    fn test_monotonicity() {
        let values = [12.0, 7.0, 3.0, 22.0, 18.0, 1.0, 9.0, 15.0];
        let binned = bin(&values, Metric::Recency, &quartiles(), &labels(4)).unwrap();

        for i in 0..values.len() {
            for j in 0..values.len() {
                if values[i] > values[j] {
                    assert!(binned.assignments[i] >= binned.assignments[j]);
                }
            }
        }
    }

    #[test]
    fn test_insufficient_data() {
        let values = [1.0, 2.0, 3.0];
        let err = bin(&values, Metric::Frequency, &quartiles(), &labels(4)).unwrap_err();

        match err {
            ScoreError::InsufficientData { column, rows, bins } => {
                assert_eq!(column, "f_value");
                assert_eq!(rows, 3);
                assert_eq!(bins, 4);
            }
            other => panic!("expected InsufficientData, got {other:?}"),
        }
    }

    #[test]
    fn test_degenerate_distribution_fails_fast() {
        let values = [7.0; 8];
        let err = bin(&values, Metric::Measurement, &quartiles(), &labels(4)).unwrap_err();

        match err {
            ScoreError::DegenerateDistribution { column, value, .. } => {
                assert_eq!(column, "m_value");
                assert_eq!(value, 7.0);
            }
            other => panic!("expected DegenerateDistribution, got {other:?}"),
        }
    }

    #[test]
    fn test_non_finite_value_is_rejected() {
        let values = [1.0, 2.0, f64::NAN, 4.0];
        let err = bin(&values, Metric::Recency, &quartiles(), &labels(4)).unwrap_err();

        match err {
            ScoreError::InvalidValue { row, column } => {
                assert_eq!(row, 2);
                assert_eq!(column, "r_value");
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_partition_label_count_mismatch() {
        let values = [1.0, 2.0, 3.0, 4.0];
        let result = bin(&values, Metric::Recency, &quartiles(), &labels(3));
        assert!(matches!(result, Err(ScoreError::InvalidPartition { .. })));
    }

    #[test]
    fn test_uniform_partition_fractions() {
        let partition = QuantilePartition::uniform(4).unwrap();
        assert_eq!(partition.fractions(), &[0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(partition.bin_count(), 4);

        assert!(QuantilePartition::uniform(1).is_err());
    }

    #[test]
    fn test_explicit_partition_validation() {
        assert!(QuantilePartition::from_fractions(vec![0.0, 0.1, 0.5, 1.0]).is_ok());
        // Must span [0, 1]
        assert!(QuantilePartition::from_fractions(vec![0.1, 0.5, 1.0]).is_err());
        assert!(QuantilePartition::from_fractions(vec![0.0, 0.5, 0.9]).is_err());
        // Must strictly increase
        assert!(QuantilePartition::from_fractions(vec![0.0, 0.5, 0.5, 1.0]).is_err());
        // Too short
        assert!(QuantilePartition::from_fractions(vec![0.0, 1.0]).is_err());
    }

    #[test]
    fn test_label_validation() {
        assert_eq!(ScoreLabels::ascending(4).unwrap().values(), &[1, 2, 3, 4]);
        assert!(ScoreLabels::from_values(vec![2, 4, 6, 8]).is_ok());
        // Distinct
        assert!(ScoreLabels::from_values(vec![1, 2, 2, 4]).is_err());
        // Single digit rendering
        assert!(ScoreLabels::from_values(vec![1, 2, 12]).is_err());
        assert!(ScoreLabels::ascending(10).is_err());
        // At least two
        assert!(ScoreLabels::from_values(vec![1]).is_err());
    }

    #[test]
    fn test_quantile_interpolation() {
        let sorted = [0.0, 5.0, 10.0, 15.0];
        assert_eq!(quantile(&sorted, 0.0), 0.0);
        assert_eq!(quantile(&sorted, 0.25), 3.75);
        assert_eq!(quantile(&sorted, 0.5), 7.5);
        assert_eq!(quantile(&sorted, 1.0), 15.0);
    }
}
