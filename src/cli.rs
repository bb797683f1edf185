//! Command-line interface definitions and argument parsing

use clap::Parser;

use crate::binning::{QuantilePartition, ScoreLabels};
use crate::error::ScoreError;

/// RFM user scoring CLI using population quantile binning
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input CSV file
    #[arg(short, long, default_value = "data.csv")]
    pub input: String,

    /// Output path for the scored CSV
    #[arg(short, long, default_value = "scored.csv")]
    pub output: String,

    /// Optional output path for the threshold table CSV
    #[arg(short, long)]
    pub thresholds: Option<String>,

    /// Number of equal-width quantile bins (2-5)
    #[arg(short, long, default_value = "4")]
    pub quantiles: usize,

    /// Explicit partition fractions overriding --quantiles
    /// Example: --partition "0,0.1,0.5,1" for two narrow bottom bins
    #[arg(short, long)]
    pub partition: Option<String>,

    /// Score labels, one per bin, ascending = better (default 1..K)
    /// Example: --labels "1,2,3,4"
    #[arg(short, long)]
    pub labels: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Resolve the quantile partition from either --partition or --quantiles.
    pub fn build_partition(&self) -> crate::Result<QuantilePartition> {
        if let Some(ref partition_str) = self.partition {
            let fractions = partition_str
                .split(',')
                .map(|part| {
                    part.trim()
                        .parse::<f64>()
                        .map_err(|_| ScoreError::InvalidPartition {
                            reason: format!("not a number: {part}"),
                        })
                })
                .collect::<crate::Result<Vec<f64>>>()?;
            QuantilePartition::from_fractions(fractions)
        } else {
            if !(2..=5).contains(&self.quantiles) {
                return Err(ScoreError::InvalidPartition {
                    reason: format!(
                        "--quantiles must be between 2 and 5, got {}",
                        self.quantiles
                    ),
                });
            }
            QuantilePartition::uniform(self.quantiles)
        }
    }

    /// Resolve the label set from --labels, defaulting to ascending 1..K.
    pub fn build_labels(&self, bin_count: usize) -> crate::Result<ScoreLabels> {
        if let Some(ref labels_str) = self.labels {
            let values = labels_str
                .split(',')
                .map(|part| {
                    part.trim()
                        .parse::<u32>()
                        .map_err(|_| ScoreError::InvalidLabels {
                            reason: format!("not an integer label: {part}"),
                        })
                })
                .collect::<crate::Result<Vec<u32>>>()?;
            ScoreLabels::from_values(values)
        } else {
            ScoreLabels::ascending(bin_count)
        }
    }
}
