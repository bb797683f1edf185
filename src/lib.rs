//! RfmForge: A Rust CLI application for RFM user scoring
//!
//! This library computes RFM (Recency, Frequency, Measurement) behavioral
//! scores for a population of users by quantile-binning each raw signal
//! against its distribution across the whole population, then combining the
//! three ordinal scores into a composite score and class code per user.

pub mod binning;
pub mod cache;
pub mod cli;
pub mod data;
pub mod error;
pub mod report;
pub mod score;

// Re-export public items for easier access
pub use binning::{bin, Binned, QuantilePartition, ScoreLabels};
pub use cache::{fingerprint, Fingerprint, ScoreCache};
pub use cli::Args;
pub use data::{load_dataset, write_scored, write_thresholds, RfmDataset};
pub use error::{Metric, ScoreError};
pub use report::ThresholdReport;
pub use score::{score, MetricBoundaries, ScoredDataset};

/// Common result type used throughout the library
pub type Result<T> = std::result::Result<T, ScoreError>;
