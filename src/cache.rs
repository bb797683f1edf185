//! Caller-owned memoization of scoring runs, keyed by content fingerprint

use std::collections::HashMap;
use std::fmt;

use crate::binning::{QuantilePartition, ScoreLabels};
use crate::data::RfmDataset;
use crate::error::Metric;
use crate::score::ScoredDataset;

/// Content hash of (metric columns, partition, labels).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 16]);

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Fingerprint a scoring invocation. Two invocations collide exactly when
/// their metric values, partition fractions, and labels all match.
pub fn fingerprint(
    dataset: &RfmDataset,
    partition: &QuantilePartition,
    labels: &ScoreLabels,
) -> Fingerprint {
    let mut ctx = md5::Context::new();
    for metric in Metric::ALL {
        for value in dataset.values(metric) {
            ctx.consume(value.to_le_bytes());
        }
        // Separator between columns so column splits don't collide
        ctx.consume([0xff]);
    }
    for fraction in partition.fractions() {
        ctx.consume(fraction.to_le_bytes());
    }
    for &label in labels.values() {
        ctx.consume(label.to_le_bytes());
    }
    Fingerprint(ctx.compute().0)
}

/// Explicit score cache. The scoring entry point never consults this;
/// embedding callers own it, decide when to insert, and invalidate keys
/// themselves when their source data changes.
#[derive(Debug, Default)]
pub struct ScoreCache {
    entries: HashMap<Fingerprint, ScoredDataset>,
}

impl ScoreCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &Fingerprint) -> Option<&ScoredDataset> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: Fingerprint, scored: ScoredDataset) {
        self.entries.insert(key, scored);
    }

    /// Drop one entry. Returns whether it was present.
    pub fn invalidate(&mut self, key: &Fingerprint) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
