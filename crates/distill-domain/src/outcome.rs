//! Per-item outcomes for stages that process items independently
//!
//! Extraction works per document and synthesis per theme. A failure on one
//! item is recorded here instead of aborting its siblings.

use crate::PipelineStage;
use serde::{Deserialize, Serialize};

/// Why a single item was dropped from a stage's output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemFailure {
    /// Document id or theme id
    pub item_id: String,

    /// Stage in which the item failed
    pub stage: PipelineStage,

    /// Human-readable cause
    pub reason: String,
}

impl ItemFailure {
    /// Create a failure record
    pub fn new(item_id: impl Into<String>, stage: PipelineStage, reason: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            stage,
            reason: reason.into(),
        }
    }
}

/// Result of processing one item
pub type ItemResult<T> = Result<T, ItemFailure>;

/// Successes and failures of a batch, both in input order
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome<T> {
    /// Items that completed
    pub succeeded: Vec<T>,

    /// Items that were dropped
    pub failures: Vec<ItemFailure>,
}

impl<T> BatchOutcome<T> {
    /// Number of items attempted
    pub fn attempted(&self) -> usize {
        self.succeeded.len() + self.failures.len()
    }
}

impl<T> Default for BatchOutcome<T> {
    fn default() -> Self {
        Self {
            succeeded: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> FromIterator<ItemResult<T>> for BatchOutcome<T> {
    fn from_iter<I: IntoIterator<Item = ItemResult<T>>>(iter: I) -> Self {
        let mut outcome = BatchOutcome::default();
        for result in iter {
            match result {
                Ok(item) => outcome.succeeded.push(item),
                Err(failure) => outcome.failures.push(failure),
            }
        }
        outcome
    }
}
