//! Distill Pattern Recognition
//!
//! Corpus-wide statistics over analyzed documents.
//!
//! - [`FrequencyMiner`]: how often each tag or principle keyword appears
//! - [`CooccurrenceMiner`]: which tags tend to land on the same documents
//!
//! Both miners only read the analyzed documents, so they can run in
//! parallel. Rankings are deterministic: ties keep first-encounter order.
//!
//! # Examples
//!
//! ```
//! use distill_domain::PatternReport;
//! use distill_patterns::{CooccurrenceMiner, FrequencyMiner};
//!
//! let report = PatternReport::new(
//!     FrequencyMiner::new().mine(&[]),
//!     CooccurrenceMiner::new().mine(&[]),
//! );
//! assert!(report.frequency.high_frequency_concepts.is_empty());
//! assert!(report.cooccurrence.causal_chains.is_empty());
//! ```

#![warn(missing_docs)]

mod cooccurrence;
mod counter;
mod frequency;

pub use cooccurrence::{CooccurrenceMiner, MIN_JOINT_COUNT, MIN_RATE, TOP_PAIRS};
pub use counter::OrderedCounter;
pub use frequency::{FrequencyMiner, MIN_SIGNIFICANT_COUNT, SIGNIFICANT_SHARE, TOP_CONCEPTS};
