//! Distill Validation
//!
//! Scores synthesized chapters and raises red flags about their structure.
//!
//! The Validator runs four independent checks:
//! - Internal: share of chapters with a summary, principles and rules
//! - Contradiction: every contradiction carries a resolution status
//! - Evidence: principles with too little supporting evidence
//! - Coherence: average per-chapter completeness
//!
//! The overall score is the mean of the four sub-scores, always in [0, 10].
//!
//! # Examples
//!
//! ```
//! use distill_domain::PatternReport;
//! use distill_validator::{ValidationConfig, Validator};
//!
//! let validator = Validator::new(ValidationConfig::default());
//! let report = validator.validate(&[], &[], &PatternReport::default());
//! assert!((0.0..=10.0).contains(&report.overall_quality_score));
//! ```

#![warn(missing_docs)]

mod config;
mod validator;

pub use config::ValidationConfig;
pub use validator::Validator;
