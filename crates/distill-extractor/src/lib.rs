//! Distill Extractor
//!
//! Converts one free-text document into one structured `AnalyzedDocument`.
//!
//! # Overview
//!
//! The Extractor is the first pipeline stage. Every field except the core
//! principle comes from deterministic keyword scans; the core principle comes
//! from a pluggable [`PrincipleStrategy`](distill_domain::PrincipleStrategy).
//!
//! # Architecture
//!
//! ```text
//! Document → Extractor ─┬─ PrincipleStrategy (heuristic | generative → LLM)
//!                       └─ heuristics (rules, context, evidence, tags, quality)
//!                       → AnalyzedDocument
//! ```
//!
//! # Key Features
//!
//! - **Heuristic by default**: no configuration means no external calls
//! - **Generative fallback**: LLM failures downgrade to the keyword scan
//! - **Per-item failures**: a bad document is reported, never fatal to a batch
//!
//! # Example Usage
//!
//! ```
//! use distill_domain::Document;
//! use distill_extractor::Extractor;
//!
//! let extractor = Extractor::heuristic();
//! let doc = Document::new(
//!     "doc_001",
//!     "notes.md",
//!     "Key lesson learned: never size a position you cannot sleep with.",
//! );
//!
//! let analyzed = extractor.analyze(&doc).unwrap();
//! assert!(analyzed.core_principle.starts_with("Key lesson"));
//! assert_eq!(analyzed.actionable_rules.dont_rules.len(), 1);
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
pub mod heuristics;
mod parser;
mod prompt;
mod strategy;

#[cfg(test)]
mod tests;

pub use config::{BackendConfig, BackendKind, ExtractorConfig};
pub use error::ExtractorError;
pub use extractor::Extractor;
pub use parser::parse_principle_response;
pub use prompt::{PromptBuilder, PRINCIPLE_SCHEMA};
pub use strategy::{GenerativeExtractor, HeuristicExtractor, HEURISTIC_CONFIDENCE, HEURISTIC_REASONING};
