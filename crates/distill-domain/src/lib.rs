//! Distill Domain Layer
//!
//! Core data model for the distill pipeline. Every other crate depends on
//! the value types and trait seams defined here.
//!
//! ## Key Concepts
//!
//! - **Document**: Immutable free-text input, loaded once per run
//! - **AnalyzedDocument**: Per-document extraction (principle, rules, evidence, tags)
//! - **PatternReport**: Corpus-wide frequency and co-occurrence statistics
//! - **Theme**: A named cluster of documents sharing a primary tag
//! - **SynthesisChapter**: The narrative synthesized for one theme
//! - **ValidationReport**: Quality scoring of the chapters
//!
//! ## Architecture
//!
//! - Pure data and business rules only; no I/O
//! - Every derived entity is created fresh per run and never mutated after
//!   the stage that produced it
//! - Trait definitions for the pluggable pieces (LLM provider, principle strategy)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod outcome;
pub mod patterns;
pub mod stage;
pub mod synthesis;
pub mod theme;
pub mod traits;
pub mod validation;

// Re-exports for convenience
pub use document::{ActionableRules, AnalyzedDocument, Document, TriggeringContext};
pub use outcome::{BatchOutcome, ItemFailure, ItemResult};
pub use patterns::{
    ConceptFrequency, CooccurrenceReport, FrequencyDistribution, FrequencyReport, PatternReport,
    StrongCooccurrence,
};
pub use stage::PipelineStage;
pub use synthesis::{
    ChapterRules, Contradiction, CorePrinciple, ResolutionStatus, SynthesisChapter,
};
pub use theme::{CrossThemePattern, OrphanDocument, Theme, ThemeStructure};
pub use traits::{LlmProvider, PrincipleExtraction, PrincipleStrategy};
pub use validation::{
    CheckStatus, CoherenceValidation, ContradictionValidation, EvidenceValidation, EvidenceWarning,
    InternalChecks, InternalValidation, RedFlag, Severity, ValidationReport,
};
