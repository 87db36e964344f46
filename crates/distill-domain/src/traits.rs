//! Trait definitions for pluggable collaborators
//!
//! These traits define the boundaries between the pipeline and the
//! infrastructure that backs it. Implementations live in other crates.

use serde::{Deserialize, Serialize};

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (distill-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate text completion
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Generate with structured output (if supported)
    fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error>;
}

/// Core principle extracted from one document, with the strategy's self-assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrincipleExtraction {
    /// One-sentence claim
    pub core_principle: String,

    /// Confidence in [0, 1]
    pub confidence: f64,

    /// Why this sentence was chosen
    pub reasoning: String,
}

/// Strategy that picks a document's core principle
///
/// Implemented by the extraction layer (distill-extractor). Implementations
/// never fail: a backend that cannot answer must fall back internally, so
/// callers never branch on which strategy is installed.
pub trait PrincipleStrategy: Send + Sync {
    /// Short name for logs and metadata
    fn name(&self) -> &str;

    /// Extract the core principle of `content`
    fn extract_principle(&self, content: &str) -> PrincipleExtraction;
}
