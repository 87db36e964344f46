//! Principle strategies
//!
//! [`HeuristicExtractor`] scans keywords and never calls out.
//! [`GenerativeExtractor`] asks an LLM and drops back to the heuristic on
//! any call or parse failure, so both report the same shape and never fail.

use crate::error::ExtractorError;
use crate::heuristics::heuristic_principle;
use crate::parser::parse_principle_response;
use crate::prompt::{PromptBuilder, PRINCIPLE_SCHEMA};
use distill_domain::{LlmProvider, PrincipleExtraction, PrincipleStrategy};
use std::fmt::Display;
use tracing::{debug, warn};

/// Confidence reported for keyword-scan principles
pub const HEURISTIC_CONFIDENCE: f64 = 0.5;

/// Reasoning reported for keyword-scan principles
pub const HEURISTIC_REASONING: &str = "heuristic keyword scan";

/// Keyword-scan principle strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicExtractor;

impl PrincipleStrategy for HeuristicExtractor {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn extract_principle(&self, content: &str) -> PrincipleExtraction {
        PrincipleExtraction {
            core_principle: heuristic_principle(content),
            confidence: HEURISTIC_CONFIDENCE,
            reasoning: HEURISTIC_REASONING.to_string(),
        }
    }
}

/// LLM-backed principle strategy with heuristic fallback
pub struct GenerativeExtractor<L> {
    provider: L,
    prompt_char_limit: usize,
    fallback: HeuristicExtractor,
}

impl<L> GenerativeExtractor<L>
where
    L: LlmProvider,
    L::Error: Display,
{
    /// Create a generative strategy over `provider`
    pub fn new(provider: L) -> Self {
        Self {
            provider,
            prompt_char_limit: 2_000,
            fallback: HeuristicExtractor,
        }
    }

    /// Limit how much of each document goes into the prompt
    pub fn with_prompt_char_limit(mut self, prompt_char_limit: usize) -> Self {
        self.prompt_char_limit = prompt_char_limit;
        self
    }

    /// Ask the provider; errors are returned rather than masked
    pub fn try_extract(&self, content: &str) -> Result<PrincipleExtraction, ExtractorError> {
        let prompt = PromptBuilder::new(content)
            .with_char_limit(self.prompt_char_limit)
            .build();

        debug!("Prompt length: {} chars", prompt.len());

        let response = self
            .provider
            .generate_structured(&prompt, PRINCIPLE_SCHEMA)
            .map_err(|e| ExtractorError::Backend(e.to_string()))?;

        debug!("LLM response length: {} chars", response.len());

        parse_principle_response(&response)
    }
}

impl<L> PrincipleStrategy for GenerativeExtractor<L>
where
    L: LlmProvider + Send + Sync,
    L::Error: Display,
{
    fn name(&self) -> &str {
        "generative"
    }

    fn extract_principle(&self, content: &str) -> PrincipleExtraction {
        match self.try_extract(content) {
            Ok(extraction) => extraction,
            Err(e) => {
                warn!("Generative extraction failed, using heuristic: {}", e);
                self.fallback.extract_principle(content)
            }
        }
    }
}
