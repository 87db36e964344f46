//! Core Extractor implementation

use crate::config::{BackendKind, ExtractorConfig};
use crate::error::ExtractorError;
use crate::heuristics::{
    analyze_context, extract_evidence, extract_rules, generate_tags, score_quality,
};
use crate::strategy::{GenerativeExtractor, HeuristicExtractor};
use distill_domain::{
    AnalyzedDocument, Document, ItemFailure, ItemResult, PipelineStage, PrincipleStrategy,
};
use distill_llm::OllamaProvider;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The Extractor turns one document into one analyzed document
///
/// Cheap to clone; clones share the principle strategy.
#[derive(Clone)]
pub struct Extractor {
    strategy: Arc<dyn PrincipleStrategy>,
    config: ExtractorConfig,
}

impl Extractor {
    /// Create an Extractor around an explicit strategy
    pub fn new(strategy: Arc<dyn PrincipleStrategy>, config: ExtractorConfig) -> Self {
        Self { strategy, config }
    }

    /// Heuristic extractor with default limits
    pub fn heuristic() -> Self {
        Self::new(Arc::new(HeuristicExtractor), ExtractorConfig::default())
    }

    /// Build the strategy named by the configuration
    pub fn from_config(config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;

        let strategy: Arc<dyn PrincipleStrategy> = match config.backend.provider {
            BackendKind::Heuristic => Arc::new(HeuristicExtractor),
            BackendKind::Ollama => {
                let provider =
                    OllamaProvider::new(config.backend.endpoint.clone(), config.backend.model.clone())
                        .with_timeout(config.backend.timeout())
                        .with_max_retries(config.backend.max_retries);
                info!(
                    "Using Ollama backend '{}' at {}",
                    config.backend.model, config.backend.endpoint
                );
                Arc::new(
                    GenerativeExtractor::new(provider)
                        .with_prompt_char_limit(config.prompt_char_limit),
                )
            }
        };

        Ok(Self::new(strategy, config))
    }

    /// Name of the installed principle strategy
    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Analyze a single document
    ///
    /// Only the document's own text is read, so the result depends on
    /// nothing but the content and the strategy.
    pub fn analyze(&self, document: &Document) -> Result<AnalyzedDocument, ExtractorError> {
        let content = &document.content;
        if let Some(max) = self.config.max_text_length {
            if content.len() > max {
                return Err(ExtractorError::TextTooLong {
                    len: content.len(),
                    max,
                });
            }
        }

        let principle = self.strategy.extract_principle(content);
        let actionable_rules = extract_rules(content);
        let triggering_context = analyze_context(content);
        let evidence = extract_evidence(content);
        let tags = generate_tags(content);
        let quality_score = score_quality(content, &evidence, &actionable_rules);

        debug!(
            "Document {}: {} tags, {} evidence, quality {:.1}",
            document.document_id,
            tags.len(),
            evidence.len(),
            quality_score
        );

        Ok(AnalyzedDocument {
            document_id: document.document_id.clone(),
            filename: document.filename.clone(),
            original_content: content.clone(),
            date_created: document.date_created,
            core_principle: principle.core_principle,
            actionable_rules,
            triggering_context,
            evidence,
            contradictions: Vec::new(),
            tags,
            quality_score,
            confidence: principle.confidence,
            reasoning: principle.reasoning,
        })
    }

    /// Analyze one document as an item of a batch
    ///
    /// A failure is logged against the document id and returned as an
    /// [`ItemFailure`], so a batch runner can carry on with the siblings.
    pub fn analyze_item(&self, document: &Document) -> ItemResult<AnalyzedDocument> {
        self.analyze(document).map_err(|e| {
            warn!("Failed to analyze {}: {}", document.document_id, e);
            ItemFailure::new(&document.document_id, PipelineStage::Deconstruction, e.to_string())
        })
    }
}

impl std::fmt::Debug for Extractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extractor")
            .field("strategy", &self.strategy.name())
            .field("config", &self.config)
            .finish()
    }
}
