//! Final report and run result

use crate::RunMetrics;
use distill_domain::{ItemFailure, PatternReport, SynthesisChapter, Theme, ValidationReport};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Headline numbers of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Documents that were analyzed successfully
    pub total_documents: usize,

    /// Themes formed in stage 2
    pub total_themes: usize,

    /// Overall validation score in [0, 10]
    pub overall_quality_score: f64,

    /// Completion marker of the last stage reached
    pub stage: String,
}

/// Everything a renderer needs to present a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisReport {
    /// Headline numbers
    pub metadata: ReportMetadata,

    /// Themes in clustering order
    pub themes: Vec<Theme>,

    /// One chapter per successfully synthesized theme
    pub synthesis: Vec<SynthesisChapter>,

    /// Stage 4 output
    pub validation: ValidationReport,

    /// Corpus statistics
    pub patterns: PatternReport,
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct PipelineRun {
    /// Time-ordered run identifier
    pub run_id: Uuid,

    /// The final report
    pub report: SynthesisReport,

    /// Documents and themes dropped along the way, in stage order
    pub failures: Vec<ItemFailure>,

    /// Counters and timings
    pub metrics: RunMetrics,
}

impl PipelineRun {
    /// Whether any item was dropped
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}
