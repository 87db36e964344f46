//! Stage module - the fixed sequence of pipeline stages

use serde::{Deserialize, Serialize};
use std::fmt;

/// A stage of the pipeline
///
/// Stages run strictly in this order:
/// - Deconstruction: per-document extraction
/// - PatternRecognition: frequency and co-occurrence mining
/// - Categorization: thematic clustering
/// - Synthesis: one chapter per theme
/// - Validation: scoring of the chapters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Stage 1
    Deconstruction,

    /// Cross-cutting pattern mining between stages 1 and 2
    PatternRecognition,

    /// Stage 2
    Categorization,

    /// Stage 3
    Synthesis,

    /// Stage 4
    Validation,
}

impl PipelineStage {
    /// All stages in execution order
    pub const ALL: [PipelineStage; 5] = [
        PipelineStage::Deconstruction,
        PipelineStage::PatternRecognition,
        PipelineStage::Categorization,
        PipelineStage::Synthesis,
        PipelineStage::Validation,
    ];

    /// Name used in checkpoint filenames and payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Deconstruction => "stage1_deconstruction",
            PipelineStage::PatternRecognition => "pattern_recognition",
            PipelineStage::Categorization => "stage2_categorization",
            PipelineStage::Synthesis => "stage3_synthesis",
            PipelineStage::Validation => "stage4_validation",
        }
    }

    /// Marker recorded once the stage has finished
    pub fn completed_marker(&self) -> &'static str {
        match self {
            PipelineStage::Deconstruction => "stage1_complete",
            PipelineStage::PatternRecognition => "pattern_recognition_complete",
            PipelineStage::Categorization => "stage2_complete",
            PipelineStage::Synthesis => "stage3_complete",
            PipelineStage::Validation => "stage4_complete",
        }
    }

    /// Parse a stage from its checkpoint name
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|stage| stage.as_str() == s)
    }

    /// The stage that runs after this one
    pub fn next(&self) -> Option<Self> {
        match self {
            PipelineStage::Deconstruction => Some(PipelineStage::PatternRecognition),
            PipelineStage::PatternRecognition => Some(PipelineStage::Categorization),
            PipelineStage::Categorization => Some(PipelineStage::Synthesis),
            PipelineStage::Synthesis => Some(PipelineStage::Validation),
            PipelineStage::Validation => None,
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PipelineStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid stage: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_progression() {
        assert_eq!(PipelineStage::Deconstruction.next(), Some(PipelineStage::PatternRecognition));
        assert_eq!(PipelineStage::PatternRecognition.next(), Some(PipelineStage::Categorization));
        assert_eq!(PipelineStage::Categorization.next(), Some(PipelineStage::Synthesis));
        assert_eq!(PipelineStage::Synthesis.next(), Some(PipelineStage::Validation));
        assert_eq!(PipelineStage::Validation.next(), None);
    }

    #[test]
    fn test_stage_names_round_trip() {
        for stage in PipelineStage::ALL {
            assert_eq!(stage.as_str().parse::<PipelineStage>().unwrap(), stage);
        }
        assert!("stage5_publish".parse::<PipelineStage>().is_err());
    }

    #[test]
    fn test_completed_markers() {
        assert_eq!(PipelineStage::Deconstruction.completed_marker(), "stage1_complete");
        assert_eq!(PipelineStage::Validation.completed_marker(), "stage4_complete");
    }
}
