//! Validator configuration

use serde::{Deserialize, Serialize};

/// Thresholds and sub-scores for chapter validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Summaries must be longer than this (characters) to count
    pub min_summary_chars: usize,

    /// Internal check passes when the share of chapters with principles exceeds this
    pub principles_pass_ratio: f64,

    /// Coherence passes when the average completeness exceeds this
    pub coherence_pass_ratio: f64,

    /// Principles with fewer evidence items are flagged
    pub min_evidence_per_principle: usize,

    /// Evidence warnings surfaced in the report
    pub max_evidence_warnings: usize,

    /// Contradiction sub-score when every contradiction is addressed
    pub contradiction_pass_score: f64,

    /// Contradiction sub-score otherwise
    pub contradiction_warning_score: f64,

    /// Evidence sub-score with no warnings
    pub evidence_pass_score: f64,

    /// Evidence sub-score with warnings
    pub evidence_warning_score: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_summary_chars: 50,
            principles_pass_ratio: 0.8,
            coherence_pass_ratio: 0.7,
            min_evidence_per_principle: 2,
            max_evidence_warnings: 5,
            contradiction_pass_score: 10.0,
            contradiction_warning_score: 7.0,
            evidence_pass_score: 10.0,
            evidence_warning_score: 8.0,
        }
    }
}

impl ValidationConfig {
    /// Create a permissive configuration (single evidence item suffices)
    pub fn permissive() -> Self {
        Self {
            min_summary_chars: 20,
            principles_pass_ratio: 0.5,
            coherence_pass_ratio: 0.5,
            min_evidence_per_principle: 1,
            ..Self::default()
        }
    }

    /// Create a strict configuration (more evidence, more warnings surfaced)
    pub fn strict() -> Self {
        Self {
            min_summary_chars: 100,
            principles_pass_ratio: 0.95,
            coherence_pass_ratio: 0.9,
            min_evidence_per_principle: 3,
            max_evidence_warnings: 20,
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        for (name, ratio) in [
            ("principles_pass_ratio", self.principles_pass_ratio),
            ("coherence_pass_ratio", self.coherence_pass_ratio),
        ] {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(format!("{} must be between 0.0 and 1.0, got {}", name, ratio));
            }
        }

        for (name, score) in [
            ("contradiction_pass_score", self.contradiction_pass_score),
            ("contradiction_warning_score", self.contradiction_warning_score),
            ("evidence_pass_score", self.evidence_pass_score),
            ("evidence_warning_score", self.evidence_warning_score),
        ] {
            if !(0.0..=10.0).contains(&score) {
                return Err(format!("{} must be between 0 and 10, got {}", name, score));
            }
        }

        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
