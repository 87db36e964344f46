//! Validation module - quality scoring of synthesized chapters

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Outcome token of a single validation check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// Check passed
    Pass,
    /// Check passed but surfaced warnings
    PassWithWarnings,
    /// Check did not pass
    Warning,
}

impl CheckStatus {
    /// Token used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Pass => "pass",
            CheckStatus::PassWithWarnings => "pass_with_warnings",
            CheckStatus::Warning => "warning",
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a red flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Advisory
    Low,
    /// Worth reviewing
    Medium,
    /// Must be fixed
    High,
}

impl Severity {
    /// Token used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fractions measured by the internal check, each in [0, 1]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InternalChecks {
    /// Chapters whose summary is long enough
    pub has_executive_summary: f64,
    /// Chapters with at least one principle
    pub has_principles: f64,
    /// Chapters with at least one rule
    pub has_actionable_rules: f64,
    /// Principles (not chapters) that carry evidence
    pub principles_have_evidence: f64,
}

impl InternalChecks {
    /// Mean of the four fractions
    pub fn mean(&self) -> f64 {
        (self.has_executive_summary
            + self.has_principles
            + self.has_actionable_rules
            + self.principles_have_evidence)
            / 4.0
    }
}

/// Structural completeness of the chapters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternalValidation {
    /// Pass when enough chapters carry principles
    pub status: CheckStatus,
    /// Sub-score in [0, 10]
    pub score: f64,
    /// Raw fractions
    pub checks: InternalChecks,
}

/// Whether every contradiction carries a resolution status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContradictionValidation {
    /// Contradictions across all chapters
    pub contradictions_identified: usize,
    /// Of those, how many were addressed
    pub contradictions_addressed: usize,
    /// Pass when all are addressed
    pub status: CheckStatus,
    /// Sub-score in [0, 10]
    pub score: f64,
}

/// A principle with too little supporting evidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceWarning {
    /// Chapter (theme name) containing the principle
    pub chapter: String,
    /// What is wrong
    pub issue: String,
    /// First 50 characters of the principle
    pub principle: String,
}

/// Evidence coverage of the principles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceValidation {
    /// Pass, or pass with warnings
    pub status: CheckStatus,
    /// Surfaced warnings (capped)
    pub warnings: Vec<EvidenceWarning>,
    /// Sub-score in [0, 10]
    pub score: f64,
}

/// Average per-chapter completeness
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoherenceValidation {
    /// Pass when average completeness is high enough
    pub status: CheckStatus,
    /// Average completeness in [0, 1]
    pub internal_consistency: f64,
    /// Reserved; always 0
    pub logical_contradictions: usize,
    /// Sub-score in [0, 10]
    pub score: f64,
}

/// Advisory about a chapter's structural quality
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedFlag {
    /// What was observed
    pub flag: String,
    /// How serious it is
    pub severity: Severity,
    /// What to do about it
    pub recommendation: String,
}

/// The validation stage's output for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Mean of the computed sub-scores, in [0, 10]
    pub overall_quality_score: f64,

    /// Structural completeness
    pub internal_validation: InternalValidation,

    /// Contradiction handling
    pub contradiction_validation: ContradictionValidation,

    /// Reserved; always empty
    #[serde(default)]
    pub evolution_validation: BTreeMap<String, String>,

    /// Evidence coverage
    pub evidence_validation: EvidenceValidation,

    /// Coherence
    pub coherence_validation: CoherenceValidation,

    /// Chapter advisories
    pub red_flags: Vec<RedFlag>,

    /// Corrections that must be applied before publishing
    #[serde(default)]
    pub corrections_required: Vec<String>,
}

impl ValidationReport {
    /// The four sub-scores in a fixed order: internal, contradiction, evidence, coherence
    pub fn sub_scores(&self) -> [f64; 4] {
        [
            self.internal_validation.score,
            self.contradiction_validation.score,
            self.evidence_validation.score,
            self.coherence_validation.score,
        ]
    }

    /// Red flags at or above `severity`
    pub fn flags_at_least(&self, severity: Severity) -> impl Iterator<Item = &RedFlag> {
        self.red_flags.iter().filter(move |flag| flag.severity >= severity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_checks_mean() {
        let checks = InternalChecks {
            has_executive_summary: 1.0,
            has_principles: 1.0,
            has_actionable_rules: 0.5,
            principles_have_evidence: 0.5,
        };
        assert!((checks.mean() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
    }

    #[test]
    fn test_status_tokens() {
        assert_eq!(serde_json::to_value(CheckStatus::Pass).unwrap(), "pass");
        assert_eq!(
            serde_json::to_value(CheckStatus::PassWithWarnings).unwrap(),
            "pass_with_warnings"
        );
        assert_eq!(serde_json::to_value(CheckStatus::Warning).unwrap(), "warning");
        assert_eq!(CheckStatus::PassWithWarnings.to_string(), "pass_with_warnings");
        assert_eq!(Severity::High.to_string(), "high");
    }
}
