//! Synthesis module - the narrative chapter written for each theme

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A principle shared by one or more member documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorePrinciple {
    /// Principle text
    pub principle: String,

    /// Supporting evidence, at most 5
    pub evidence: Vec<String>,

    /// Consequences of the principle
    pub implications: Vec<String>,

    /// Where the principle stops applying
    #[serde(default)]
    pub boundary_conditions: String,

    /// Share of member documents stating it, in [0, 1]
    pub confidence: f64,
}

/// Resolution state of a contradiction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStatus {
    /// Reconciled
    Resolved,
    /// Recorded but not reconciled
    Unresolved,
    /// Partly reconciled
    PartiallyResolved,
}

impl ResolutionStatus {
    /// Token used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionStatus::Resolved => "resolved",
            ResolutionStatus::Unresolved => "unresolved",
            ResolutionStatus::PartiallyResolved => "partially_resolved",
        }
    }

    /// Whether the contradiction has been looked at, whatever the outcome
    pub fn is_addressed(&self) -> bool {
        matches!(
            self,
            ResolutionStatus::Resolved
                | ResolutionStatus::Unresolved
                | ResolutionStatus::PartiallyResolved
        )
    }
}

impl fmt::Display for ResolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two positions within a theme that disagree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contradiction {
    /// Id derived from the contributing document
    pub contradiction_id: String,

    /// What the disagreement is about
    pub description: String,

    /// First position
    pub position_a: BTreeMap<String, String>,

    /// Second position
    pub position_b: BTreeMap<String, String>,

    /// Resolution state
    pub resolution_status: ResolutionStatus,

    /// Attempted reconciliation, if any
    pub attempted_resolution: Option<String>,
}

/// Rules aggregated across a theme's documents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChapterRules {
    /// Deduplicated imperatives, at most 5
    #[serde(rename = "do")]
    pub do_rules: Vec<String>,

    /// Deduplicated prohibitions, at most 5
    #[serde(rename = "dont")]
    pub dont_rules: Vec<String>,

    /// Conditional rules
    pub when_to: Vec<String>,
}

impl ChapterRules {
    /// True when either list has at least one rule
    pub fn has_any(&self) -> bool {
        !self.do_rules.is_empty() || !self.dont_rules.is_empty()
    }
}

/// Synthesis output for a single theme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisChapter {
    /// Theme this chapter was written for
    pub theme_id: String,

    /// Name of that theme
    pub theme_name: String,

    /// Templated overview sentence
    pub executive_summary: String,

    /// Top principles, at most 3
    pub core_principles: Vec<CorePrinciple>,

    /// Aggregated rules
    pub actionable_rules: ChapterRules,

    /// Contradictions, at most 3
    pub contradictions: Vec<Contradiction>,

    /// First evidence item of each member document, at most 5
    pub key_quotes: Vec<String>,

    /// At most 3
    pub second_order_implications: Vec<String>,

    /// Generic follow-up questions
    pub open_questions: Vec<String>,
}
