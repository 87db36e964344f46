//! Document module - raw inputs and their per-document extraction

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A raw input document
///
/// Documents are created once at ingestion and never mutated. Sourcing them
/// (files, databases, APIs) is the caller's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier within a run (e.g. `doc_000`)
    pub document_id: String,

    /// Name of the file or resource the document came from
    pub filename: String,

    /// Raw text
    pub content: String,

    /// Creation time, if known
    pub date_created: Option<DateTime<Utc>>,

    /// Free-form metadata
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Document {
    /// Create a document with no creation time or metadata
    ///
    /// # Examples
    ///
    /// ```
    /// use distill_domain::Document;
    ///
    /// let doc = Document::new("doc_001", "notes.md", "Always size positions small.");
    /// assert_eq!(doc.document_id, "doc_001");
    /// assert!(doc.metadata.is_empty());
    /// ```
    pub fn new(
        document_id: impl Into<String>,
        filename: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            filename: filename.into(),
            content: content.into(),
            date_created: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Attach a creation time
    pub fn with_date_created(mut self, date_created: DateTime<Utc>) -> Self {
        self.date_created = Some(date_created);
        self
    }

    /// Attach a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Imperative and prohibitive rules found in a document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionableRules {
    /// Imperatives ("always ...", "must ...")
    #[serde(rename = "do")]
    pub do_rules: Vec<String>,

    /// Prohibitions ("never ...", "avoid ...")
    #[serde(rename = "dont")]
    pub dont_rules: Vec<String>,

    /// Conditional rules; not produced by the heuristic scan
    #[serde(default)]
    pub when: Vec<String>,
}

impl ActionableRules {
    /// True when neither imperatives nor prohibitions were found
    pub fn is_empty(&self) -> bool {
        self.do_rules.is_empty() && self.dont_rules.is_empty()
    }
}

/// Circumstances that surrounded the writing of a document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggeringContext {
    /// One of `calm`, `restless`, `caffeinated`
    pub emotional_state: Option<String>,

    /// One of `bullish`, `bearish`
    pub market_condition: Option<String>,

    /// Specific event, when an upstream collaborator supplies one
    pub triggering_event: Option<String>,
}

/// Structured extraction produced for exactly one [`Document`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedDocument {
    /// Id of the source document
    pub document_id: String,

    /// Filename of the source document
    pub filename: String,

    /// Source text; kept in memory but left out of checkpoints
    #[serde(skip)]
    pub original_content: String,

    /// Creation time of the source document
    pub date_created: Option<DateTime<Utc>>,

    /// Single-sentence claim that best summarizes the document
    pub core_principle: String,

    /// Imperatives and prohibitions
    pub actionable_rules: ActionableRules,

    /// Emotional / market context
    pub triggering_context: TriggeringContext,

    /// Short evidence strings, at most 10
    pub evidence: Vec<String>,

    /// Contradictions noted by an upstream collaborator
    #[serde(default)]
    pub contradictions: Vec<String>,

    /// Taxonomy labels in taxonomy declaration order
    pub tags: Vec<String>,

    /// Heuristic quality in [0, 5]
    pub quality_score: f64,

    /// Confidence reported by the principle strategy, in [0, 1]
    pub confidence: f64,

    /// Reasoning reported by the principle strategy
    pub reasoning: String,
}

impl AnalyzedDocument {
    /// Primary tag used for clustering, if any
    pub fn primary_tag(&self) -> Option<&str> {
        self.tags.first().map(String::as_str)
    }
}
