//! Theme module - document clusters produced by categorization

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A named cluster of documents sharing a primary tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    /// Stable id (`theme_000`, `theme_001`, ...)
    pub theme_id: String,

    /// Human-readable name
    pub name: String,

    /// One-line description
    pub description: String,

    /// Member documents; every id exists in the analyzed set
    pub document_ids: Vec<String>,

    /// Concepts the theme is built around
    pub key_concepts: Vec<String>,

    /// Importance in [0, 10]
    pub importance_score: f64,

    /// Set when a key concept is shared with another theme
    #[serde(default)]
    pub cross_cutting: bool,

    /// Themes sharing a key concept with this one
    #[serde(default)]
    pub related_theme_ids: Vec<String>,
}

/// A concept shared by more than one theme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossThemePattern {
    /// The shared concept
    pub concept: String,

    /// `"<concept> appears across N themes"`
    pub pattern: String,

    /// Themes containing the concept
    pub themes: Vec<String>,

    /// Why it was reported
    pub significance: String,
}

/// An analyzed document that no theme claimed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrphanDocument {
    /// Id of the unclaimed document
    pub doc_id: String,

    /// Why it is unclaimed
    pub reason: String,

    /// Suggested follow-up
    pub recommendation: String,
}

/// Themes plus everything that did not fit into them
///
/// Every analyzed document id appears exactly once, either in one theme's
/// `document_ids` or in `orphan_documents`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemeStructure {
    /// Themes in creation order
    pub themes: Vec<Theme>,

    /// Concepts shared across themes
    pub cross_theme_patterns: Vec<CrossThemePattern>,

    /// Unclaimed documents
    pub orphan_documents: Vec<OrphanDocument>,
}

impl ThemeStructure {
    /// Ids of all documents claimed by some theme
    pub fn assigned_document_ids(&self) -> HashSet<&str> {
        self.themes
            .iter()
            .flat_map(|theme| theme.document_ids.iter().map(String::as_str))
            .collect()
    }

    /// Check that `document_ids` are partitioned between themes and orphans
    ///
    /// Returns a description of the first violation found.
    pub fn check_partition<'a, I>(&self, document_ids: I) -> Result<(), String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let expected: Vec<&str> = document_ids.into_iter().collect();
        let mut seen: HashSet<&str> = HashSet::new();

        let claimed = self
            .themes
            .iter()
            .flat_map(|theme| theme.document_ids.iter().map(String::as_str))
            .chain(self.orphan_documents.iter().map(|orphan| orphan.doc_id.as_str()));

        for id in claimed {
            if !seen.insert(id) {
                return Err(format!("document '{}' appears more than once", id));
            }
        }

        for id in &expected {
            if !seen.contains(id) {
                return Err(format!("document '{}' is neither themed nor orphaned", id));
            }
        }

        if seen.len() != expected.len() {
            return Err(format!(
                "structure references {} documents but {} were analyzed",
                seen.len(),
                expected.len()
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn theme(id: &str, docs: &[&str]) -> Theme {
        Theme {
            theme_id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            document_ids: docs.iter().map(|d| d.to_string()).collect(),
            key_concepts: vec![],
            importance_score: 0.0,
            cross_cutting: false,
            related_theme_ids: vec![],
        }
    }

    fn orphan(id: &str) -> OrphanDocument {
        OrphanDocument {
            doc_id: id.to_string(),
            reason: String::new(),
            recommendation: String::new(),
        }
    }

    #[test]
    fn test_partition_ok() {
        let structure = ThemeStructure {
            themes: vec![theme("theme_000", &["a", "b"])],
            cross_theme_patterns: vec![],
            orphan_documents: vec![orphan("c")],
        };
        assert!(structure.check_partition(["a", "b", "c"]).is_ok());
        assert_eq!(structure.assigned_document_ids().len(), 2);
    }

    #[test]
    fn test_partition_detects_duplicate() {
        let structure = ThemeStructure {
            themes: vec![theme("theme_000", &["a", "b"])],
            cross_theme_patterns: vec![],
            orphan_documents: vec![orphan("a")],
        };
        assert!(structure.check_partition(["a", "b"]).is_err());
    }

    #[test]
    fn test_partition_detects_omission_and_unknown() {
        let structure = ThemeStructure {
            themes: vec![theme("theme_000", &["a", "b"])],
            cross_theme_patterns: vec![],
            orphan_documents: vec![],
        };
        assert!(structure.check_partition(["a", "b", "c"]).is_err());
        assert!(structure.check_partition(["a"]).is_err());
    }
}
