//! Concept frequency mining

use crate::counter::OrderedCounter;
use distill_domain::{AnalyzedDocument, ConceptFrequency, FrequencyDistribution, FrequencyReport};
use tracing::info;

/// Only the top concepts by count are considered for the ranked list
pub const TOP_CONCEPTS: usize = 20;

/// Floor of the significance threshold
pub const MIN_SIGNIFICANT_COUNT: f64 = 3.0;

/// Share of the corpus a concept must reach to be significant
pub const SIGNIFICANT_SHARE: f64 = 0.1;

/// Principle words must be longer than this to count as concepts
const MIN_WORD_CHARS: usize = 4;

/// Counts how often each concept appears across the corpus
#[derive(Debug, Clone, Copy, Default)]
pub struct FrequencyMiner;

impl FrequencyMiner {
    /// Create a new miner
    pub fn new() -> Self {
        Self
    }

    /// Concepts contributed by one document: its tags, then long principle words
    ///
    /// Words are split on whitespace and lower-cased; punctuation is kept and
    /// repeats are not collapsed.
    pub fn concepts(doc: &AnalyzedDocument) -> Vec<String> {
        let words = doc
            .core_principle
            .to_lowercase()
            .split_whitespace()
            .filter(|word| word.chars().count() > MIN_WORD_CHARS)
            .map(str::to_string)
            .collect::<Vec<_>>();

        doc.tags.iter().cloned().chain(words).collect()
    }

    /// Minimum count for a concept to be significant in a corpus of `doc_count`
    pub fn significance_threshold(doc_count: usize) -> f64 {
        f64::max(MIN_SIGNIFICANT_COUNT, doc_count as f64 * SIGNIFICANT_SHARE)
    }

    /// Mine frequency statistics
    pub fn mine(&self, docs: &[AnalyzedDocument]) -> FrequencyReport {
        info!("Analyzing frequency patterns across {} documents", docs.len());

        let mut counter = OrderedCounter::new();
        let mut supporting: Vec<Vec<String>> = Vec::new();

        for doc in docs {
            for concept in Self::concepts(doc) {
                let pos = counter.increment(concept);
                if pos == supporting.len() {
                    supporting.push(Vec::new());
                }
                let ids = &mut supporting[pos];
                if !ids.contains(&doc.document_id) {
                    ids.push(doc.document_id.clone());
                }
            }
        }

        let threshold = Self::significance_threshold(docs.len());

        let high_frequency_concepts: Vec<ConceptFrequency> = counter
            .most_common(TOP_CONCEPTS)
            .into_iter()
            .filter(|(_, count)| *count as f64 >= threshold)
            .map(|(concept, count)| ConceptFrequency {
                concept: concept.clone(),
                count,
                documents: counter
                    .position(concept)
                    .and_then(|pos| supporting.get(pos))
                    .cloned()
                    .unwrap_or_default(),
                significance: format!(
                    "Appears in {} documents ({:.1}%)",
                    count,
                    count as f64 / docs.len() as f64 * 100.0
                ),
            })
            .collect();

        let mut frequency_distribution = FrequencyDistribution::default();
        for (concept, count) in counter.iter() {
            frequency_distribution.insert(concept.clone(), count);
        }

        info!("Found {} high-frequency concepts", high_frequency_concepts.len());

        FrequencyReport {
            high_frequency_concepts,
            frequency_distribution,
        }
    }
}
