//! Pattern module - corpus-wide concept statistics

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A concept that crossed the significance threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptFrequency {
    /// Tag or keyword
    pub concept: String,

    /// Occurrences across the corpus
    pub count: usize,

    /// Documents that contributed at least one occurrence
    pub documents: Vec<String>,

    /// `"Appears in N documents (P%)"`
    pub significance: String,
}

/// All concepts bucketed by occurrence count
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrequencyDistribution {
    /// Concepts with 1 to 5 occurrences
    #[serde(rename = "1-5 mentions")]
    pub one_to_five: Vec<String>,

    /// Concepts with 6 to 10 occurrences
    #[serde(rename = "6-10 mentions")]
    pub six_to_ten: Vec<String>,

    /// Concepts with 11 to 20 occurrences
    #[serde(rename = "11-20 mentions")]
    pub eleven_to_twenty: Vec<String>,

    /// Concepts with more than 20 occurrences
    #[serde(rename = "20+ mentions")]
    pub over_twenty: Vec<String>,
}

impl FrequencyDistribution {
    /// Place a concept in the bucket for its count
    pub fn insert(&mut self, concept: impl Into<String>, count: usize) {
        let bucket = match count {
            0..=5 => &mut self.one_to_five,
            6..=10 => &mut self.six_to_ten,
            11..=20 => &mut self.eleven_to_twenty,
            _ => &mut self.over_twenty,
        };
        bucket.push(concept.into());
    }

    /// Number of concepts across all buckets
    pub fn total(&self) -> usize {
        self.one_to_five.len()
            + self.six_to_ten.len()
            + self.eleven_to_twenty.len()
            + self.over_twenty.len()
    }
}

/// Output of the frequency miner
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrequencyReport {
    /// Ranked significant concepts
    pub high_frequency_concepts: Vec<ConceptFrequency>,

    /// Bucketed view of every concept
    pub frequency_distribution: FrequencyDistribution,
}

/// A pair of concepts that frequently appear together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrongCooccurrence {
    /// Lexicographically smaller concept of the pair
    pub concept_a: String,

    /// Lexicographically larger concept of the pair
    pub concept_b: String,

    /// Documents containing both
    pub cooccurrence_count: usize,

    /// Documents containing `concept_a`
    pub total_a_mentions: usize,

    /// Documents containing `concept_b`
    pub total_b_mentions: usize,

    /// `cooccurrence_count / min(total_a, total_b)`
    pub cooccurrence_rate: f64,

    /// Readable summary of the rate
    pub interpretation: String,
}

/// Output of the co-occurrence miner
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CooccurrenceReport {
    /// Top pairs by joint count, at most 10
    pub strong_cooccurrences: Vec<StrongCooccurrence>,

    /// Reserved; always empty
    pub causal_chains: Vec<String>,
}

/// Everything the pattern-recognition stage produces
///
/// `temporal`, `contradictions`, `emotional` and `negative_space` are reserved
/// sections that no miner fills yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternReport {
    /// Frequency statistics
    pub frequency: FrequencyReport,

    /// Co-occurrence statistics
    pub cooccurrence: CooccurrenceReport,

    /// Reserved
    #[serde(default)]
    pub temporal: BTreeMap<String, String>,

    /// Reserved
    #[serde(default)]
    pub contradictions: Vec<String>,

    /// Reserved
    #[serde(default)]
    pub emotional: BTreeMap<String, String>,

    /// Reserved
    #[serde(default)]
    pub negative_space: BTreeMap<String, String>,
}

impl PatternReport {
    /// Combine the two miner outputs
    pub fn new(frequency: FrequencyReport, cooccurrence: CooccurrenceReport) -> Self {
        Self {
            frequency,
            cooccurrence,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distribution_buckets() {
        let mut dist = FrequencyDistribution::default();
        dist.insert("a", 1);
        dist.insert("b", 5);
        dist.insert("c", 6);
        dist.insert("d", 10);
        dist.insert("e", 11);
        dist.insert("f", 20);
        dist.insert("g", 21);

        assert_eq!(dist.one_to_five, vec!["a", "b"]);
        assert_eq!(dist.six_to_ten, vec!["c", "d"]);
        assert_eq!(dist.eleven_to_twenty, vec!["e", "f"]);
        assert_eq!(dist.over_twenty, vec!["g"]);
        assert_eq!(dist.total(), 7);
    }

    #[test]
    fn test_distribution_serializes_range_keys() {
        let mut dist = FrequencyDistribution::default();
        dist.insert("psychology", 3);
        let json = serde_json::to_value(&dist).unwrap();
        assert_eq!(json["1-5 mentions"][0], "psychology");
        assert!(json["20+ mentions"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_causal_chains_present_but_empty() {
        let report = PatternReport::default();
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["cooccurrence"]["causal_chains"].as_array().unwrap().is_empty());
    }
}
