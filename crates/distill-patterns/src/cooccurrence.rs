//! Pairwise tag co-occurrence mining

use crate::counter::OrderedCounter;
use distill_domain::{AnalyzedDocument, CooccurrenceReport, StrongCooccurrence};
use tracing::info;

/// Pairs must appear together at least this often
pub const MIN_JOINT_COUNT: usize = 2;

/// Minimum `joint / min(total_a, total_b)`, inclusive
pub const MIN_RATE: f64 = 0.5;

/// Pairs kept in the report
pub const TOP_PAIRS: usize = 10;

/// Finds tags that tend to be applied to the same documents
#[derive(Debug, Clone, Copy, Default)]
pub struct CooccurrenceMiner;

impl CooccurrenceMiner {
    /// Create a new miner
    pub fn new() -> Self {
        Self
    }

    /// Mine co-occurrence statistics
    pub fn mine(&self, docs: &[AnalyzedDocument]) -> CooccurrenceReport {
        info!("Analyzing co-occurrence patterns across {} documents", docs.len());

        let mut totals: OrderedCounter<&str> = OrderedCounter::new();
        let mut pairs: OrderedCounter<(&str, &str)> = OrderedCounter::new();

        for doc in docs {
            let mut concepts: Vec<&str> = Vec::with_capacity(doc.tags.len());
            for tag in &doc.tags {
                if !concepts.contains(&tag.as_str()) {
                    concepts.push(tag);
                }
            }

            for concept in &concepts {
                totals.increment(*concept);
            }

            for (i, a) in concepts.iter().enumerate() {
                for b in &concepts[i + 1..] {
                    let key = if a <= b { (*a, *b) } else { (*b, *a) };
                    pairs.increment(key);
                }
            }
        }

        let mut strong: Vec<StrongCooccurrence> = pairs
            .iter()
            .filter(|(_, joint)| *joint >= MIN_JOINT_COUNT)
            .filter_map(|(&(a, b), joint)| {
                let total_a = totals.get(&a);
                let total_b = totals.get(&b);
                let rate = joint as f64 / total_a.min(total_b) as f64;
                (rate >= MIN_RATE).then(|| StrongCooccurrence {
                    concept_a: a.to_string(),
                    concept_b: b.to_string(),
                    cooccurrence_count: joint,
                    total_a_mentions: total_a,
                    total_b_mentions: total_b,
                    cooccurrence_rate: rate,
                    interpretation: interpret(a, total_a, b, total_b, rate),
                })
            })
            .collect();

        info!("Found {} strong co-occurrences", strong.len());

        // Stable: equal counts keep discovery order
        strong.sort_by(|x, y| y.cooccurrence_count.cmp(&x.cooccurrence_count));
        strong.truncate(TOP_PAIRS);

        CooccurrenceReport {
            strong_cooccurrences: strong,
            causal_chains: Vec::new(),
        }
    }
}

/// Describe the rate from the side of the less frequent concept
fn interpret(a: &str, total_a: usize, b: &str, total_b: usize, rate: f64) -> String {
    let (smaller, other) = if total_b < total_a { (b, a) } else { (a, b) };
    format!(
        "{:.0}% of '{}' mentions include '{}'",
        rate * 100.0,
        smaller,
        other
    )
}
