//! Per-theme chapter synthesis

use crate::error::SynthesizerError;
use distill_domain::{
    AnalyzedDocument, ChapterRules, Contradiction, CorePrinciple, ItemFailure, ItemResult,
    PatternReport, PipelineStage, ResolutionStatus, SynthesisChapter, Theme,
};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info, warn};

const MIN_PRINCIPLE_CHARS: usize = 20;
const MAX_PRINCIPLE_CHARS: usize = 200;
const MAX_PRINCIPLES: usize = 3;
const EVIDENCE_PER_DOCUMENT: usize = 2;
const EVIDENCE_PER_PRINCIPLE: usize = 5;
const RULES_PER_DOCUMENT: usize = 2;
const MAX_RULES: usize = 5;
const CONTRADICTIONS_PER_DOCUMENT: usize = 2;
const MAX_CONTRADICTIONS: usize = 3;
const MAX_QUOTES: usize = 5;
const MAX_IMPLICATIONS: usize = 3;

/// Emitted when no principle yields an implication
pub const FALLBACK_IMPLICATION: &str = "Further analysis needed to identify implications";

/// Fixed follow-up questions attached to every chapter
pub const OPEN_QUESTIONS: [&str; 3] = [
    "How can these insights be operationalized?",
    "What additional evidence is needed?",
    "Are there boundary conditions that need exploration?",
];

/// Writes one chapter per theme from its member documents
#[derive(Debug, Clone, Copy, Default)]
pub struct Synthesizer;

impl Synthesizer {
    /// Create a new synthesizer
    pub fn new() -> Self {
        Self
    }

    /// Synthesize one theme as an item of a batch
    ///
    /// A failure is logged against the theme id and returned as an
    /// [`ItemFailure`]; other themes are unaffected.
    pub fn synthesize_item(
        &self,
        theme: &Theme,
        docs: &[AnalyzedDocument],
        patterns: &PatternReport,
    ) -> ItemResult<SynthesisChapter> {
        self.synthesize(theme, docs, patterns).map_err(|e| {
            warn!("Failed to synthesize theme {}: {}", theme.theme_id, e);
            ItemFailure::new(&theme.theme_id, PipelineStage::Synthesis, e.to_string())
        })
    }

    /// Synthesize a single theme
    pub fn synthesize(
        &self,
        theme: &Theme,
        docs: &[AnalyzedDocument],
        _patterns: &PatternReport,
    ) -> Result<SynthesisChapter, SynthesizerError> {
        let members = member_documents(theme, docs)?;

        let core_principles = extract_principles(&members);
        let second_order_implications = implications(&core_principles);

        let chapter = SynthesisChapter {
            theme_id: theme.theme_id.clone(),
            theme_name: theme.name.clone(),
            executive_summary: executive_summary(theme, members.len()),
            actionable_rules: aggregate_rules(&members),
            contradictions: collect_contradictions(&members),
            key_quotes: key_quotes(&members),
            core_principles,
            second_order_implications,
            open_questions: OPEN_QUESTIONS.iter().map(|q| q.to_string()).collect(),
        };

        info!("Synthesized chapter for theme: {}", theme.name);
        Ok(chapter)
    }
}

/// Member documents in analyzed order
fn member_documents<'a>(
    theme: &Theme,
    docs: &'a [AnalyzedDocument],
) -> Result<Vec<&'a AnalyzedDocument>, SynthesizerError> {
    if theme.document_ids.is_empty() {
        return Err(SynthesizerError::EmptyTheme(theme.theme_id.clone()));
    }

    let wanted: HashSet<&str> = theme.document_ids.iter().map(String::as_str).collect();
    let members: Vec<&AnalyzedDocument> = docs
        .iter()
        .filter(|doc| wanted.contains(doc.document_id.as_str()))
        .collect();

    let found: HashSet<&str> = members.iter().map(|doc| doc.document_id.as_str()).collect();
    let missing: Vec<String> = theme
        .document_ids
        .iter()
        .filter(|id| !found.contains(id.as_str()))
        .cloned()
        .collect();

    if !missing.is_empty() {
        return Err(SynthesizerError::UnknownDocuments {
            theme_id: theme.theme_id.clone(),
            missing,
        });
    }

    debug!("Theme {} has {} member documents", theme.theme_id, members.len());
    Ok(members)
}

fn executive_summary(theme: &Theme, doc_count: usize) -> String {
    let concepts: Vec<&str> = theme.key_concepts.iter().take(3).map(String::as_str).collect();
    format!(
        "{} encompasses {} documents examining {}. This theme explores key insights and patterns related to these concepts.",
        theme.name,
        doc_count,
        concepts.join(", ")
    )
}

struct PrincipleGroup {
    text: String,
    count: usize,
    evidence: Vec<String>,
}

/// Group identical principles, rank by support, keep the top three
fn extract_principles(members: &[&AnalyzedDocument]) -> Vec<CorePrinciple> {
    let mut groups: Vec<PrincipleGroup> = Vec::new();

    for doc in members {
        if doc.core_principle.chars().count() <= MIN_PRINCIPLE_CHARS {
            continue;
        }
        let text: String = doc.core_principle.chars().take(MAX_PRINCIPLE_CHARS).collect();
        let evidence = doc.evidence.iter().take(EVIDENCE_PER_DOCUMENT).cloned();

        match groups.iter_mut().find(|group| group.text == text) {
            Some(group) => {
                group.count += 1;
                group.evidence.extend(evidence);
            }
            None => groups.push(PrincipleGroup {
                text,
                count: 1,
                evidence: evidence.collect(),
            }),
        }
    }

    // sort_by is stable, so equal support keeps first-seen order
    groups.sort_by(|a, b| b.count.cmp(&a.count));

    let member_count = members.len().max(1) as f64;
    groups
        .into_iter()
        .take(MAX_PRINCIPLES)
        .map(|group| CorePrinciple {
            implications: vec![format!("Based on {} documents", group.count)],
            confidence: f64::min(group.count as f64 / member_count, 1.0),
            principle: group.text,
            evidence: group.evidence.into_iter().take(EVIDENCE_PER_PRINCIPLE).collect(),
            boundary_conditions: String::new(),
        })
        .collect()
}

fn dedup_capped(items: Vec<String>, cap: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .take(cap)
        .collect()
}

/// First two rules of each kind per document, deduplicated, five per kind
fn aggregate_rules(members: &[&AnalyzedDocument]) -> ChapterRules {
    ChapterRules {
        do_rules: leading_rules(members, |doc| &doc.actionable_rules.do_rules),
        dont_rules: leading_rules(members, |doc| &doc.actionable_rules.dont_rules),
        when_to: Vec::new(),
    }
}

fn leading_rules<'a, F>(members: &[&'a AnalyzedDocument], pick: F) -> Vec<String>
where
    F: Fn(&'a AnalyzedDocument) -> &'a Vec<String>,
{
    let rules: Vec<String> = members
        .iter()
        .flat_map(|doc| pick(*doc).iter().take(RULES_PER_DOCUMENT).cloned())
        .collect();
    dedup_capped(rules, MAX_RULES)
}

/// Contradictions carried in by the member documents
fn collect_contradictions(members: &[&AnalyzedDocument]) -> Vec<Contradiction> {
    members
        .iter()
        .flat_map(|doc| {
            doc.contradictions
                .iter()
                .take(CONTRADICTIONS_PER_DOCUMENT)
                .enumerate()
                .map(move |(i, description)| Contradiction {
                    contradiction_id: format!("contra_{}_{}", doc.document_id, i),
                    description: description.clone(),
                    position_a: BTreeMap::from([("source".to_string(), doc.document_id.clone())]),
                    position_b: BTreeMap::from([(
                        "source".to_string(),
                        "other documents".to_string(),
                    )]),
                    resolution_status: ResolutionStatus::Unresolved,
                    attempted_resolution: None,
                })
        })
        .take(MAX_CONTRADICTIONS)
        .collect()
}

fn key_quotes(members: &[&AnalyzedDocument]) -> Vec<String> {
    members
        .iter()
        .filter_map(|doc| doc.evidence.first().cloned())
        .take(MAX_QUOTES)
        .collect()
}

fn implications(principles: &[CorePrinciple]) -> Vec<String> {
    let mut implications: Vec<String> = principles
        .iter()
        .filter_map(|p| p.implications.first().cloned())
        .take(MAX_IMPLICATIONS)
        .collect();

    if implications.is_empty() {
        implications.push(FALLBACK_IMPLICATION.to_string());
    }
    implications
}

#[cfg(test)]
mod tests {
    use super::*;
    use distill_domain::{ActionableRules, TriggeringContext};

    fn doc(id: &str, principle: &str, evidence: &[&str]) -> AnalyzedDocument {
        AnalyzedDocument {
            document_id: id.to_string(),
            filename: format!("{}.md", id),
            original_content: String::new(),
            date_created: None,
            core_principle: principle.to_string(),
            actionable_rules: ActionableRules::default(),
            triggering_context: TriggeringContext::default(),
            evidence: evidence.iter().map(|e| e.to_string()).collect(),
            contradictions: Vec::new(),
            tags: vec!["psychology".to_string()],
            quality_score: 3.0,
            confidence: 0.5,
            reasoning: String::new(),
        }
    }

    fn theme(ids: &[&str]) -> Theme {
        Theme {
            theme_id: "theme_000".to_string(),
            name: "Investment Psychology & Mental States".to_string(),
            description: String::new(),
            document_ids: ids.iter().map(|d| d.to_string()).collect(),
            key_concepts: vec!["psychology".to_string()],
            importance_score: 5.0,
            cross_cutting: false,
            related_theme_ids: vec![],
        }
    }

    const SHARED: &str = "Emotional state drives every trading decision";

    #[test]
    fn test_executive_summary_template() {
        let docs = vec![doc("a", SHARED, &[]), doc("b", SHARED, &[])];
        let chapter = Synthesizer::new()
            .synthesize(&theme(&["a", "b"]), &docs, &PatternReport::default())
            .unwrap();
        assert_eq!(
            chapter.executive_summary,
            "Investment Psychology & Mental States encompasses 2 documents examining psychology. \
             This theme explores key insights and patterns related to these concepts."
        );
        assert_eq!(chapter.open_questions, OPEN_QUESTIONS);
    }

    #[test]
    fn test_principles_grouped_and_ranked() {
        let docs = vec![
            doc("a", "Size positions to your sleep, not your spreadsheet", &["e1", "e2", "e3"]),
            doc("b", SHARED, &["Metric: 85%", "Metric: 6"]),
            doc("c", SHARED, &["Metric: 7"]),
            doc("d", "too short", &["ignored"]),
        ];
        let chapter = Synthesizer::new()
            .synthesize(&theme(&["a", "b", "c", "d"]), &docs, &PatternReport::default())
            .unwrap();

        assert_eq!(chapter.core_principles.len(), 2);
        let top = &chapter.core_principles[0];
        assert_eq!(top.principle, SHARED);
        assert_eq!(top.evidence, vec!["Metric: 85%", "Metric: 6", "Metric: 7"]);
        assert_eq!(top.implications, vec!["Based on 2 documents"]);
        assert!((top.confidence - 0.5).abs() < 1e-9);

        let second = &chapter.core_principles[1];
        assert_eq!(second.evidence, vec!["e1", "e2"]);
        assert!((second.confidence - 0.25).abs() < 1e-9);

        assert_eq!(
            chapter.second_order_implications,
            vec!["Based on 2 documents", "Based on 1 documents"]
        );
        assert_eq!(chapter.key_quotes, vec!["e1", "Metric: 85%", "Metric: 7", "ignored"]);
    }

    #[test]
    fn test_no_principles_falls_back_to_placeholder_implication() {
        let docs = vec![doc("a", "short", &[]), doc("b", "", &[])];
        let chapter = Synthesizer::new()
            .synthesize(&theme(&["a", "b"]), &docs, &PatternReport::default())
            .unwrap();
        assert!(chapter.core_principles.is_empty());
        assert_eq!(chapter.second_order_implications, vec![FALLBACK_IMPLICATION]);
    }

    #[test]
    fn test_rules_deduplicated_and_capped() {
        let mut docs: Vec<_> = (0..4).map(|i| doc(&format!("d{}", i), SHARED, &[])).collect();
        for (i, d) in docs.iter_mut().enumerate() {
            d.actionable_rules.do_rules = vec![
                "- always journal".to_string(),
                format!("- always rule {}", i),
                "- always dropped third".to_string(),
            ];
            d.actionable_rules.dont_rules = vec![format!("- never {}", i % 2)];
        }
        let ids: Vec<String> = docs.iter().map(|d| d.document_id.clone()).collect();
        let ids: Vec<&str> = ids.iter().map(String::as_str).collect();

        let chapter = Synthesizer::new()
            .synthesize(&theme(&ids), &docs, &PatternReport::default())
            .unwrap();
        let rules = &chapter.actionable_rules;
        assert_eq!(
            rules.do_rules,
            vec![
                "- always journal",
                "- always rule 0",
                "- always rule 1",
                "- always rule 2",
                "- always rule 3",
            ]
        );
        assert_eq!(rules.dont_rules, vec!["- never 0", "- never 1"]);
        assert!(rules.when_to.is_empty());
    }

    #[test]
    fn test_contradictions_capped_and_unresolved() {
        let mut a = doc("a", SHARED, &[]);
        a.contradictions = vec!["x".into(), "y".into(), "z".into()];
        let mut b = doc("b", SHARED, &[]);
        b.contradictions = vec!["w".into(), "v".into()];

        let chapter = Synthesizer::new()
            .synthesize(&theme(&["a", "b"]), &[a, b], &PatternReport::default())
            .unwrap();

        let ids: Vec<_> = chapter
            .contradictions
            .iter()
            .map(|c| c.contradiction_id.as_str())
            .collect();
        assert_eq!(ids, vec!["contra_a_0", "contra_a_1", "contra_b_0"]);
        assert!(chapter
            .contradictions
            .iter()
            .all(|c| c.resolution_status == ResolutionStatus::Unresolved));
        assert_eq!(chapter.contradictions[2].position_a["source"], "b");
        assert_eq!(chapter.contradictions[2].position_b["source"], "other documents");
    }

    #[test]
    fn test_unknown_member_is_an_error() {
        let docs = vec![doc("a", SHARED, &[])];
        let err = Synthesizer::new()
            .synthesize(&theme(&["a", "ghost"]), &docs, &PatternReport::default())
            .unwrap_err();
        assert_eq!(
            err,
            SynthesizerError::UnknownDocuments {
                theme_id: "theme_000".to_string(),
                missing: vec!["ghost".to_string()],
            }
        );
    }

    #[test]
    fn test_synthesize_item_attributes_failure() {
        let docs = vec![doc("a", SHARED, &[]), doc("b", SHARED, &[])];
        let mut empty = theme(&[]);
        empty.theme_id = "theme_001".to_string();
        let synthesizer = Synthesizer::new();

        let failure = synthesizer
            .synthesize_item(&empty, &docs, &PatternReport::default())
            .unwrap_err();
        assert_eq!(failure.item_id, "theme_001");
        assert_eq!(failure.stage, PipelineStage::Synthesis);

        let chapter = synthesizer
            .synthesize_item(&theme(&["a", "b"]), &docs, &PatternReport::default())
            .unwrap();
        assert_eq!(chapter.theme_id, "theme_000");
    }
}
