//! Chapter quality validation

use crate::ValidationConfig;
use distill_domain::{
    AnalyzedDocument, CheckStatus, CoherenceValidation, ContradictionValidation,
    EvidenceValidation, EvidenceWarning, InternalChecks, InternalValidation, PatternReport,
    RedFlag, Severity, SynthesisChapter, ValidationReport,
};
use std::collections::BTreeMap;
use tracing::{debug, info};

const PRINCIPLE_PREVIEW_CHARS: usize = 50;

/// Scores synthesized chapters for structural quality
///
/// Validation never fails: missing content lowers sub-scores and raises red
/// flags instead.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new Validator with the given configuration
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Get the active configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate a run's chapters
    pub fn validate(
        &self,
        chapters: &[SynthesisChapter],
        docs: &[AnalyzedDocument],
        _patterns: &PatternReport,
    ) -> ValidationReport {
        info!("Validating {} synthesis chapters", chapters.len());
        debug!("Validating against {} analyzed documents", docs.len());

        let internal_validation = self.check_internal(chapters);
        let contradiction_validation = self.check_contradictions(chapters);
        let evidence_validation = self.check_evidence(chapters);
        let coherence_validation = self.check_coherence(chapters);

        let mut report = ValidationReport {
            overall_quality_score: 0.0,
            internal_validation,
            contradiction_validation,
            evolution_validation: BTreeMap::new(),
            evidence_validation,
            coherence_validation,
            red_flags: red_flags(chapters),
            corrections_required: Vec::new(),
        };

        let scores = report.sub_scores();
        report.overall_quality_score = scores.iter().sum::<f64>() / scores.len().max(1) as f64;

        info!(
            "Validation complete. Overall quality: {:.2}/10",
            report.overall_quality_score
        );
        report
    }

    fn check_internal(&self, chapters: &[SynthesisChapter]) -> InternalValidation {
        let chapter_count = chapters.len().max(1) as f64;
        let share = |pred: &dyn Fn(&SynthesisChapter) -> bool| {
            chapters.iter().filter(|c| pred(c)).count() as f64 / chapter_count
        };

        let principle_count: usize = chapters.iter().map(|c| c.core_principles.len()).sum();
        let with_evidence = chapters
            .iter()
            .flat_map(|c| &c.core_principles)
            .filter(|p| !p.evidence.is_empty())
            .count();

        let checks = InternalChecks {
            has_executive_summary: share(&|c| {
                c.executive_summary.chars().count() > self.config.min_summary_chars
            }),
            has_principles: share(&|c| !c.core_principles.is_empty()),
            has_actionable_rules: share(&has_rules),
            principles_have_evidence: with_evidence as f64 / principle_count.max(1) as f64,
        };

        let status = if checks.has_principles > self.config.principles_pass_ratio {
            CheckStatus::Pass
        } else {
            CheckStatus::Warning
        };

        InternalValidation {
            status,
            score: checks.mean() * 10.0,
            checks,
        }
    }

    fn check_contradictions(&self, chapters: &[SynthesisChapter]) -> ContradictionValidation {
        let all = chapters.iter().flat_map(|c| &c.contradictions);
        let identified = all.clone().count();
        let addressed = all.filter(|c| c.resolution_status.is_addressed()).count();

        let (status, score) = if addressed == identified {
            (CheckStatus::Pass, self.config.contradiction_pass_score)
        } else {
            (CheckStatus::Warning, self.config.contradiction_warning_score)
        };

        ContradictionValidation {
            contradictions_identified: identified,
            contradictions_addressed: addressed,
            status,
            score,
        }
    }

    fn check_evidence(&self, chapters: &[SynthesisChapter]) -> EvidenceValidation {
        let min_evidence = self.config.min_evidence_per_principle;
        let warnings: Vec<EvidenceWarning> = chapters
            .iter()
            .flat_map(|chapter| {
                chapter
                    .core_principles
                    .iter()
                    .filter(move |p| p.evidence.len() < min_evidence)
                    .map(move |p| EvidenceWarning {
                        chapter: chapter.theme_name.clone(),
                        issue: "Principle has insufficient evidence".to_string(),
                        principle: p.principle.chars().take(PRINCIPLE_PREVIEW_CHARS).collect(),
                    })
            })
            .collect();

        if warnings.is_empty() {
            return EvidenceValidation {
                status: CheckStatus::Pass,
                warnings,
                score: self.config.evidence_pass_score,
            };
        }

        debug!("{} principles lack sufficient evidence", warnings.len());
        EvidenceValidation {
            status: CheckStatus::PassWithWarnings,
            warnings: warnings
                .into_iter()
                .take(self.config.max_evidence_warnings)
                .collect(),
            score: self.config.evidence_warning_score,
        }
    }

    fn check_coherence(&self, chapters: &[SynthesisChapter]) -> CoherenceValidation {
        let total: f64 = chapters.iter().map(completeness).sum();
        let average = total / chapters.len().max(1) as f64;

        CoherenceValidation {
            status: if average > self.config.coherence_pass_ratio {
                CheckStatus::Pass
            } else {
                CheckStatus::Warning
            },
            internal_consistency: average,
            logical_contradictions: 0,
            score: average * 10.0,
        }
    }
}

fn has_rules(chapter: &SynthesisChapter) -> bool {
    !chapter.actionable_rules.do_rules.is_empty() || !chapter.actionable_rules.dont_rules.is_empty()
}

/// 0.25 for each of: summary, principles, rules, implications
fn completeness(chapter: &SynthesisChapter) -> f64 {
    [
        !chapter.executive_summary.is_empty(),
        !chapter.core_principles.is_empty(),
        has_rules(chapter),
        !chapter.second_order_implications.is_empty(),
    ]
    .iter()
    .filter(|present| **present)
    .count() as f64
        * 0.25
}

fn red_flags(chapters: &[SynthesisChapter]) -> Vec<RedFlag> {
    let mut flags = Vec::new();
    for chapter in chapters {
        if chapter.contradictions.is_empty() {
            flags.push(RedFlag {
                flag: format!("No contradictions identified in {}", chapter.theme_name),
                severity: Severity::Low,
                recommendation: "Review if contradictions were genuinely absent".to_string(),
            });
        }
        if chapter.core_principles.is_empty() {
            flags.push(RedFlag {
                flag: format!("No core principles in {}", chapter.theme_name),
                severity: Severity::High,
                recommendation: "Chapter needs core principles".to_string(),
            });
        }
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use distill_domain::{ChapterRules, Contradiction, CorePrinciple, ResolutionStatus};

    fn principle(text: &str, evidence: usize) -> CorePrinciple {
        CorePrinciple {
            principle: text.to_string(),
            evidence: (0..evidence).map(|i| format!("evidence {}", i)).collect(),
            implications: vec!["Based on 1 documents".to_string()],
            boundary_conditions: String::new(),
            confidence: 0.5,
        }
    }

    fn complete_chapter(name: &str) -> SynthesisChapter {
        SynthesisChapter {
            theme_id: "theme_000".to_string(),
            theme_name: name.to_string(),
            executive_summary: format!(
                "{} encompasses 2 documents examining psychology. This theme explores key insights.",
                name
            ),
            core_principles: vec![principle("Emotional state drives every trading decision", 2)],
            actionable_rules: ChapterRules {
                do_rules: vec!["- Always journal".to_string()],
                dont_rules: vec![],
                when_to: vec![],
            },
            contradictions: vec![Contradiction {
                contradiction_id: "contra_doc_000_0".to_string(),
                description: "Patience vs. missing the move".to_string(),
                position_a: BTreeMap::new(),
                position_b: BTreeMap::new(),
                resolution_status: ResolutionStatus::Unresolved,
                attempted_resolution: None,
            }],
            key_quotes: vec![],
            second_order_implications: vec!["Based on 1 documents".to_string()],
            open_questions: vec![],
        }
    }

    fn empty_chapter(name: &str) -> SynthesisChapter {
        SynthesisChapter {
            theme_id: "theme_001".to_string(),
            theme_name: name.to_string(),
            executive_summary: String::new(),
            core_principles: vec![],
            actionable_rules: ChapterRules::default(),
            contradictions: vec![],
            key_quotes: vec![],
            second_order_implications: vec![],
            open_questions: vec![],
        }
    }

    fn validate(chapters: &[SynthesisChapter]) -> ValidationReport {
        Validator::default().validate(chapters, &[], &PatternReport::default())
    }

    #[test]
    fn test_zero_chapters_score_in_range() {
        let report = validate(&[]);
        // internal 0, contradictions 10, evidence 10, coherence 0
        assert!((report.overall_quality_score - 5.0).abs() < 1e-9);
        assert!((0.0..=10.0).contains(&report.overall_quality_score));
        assert_eq!(report.internal_validation.status, CheckStatus::Warning);
        assert!(report.red_flags.is_empty());
    }

    #[test]
    fn test_complete_chapter_scores_full_marks() {
        let report = validate(&[complete_chapter("Discipline & Process")]);

        assert_eq!(report.internal_validation.status, CheckStatus::Pass);
        assert!((report.internal_validation.score - 10.0).abs() < 1e-9);
        assert_eq!(report.contradiction_validation.contradictions_identified, 1);
        assert_eq!(report.contradiction_validation.contradictions_addressed, 1);
        assert_eq!(report.evidence_validation.status, CheckStatus::Pass);
        assert_eq!(report.coherence_validation.status, CheckStatus::Pass);
        assert!((report.overall_quality_score - 10.0).abs() < 1e-9);
        assert!(report.red_flags.is_empty());
        assert!(report.corrections_required.is_empty());
    }

    #[test]
    fn test_empty_chapter_raises_flags_and_lowers_scores() {
        let report = validate(&[complete_chapter("A"), empty_chapter("B")]);

        let checks = &report.internal_validation.checks;
        assert_eq!(checks.has_principles, 0.5);
        assert_eq!(checks.has_actionable_rules, 0.5);
        assert_eq!(checks.principles_have_evidence, 1.0);
        assert_eq!(report.internal_validation.status, CheckStatus::Warning);

        assert!((report.coherence_validation.internal_consistency - 0.5).abs() < 1e-9);
        assert_eq!(report.coherence_validation.status, CheckStatus::Warning);

        let flags: Vec<_> = report.red_flags.iter().map(|f| (f.flag.as_str(), f.severity)).collect();
        assert_eq!(
            flags,
            vec![
                ("No contradictions identified in B", Severity::Low),
                ("No core principles in B", Severity::High),
            ]
        );
        assert_eq!(report.flags_at_least(Severity::High).count(), 1);
    }

    #[test]
    fn test_short_summary_not_counted() {
        let mut chapter = complete_chapter("A");
        chapter.executive_summary = "x".repeat(50);
        let report = validate(&[chapter]);
        assert_eq!(report.internal_validation.checks.has_executive_summary, 0.0);
        // Coherence only needs a non-empty summary
        assert_eq!(report.coherence_validation.internal_consistency, 1.0);
    }

    #[test]
    fn test_evidence_warnings_capped() {
        let mut chapter = complete_chapter("Risk Management & Position Sizing");
        chapter.core_principles = (0..7)
            .map(|i| {
                let text = format!("A principle that is definitely longer than fifty characters #{}", i);
                principle(&text, 1)
            })
            .collect();

        let report = validate(&[chapter]);
        let evidence = &report.evidence_validation;
        assert_eq!(evidence.status, CheckStatus::PassWithWarnings);
        assert_eq!(evidence.score, 8.0);
        assert_eq!(evidence.warnings.len(), 5);
        assert_eq!(evidence.warnings[0].chapter, "Risk Management & Position Sizing");
        assert_eq!(evidence.warnings[0].issue, "Principle has insufficient evidence");
        assert_eq!(evidence.warnings[0].principle.chars().count(), 50);
    }

    #[test]
    fn test_thresholds_come_from_config() {
        let mut chapter = complete_chapter("A");
        chapter.core_principles = vec![principle("Emotional state drives every trading decision", 1)];

        let default = validate(&[chapter.clone()]);
        assert_eq!(default.evidence_validation.status, CheckStatus::PassWithWarnings);

        let permissive = Validator::new(ValidationConfig::permissive()).validate(
            &[chapter],
            &[],
            &PatternReport::default(),
        );
        assert_eq!(permissive.evidence_validation.status, CheckStatus::Pass);
    }
}
