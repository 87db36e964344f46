//! Keyword heuristics that fill every field of an analyzed document
//!
//! Each function is a pure scan over the document text. The principle scan
//! doubles as the fallback for the generative strategy.

use distill_domain::{ActionableRules, TriggeringContext};
use regex::Regex;
use std::sync::LazyLock;

/// Returned when no line of the document is long enough to stand as a principle
pub const PRINCIPLE_SENTINEL: &str = "Core principle extracted from document";

/// Words that mark a line as stating a principle
pub const PRINCIPLE_KEYWORDS: &[&str] =
    &["lesson", "principle", "learned", "key", "important", "realize"];

const DO_KEYWORDS: &[&str] = &["should", "must", "always", "do:"];
const DONT_KEYWORDS: &[&str] = &["don't", "never", "avoid", "stop"];
const EXAMPLE_KEYWORDS: &[&str] = &["example", "instance", "case", "trade"];

const EMOTIONAL_STATES: &[(&str, &[&str])] = &[
    ("calm", &["calm", "peaceful", "clear"]),
    ("restless", &["restless", "anxious", "stressed"]),
    ("caffeinated", &["coffee", "caffeinated"]),
];

const MARKET_CONDITIONS: &[(&str, &[&str])] = &[
    ("bullish", &["bull", "rally", "uptrend"]),
    ("bearish", &["bear", "crash", "downtrend"]),
];

/// Tag taxonomy in emission order
pub const TAG_TAXONOMY: &[(&str, &[&str])] = &[
    ("psychology", &["psychology", "mental", "emotional", "mind"]),
    ("risk-management", &["risk", "loss", "drawdown", "position size"]),
    ("technical-analysis", &["technical", "chart", "indicator", "pattern"]),
    ("fundamental-analysis", &["fundamental", "valuation", "earnings", "dcf"]),
    ("post-mortem", &["post-mortem", "review", "reflection", "mistake"]),
    ("strategy", &["strategy", "approach", "framework", "system"]),
    ("discipline", &["discipline", "rules", "process", "consistency"]),
];

const MAX_PRINCIPLE_CHARS: usize = 200;
const MAX_RULE_CHARS: usize = 150;
const MAX_EVIDENCE_CHARS: usize = 150;
const MAX_METRICS: usize = 5;
const MAX_EVIDENCE: usize = 10;

static METRIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.?\d*%?").expect("metric pattern is valid"));

/// First `max` characters of `text`
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Pick a core principle by keyword scan
///
/// The first line longer than 20 characters containing a principle keyword
/// wins; otherwise the first line longer than 30 characters; otherwise
/// [`PRINCIPLE_SENTINEL`].
pub fn heuristic_principle(content: &str) -> String {
    let keyword_line = content.lines().map(str::trim).find(|line| {
        char_len(line) > 20 && contains_any(&line.to_lowercase(), PRINCIPLE_KEYWORDS)
    });

    keyword_line
        .or_else(|| content.lines().map(str::trim).find(|line| char_len(line) > 30))
        .map(|line| truncate_chars(line, MAX_PRINCIPLE_CHARS))
        .unwrap_or_else(|| PRINCIPLE_SENTINEL.to_string())
}

/// Classify lower-cased lines as imperatives or prohibitions
///
/// A line matching both keyword sets is an imperative only.
pub fn extract_rules(content: &str) -> ActionableRules {
    let mut rules = ActionableRules::default();
    let lowered = content.to_lowercase();

    for line in lowered.lines().map(str::trim) {
        if char_len(line) <= 10 {
            continue;
        }
        if contains_any(line, DO_KEYWORDS) {
            rules.do_rules.push(truncate_chars(line, MAX_RULE_CHARS));
        } else if contains_any(line, DONT_KEYWORDS) {
            rules.dont_rules.push(truncate_chars(line, MAX_RULE_CHARS));
        }
    }

    rules
}

fn first_category(lowered: &str, categories: &[(&str, &[&str])]) -> Option<String> {
    categories
        .iter()
        .find(|(_, keywords)| contains_any(lowered, keywords))
        .map(|(label, _)| label.to_string())
}

/// Detect emotional state and market condition, each by priority order
pub fn analyze_context(content: &str) -> TriggeringContext {
    let lowered = content.to_lowercase();
    TriggeringContext {
        emotional_state: first_category(&lowered, EMOTIONAL_STATES),
        market_condition: first_category(&lowered, MARKET_CONDITIONS),
        triggering_event: None,
    }
}

/// Collect numeric metrics then example lines, at most 10 items
pub fn extract_evidence(content: &str) -> Vec<String> {
    let mut evidence: Vec<String> = METRIC_RE
        .find_iter(content)
        .take(MAX_METRICS)
        .map(|m| format!("Metric: {}", m.as_str()))
        .collect();

    for line in content.lines() {
        if evidence.len() >= MAX_EVIDENCE {
            break;
        }
        let trimmed = line.trim();
        if char_len(trimmed) > 20 && contains_any(&line.to_lowercase(), EXAMPLE_KEYWORDS) {
            evidence.push(truncate_chars(trimmed, MAX_EVIDENCE_CHARS));
        }
    }

    evidence.truncate(MAX_EVIDENCE);
    evidence
}

/// Taxonomy labels whose keywords appear anywhere in the document
pub fn generate_tags(content: &str) -> Vec<String> {
    let lowered = content.to_lowercase();
    TAG_TAXONOMY
        .iter()
        .filter(|(_, keywords)| contains_any(&lowered, keywords))
        .map(|(tag, _)| tag.to_string())
        .collect()
}

/// Additive quality heuristic in [0, 5]
pub fn score_quality(content: &str, evidence: &[String], rules: &ActionableRules) -> f64 {
    let length = char_len(content);
    let mut score = 0.0;

    if length > 100 {
        score += 1.0;
    }
    if length > 500 {
        score += 1.0;
    }
    if !evidence.is_empty() {
        score += 1.0;
    }
    if evidence.len() > 3 {
        score += 1.0;
    }
    if !rules.is_empty() {
        score += 1.0;
    }

    f64::min(score, 5.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_principle_prefers_keyword_line() {
        let content = "# Notes on markets today\n\
                       This opening line is long enough to be a fallback.\n\
                       Key lesson learned: patience pays.";
        assert_eq!(heuristic_principle(content), "Key lesson learned: patience pays.");
    }

    #[test]
    fn test_principle_keyword_match_is_case_insensitive() {
        let content = "IMPORTANT: never average down on losers";
        assert_eq!(heuristic_principle(content), content);
    }

    #[test]
    fn test_principle_falls_back_to_first_long_line() {
        let content = "short\n   A line that is comfortably over thirty chars   \nkey";
        assert_eq!(
            heuristic_principle(content),
            "A line that is comfortably over thirty chars"
        );
    }

    #[test]
    fn test_principle_sentinel_when_nothing_qualifies() {
        assert_eq!(heuristic_principle("tiny\nlines\nonly"), PRINCIPLE_SENTINEL);
        assert_eq!(heuristic_principle(""), PRINCIPLE_SENTINEL);
    }

    #[test]
    fn test_principle_truncated_to_200_chars() {
        let content = format!("The key lesson {}", "x".repeat(400));
        assert_eq!(heuristic_principle(&content).chars().count(), 200);
    }

    #[test]
    fn test_rules_are_lowercased_and_classified() {
        let content = "- Always check my mental state\n\
                       - Never trade after drinking coffee\n\
                       - Wait for genuine setups";
        let rules = extract_rules(content);
        assert_eq!(rules.do_rules, vec!["- always check my mental state"]);
        assert_eq!(rules.dont_rules, vec!["- never trade after drinking coffee"]);
    }

    #[test]
    fn test_rule_matching_both_sets_is_imperative_only() {
        let rules = extract_rules("You should never chase a breakout");
        assert_eq!(rules.do_rules.len(), 1);
        assert!(rules.dont_rules.is_empty());
    }

    #[test]
    fn test_short_rule_lines_ignored() {
        let rules = extract_rules("must go\nnever\n");
        assert!(rules.is_empty());
    }

    #[test]
    fn test_context_priority_order() {
        let context = analyze_context("Felt anxious but calm after a walk. Market rally then crash.");
        assert_eq!(context.emotional_state.as_deref(), Some("calm"));
        assert_eq!(context.market_condition.as_deref(), Some("bullish"));
        assert!(context.triggering_event.is_none());

        let context = analyze_context("Too much coffee today");
        assert_eq!(context.emotional_state.as_deref(), Some("caffeinated"));
        assert!(context.market_condition.is_none());
    }

    #[test]
    fn test_evidence_metrics_first_and_capped() {
        let content = "Win rate 85% over 12 trades, 3.5 average, 7 and 9 and 11\n\
                       For example this line describes a setup in detail\n\
                       Another case study worth remembering for later";
        let evidence = extract_evidence(content);

        assert_eq!(evidence[0], "Metric: 85%");
        assert_eq!(evidence[1], "Metric: 12");
        assert_eq!(evidence[2], "Metric: 3.5");
        assert_eq!(evidence[4], "Metric: 9");
        assert!(!evidence.contains(&"Metric: 11".to_string()));
        // First line mentions "trades" so it also counts as an example line
        assert_eq!(evidence.len(), 8);
        assert_eq!(evidence[6], "For example this line describes a setup in detail");
    }

    #[test]
    fn test_evidence_total_cap() {
        let content = (0..20)
            .map(|i| format!("example number {} of a long evidence line", i))
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(extract_evidence(&content).len(), 10);
    }

    #[test]
    fn test_tags_follow_taxonomy_order() {
        let tags = generate_tags("Discipline first. Chart patterns second. Mind over matter.");
        assert_eq!(tags, vec!["psychology", "technical-analysis", "discipline"]);
        assert!(generate_tags("nothing relevant here").is_empty());
    }

    #[test]
    fn test_tag_keywords_match_substrings() {
        // "position size" spans two words
        let tags = generate_tags("Keep POSITION SIZE small");
        assert_eq!(tags, vec!["risk-management"]);
    }

    #[test]
    fn test_quality_zero_for_short_plain_text() {
        let content = "A brief note with nothing else in it.";
        let evidence = extract_evidence(content);
        let rules = extract_rules(content);
        assert_eq!(score_quality(content, &evidence, &rules), 0.0);
    }

    #[test]
    fn test_quality_reaches_cap() {
        let content = "x".repeat(600);
        let evidence: Vec<String> = (0..4).map(|i| format!("Metric: {}", i)).collect();
        let rules = ActionableRules {
            do_rules: vec!["always".to_string()],
            ..Default::default()
        };
        assert_eq!(score_quality(&content, &evidence, &rules), 5.0);
    }
}
