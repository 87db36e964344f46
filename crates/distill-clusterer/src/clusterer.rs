//! Tag-based thematic clustering

use distill_domain::{
    AnalyzedDocument, CrossThemePattern, OrphanDocument, PatternReport, Theme, ThemeStructure,
};
use std::collections::HashMap;
use tracing::{debug, info};

/// Groups smaller than this never become themes
pub const MIN_THEME_MEMBERS: usize = 2;

/// Importance is the member share scaled by this factor, capped at 10
const IMPORTANCE_SCALE: f64 = 30.0;

const MAX_IMPORTANCE: f64 = 10.0;

const ORPHAN_REASON: &str = "No matching theme found";
const ORPHAN_RECOMMENDATION: &str = "Create new theme or manual assignment";

/// Display names for the known taxonomy tags
const THEME_NAMES: &[(&str, &str)] = &[
    ("psychology", "Investment Psychology & Mental States"),
    ("risk-management", "Risk Management & Position Sizing"),
    ("technical-analysis", "Technical Analysis Approach"),
    ("fundamental-analysis", "Fundamental Analysis Framework"),
    ("post-mortem", "Learning from Mistakes"),
    ("strategy", "Investment Strategy & Philosophy"),
    ("discipline", "Discipline & Process"),
];

/// Groups analyzed documents into themes by their primary tag
///
/// Each document belongs to at most one theme, so every document ends up
/// either in exactly one theme or in the orphan list.
#[derive(Debug, Clone, Copy, Default)]
pub struct Clusterer;

impl Clusterer {
    /// Create a new clusterer
    pub fn new() -> Self {
        Self
    }

    /// Cluster documents into a theme structure
    pub fn cluster(&self, docs: &[AnalyzedDocument], patterns: &PatternReport) -> ThemeStructure {
        info!("Clustering {} documents into themes", docs.len());
        debug!(
            "{} high-frequency concepts available",
            patterns.frequency.high_frequency_concepts.len()
        );

        let mut themes = cluster_by_primary_tag(docs);
        let cross_theme_patterns = link_cross_cutting(&mut themes);
        let orphan_documents = find_orphans(docs, &themes);

        info!(
            "Created {} themes ({} orphan documents)",
            themes.len(),
            orphan_documents.len()
        );

        ThemeStructure {
            themes,
            cross_theme_patterns,
            orphan_documents,
        }
    }
}

/// Group by first tag in first-encounter order
///
/// Theme ids number every candidate group, including those too small to
/// become themes, so ids can have gaps.
fn cluster_by_primary_tag(docs: &[AnalyzedDocument]) -> Vec<Theme> {
    let mut groups: Vec<(&str, Vec<String>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for doc in docs {
        if let Some(tag) = doc.primary_tag() {
            let pos = *index.entry(tag).or_insert_with(|| {
                groups.push((tag, Vec::new()));
                groups.len() - 1
            });
            groups[pos].1.push(doc.document_id.clone());
        }
    }

    groups
        .into_iter()
        .enumerate()
        .filter(|(_, (_, members))| members.len() >= MIN_THEME_MEMBERS)
        .map(|(idx, (tag, members))| Theme {
            theme_id: format!("theme_{:03}", idx),
            name: theme_name(tag),
            description: format!(
                "Theme covering {} documents related to {}",
                members.len(),
                tag
            ),
            importance_score: importance(members.len(), docs.len()),
            document_ids: members,
            key_concepts: vec![tag.to_string()],
            cross_cutting: false,
            related_theme_ids: Vec::new(),
        })
        .collect()
}

/// Display name for a tag; unknown tags are title-cased with spaces
pub fn theme_name(tag: &str) -> String {
    THEME_NAMES
        .iter()
        .find(|(known, _)| *known == tag)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| title_case(&tag.replace('-', " ")))
}

fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            word_start = false;
        } else {
            out.push(c);
            word_start = true;
        }
    }
    out
}

/// `min(members / total * 30, 10)`
pub fn importance(members: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    f64::min(members as f64 / total as f64 * IMPORTANCE_SCALE, MAX_IMPORTANCE)
}

/// Report key concepts shared by several themes and cross-link those themes
fn link_cross_cutting(themes: &mut [Theme]) -> Vec<CrossThemePattern> {
    let mut concepts: Vec<(String, Vec<usize>)> = Vec::new();
    for (pos, theme) in themes.iter().enumerate() {
        for concept in &theme.key_concepts {
            match concepts.iter_mut().find(|(c, _)| c == concept) {
                Some((_, members)) => members.push(pos),
                None => concepts.push((concept.clone(), vec![pos])),
            }
        }
    }

    let mut patterns = Vec::new();
    for (concept, members) in concepts.into_iter().filter(|(_, m)| m.len() > 1) {
        let theme_ids: Vec<String> = members.iter().map(|&p| themes[p].theme_id.clone()).collect();

        for &pos in &members {
            let theme = &mut themes[pos];
            theme.cross_cutting = true;
            for id in &theme_ids {
                if *id != theme.theme_id && !theme.related_theme_ids.contains(id) {
                    theme.related_theme_ids.push(id.clone());
                }
            }
        }

        patterns.push(CrossThemePattern {
            pattern: format!("{} appears across {} themes", concept, theme_ids.len()),
            concept,
            themes: theme_ids,
            significance: "Cross-cutting concept".to_string(),
        });
    }

    patterns
}

fn find_orphans(docs: &[AnalyzedDocument], themes: &[Theme]) -> Vec<OrphanDocument> {
    let assigned: std::collections::HashSet<&str> = themes
        .iter()
        .flat_map(|theme| theme.document_ids.iter().map(String::as_str))
        .collect();

    docs.iter()
        .filter(|doc| !assigned.contains(doc.document_id.as_str()))
        .map(|doc| OrphanDocument {
            doc_id: doc.document_id.clone(),
            reason: ORPHAN_REASON.to_string(),
            recommendation: ORPHAN_RECOMMENDATION.to_string(),
        })
        .collect()
}
