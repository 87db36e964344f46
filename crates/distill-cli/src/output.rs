//! Output formatting for the CLI.
//!
//! [`Formatter`] renders terminal messages; [`ReportWriter`] writes the
//! report files.

use crate::cli::ReportFormat;
use crate::error::Result;
use chrono::Local;
use colored::*;
use distill_domain::SynthesisChapter;
use distill_orchestrator::{PipelineRun, SynthesisReport};
use std::fs;
use std::path::{Path, PathBuf};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

const FILE_TIMESTAMP: &str = "%Y%m%d_%H%M%S";
const MAX_PRINCIPLE_EVIDENCE: usize = 3;
const MAX_CONCEPTS: usize = 10;
const MAX_COOCCURRENCES: usize = 5;

/// Terminal formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Summary of a finished run: headline numbers and a theme table.
    pub fn run_summary(&self, run: &PipelineRun) -> String {
        let metadata = &run.report.metadata;
        let mut lines = vec![
            self.colorize("Summary:", "cyan"),
            format!("  Documents processed: {}", metadata.total_documents),
            format!("  Themes identified: {}", metadata.total_themes),
            format!("  Quality score: {:.2}/10", metadata.overall_quality_score),
        ];

        if run.has_failures() {
            lines.push(self.warning(&format!("{} item(s) dropped", run.failures.len())));
            for failure in &run.failures {
                lines.push(format!(
                    "    {} ({}): {}",
                    failure.item_id, failure.stage, failure.reason
                ));
            }
        }

        lines.push(self.themes_table(&run.report));
        lines.join("\n")
    }

    /// Format themes as a table.
    fn themes_table(&self, report: &SynthesisReport) -> String {
        if report.themes.is_empty() {
            return self.colorize("No themes found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Theme", "Documents", "Importance", "Principles"]);

        for theme in &report.themes {
            let principles = chapter_for(report, &theme.theme_id)
                .map(|chapter| chapter.core_principles.len().to_string())
                .unwrap_or_else(|| "-".to_string());
            builder.push_record([
                theme.theme_id.clone(),
                theme.name.clone(),
                theme.document_ids.len().to_string(),
                format!("{:.1}", theme.importance_score),
                principles,
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn chapter_for<'a>(report: &'a SynthesisReport, theme_id: &str) -> Option<&'a SynthesisChapter> {
    report.synthesis.iter().find(|chapter| chapter.theme_id == theme_id)
}

/// Writes `synthesis_report_<timestamp>.{json,md}` into one directory.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    /// Create a writer for `output_dir`; the directory is created on write.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Output directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write the formats selected by `format`, returning the written paths.
    pub fn write(&self, report: &SynthesisReport, format: ReportFormat) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.output_dir)?;

        let now = Local::now();
        let stamp = now.format(FILE_TIMESTAMP).to_string();
        let mut written = Vec::new();

        if format.writes_markdown() {
            let generated = now.format("%Y-%m-%d %H:%M:%S").to_string();
            let path = self.report_path(&stamp, "md");
            fs::write(&path, render_markdown(report, &generated))?;
            written.push(path);
        }
        if format.writes_json() {
            let path = self.report_path(&stamp, "json");
            fs::write(&path, serde_json::to_string_pretty(report)?)?;
            written.push(path);
        }

        Ok(written)
    }

    fn report_path(&self, stamp: &str, extension: &str) -> PathBuf {
        self.output_dir
            .join(format!("synthesis_report_{}.{}", stamp, extension))
    }
}

/// Render the markdown report.
pub fn render_markdown(report: &SynthesisReport, generated: &str) -> String {
    let mut lines = vec![
        "# Thematic Insight Extraction Report".to_string(),
        String::new(),
        format!("**Generated:** {}", generated),
        String::new(),
    ];

    write_overview(&mut lines, report);
    write_synthesis(&mut lines, &report.synthesis);
    write_validation(&mut lines, report);
    write_patterns(&mut lines, report);

    lines.join("\n")
}

fn write_overview(lines: &mut Vec<String>, report: &SynthesisReport) {
    let metadata = &report.metadata;
    lines.extend([
        "## Overview".to_string(),
        String::new(),
        format!("- **Total Documents Analyzed:** {}", metadata.total_documents),
        format!("- **Themes Identified:** {}", metadata.total_themes),
        format!(
            "- **Overall Quality Score:** {:.2}/10",
            metadata.overall_quality_score
        ),
        format!("- **Processing Stage:** {}", metadata.stage),
        String::new(),
        "---".to_string(),
        String::new(),
    ]);
}

fn write_list(lines: &mut Vec<String>, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    lines.push(heading.to_string());
    lines.push(String::new());
    lines.extend(items.iter().map(|item| format!("- {}", item)));
    lines.push(String::new());
}

fn write_synthesis(lines: &mut Vec<String>, chapters: &[SynthesisChapter]) {
    lines.push("## Synthesis by Theme".to_string());
    lines.push(String::new());

    for chapter in chapters {
        lines.push(format!("### {}", chapter.theme_name));
        lines.push(String::new());

        if !chapter.executive_summary.is_empty() {
            lines.extend([
                "#### Executive Summary".to_string(),
                String::new(),
                chapter.executive_summary.clone(),
                String::new(),
            ]);
        }

        if !chapter.core_principles.is_empty() {
            lines.push("#### Core Principles".to_string());
            lines.push(String::new());
            for (i, principle) in chapter.core_principles.iter().enumerate() {
                lines.push(format!("**{}. {}**", i + 1, principle.principle));
                lines.push(String::new());

                if !principle.evidence.is_empty() {
                    lines.push("*Evidence:*".to_string());
                    lines.extend(
                        principle
                            .evidence
                            .iter()
                            .take(MAX_PRINCIPLE_EVIDENCE)
                            .map(|e| format!("- {}", e)),
                    );
                    lines.push(String::new());
                }
                if !principle.implications.is_empty() {
                    lines.push("*Implications:*".to_string());
                    lines.extend(principle.implications.iter().map(|i| format!("- {}", i)));
                    lines.push(String::new());
                }
                lines.push(format!("*Confidence:* {:.2}", principle.confidence));
                lines.push(String::new());
            }
        }

        write_list(lines, "#### DO:", &chapter.actionable_rules.do_rules);
        write_list(lines, "#### DON'T:", &chapter.actionable_rules.dont_rules);

        if !chapter.contradictions.is_empty() {
            lines.push("#### Contradictions Identified".to_string());
            lines.push(String::new());
            for contradiction in &chapter.contradictions {
                lines.push(format!("- **{}**", contradiction.description));
                lines.push(format!("  - Status: {}", contradiction.resolution_status));
                if let Some(resolution) = &contradiction.attempted_resolution {
                    lines.push(format!("  - Resolution: {}", resolution));
                }
                lines.push(String::new());
            }
        }

        if !chapter.key_quotes.is_empty() {
            lines.push("#### Key Quotes".to_string());
            lines.push(String::new());
            for quote in &chapter.key_quotes {
                lines.push(format!("> {}", quote));
                lines.push(String::new());
            }
        }

        write_list(lines, "#### Open Questions", &chapter.open_questions);

        lines.push("---".to_string());
        lines.push(String::new());
    }
}

fn write_validation(lines: &mut Vec<String>, report: &SynthesisReport) {
    let validation = &report.validation;
    lines.extend([
        "## Validation Summary".to_string(),
        String::new(),
        format!(
            "**Overall Quality Score:** {:.2}/10",
            validation.overall_quality_score
        ),
        String::new(),
        format!(
            "- **Internal Check:** {} (score: {:.2})",
            validation.internal_validation.status, validation.internal_validation.score
        ),
        format!(
            "- **Contradictions:** {} (score: {:.2})",
            validation.contradiction_validation.status, validation.contradiction_validation.score
        ),
        format!(
            "- **Evidence:** {} (score: {:.2})",
            validation.evidence_validation.status, validation.evidence_validation.score
        ),
        format!(
            "- **Coherence:** {} (score: {:.2})",
            validation.coherence_validation.status, validation.coherence_validation.score
        ),
    ]);

    if !validation.red_flags.is_empty() {
        lines.push(String::new());
        lines.push("### Red Flags".to_string());
        lines.push(String::new());
        for flag in &validation.red_flags {
            lines.push(format!("- **{}**", flag.flag));
            lines.push(format!("  - Severity: {}", flag.severity));
            lines.push(format!("  - Recommendation: {}", flag.recommendation));
        }
    }

    lines.push(String::new());
    lines.push("---".to_string());
    lines.push(String::new());
}

fn write_patterns(lines: &mut Vec<String>, report: &SynthesisReport) {
    lines.push("## Pattern Analysis".to_string());
    lines.push(String::new());

    let concepts = &report.patterns.frequency.high_frequency_concepts;
    if !concepts.is_empty() {
        lines.push("### High-Frequency Concepts".to_string());
        lines.push(String::new());
        for concept in concepts.iter().take(MAX_CONCEPTS) {
            lines.push(format!(
                "- **{}**: {} occurrences",
                concept.concept, concept.count
            ));
            lines.push(format!("  - {}", concept.significance));
        }
        lines.push(String::new());
    }

    let pairs = &report.patterns.cooccurrence.strong_cooccurrences;
    if !pairs.is_empty() {
        lines.push("### Strong Co-occurrences".to_string());
        lines.push(String::new());
        for pair in pairs.iter().take(MAX_COOCCURRENCES) {
            lines.push(format!("- **{}** ↔ **{}**", pair.concept_a, pair.concept_b));
            lines.push(format!("  - {}", pair.interpretation));
        }
        lines.push(String::new());
    }

    lines.push("---".to_string());
    lines.push(String::new());
}
