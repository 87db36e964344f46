//! Command-line argument parsing.

use clap::Parser;
use distill_extractor::BackendKind;
use distill_orchestrator::PipelineConfig;
use std::path::PathBuf;

/// Distill - Turn a folder of notes into a graded thematic synthesis.
#[derive(Debug, Parser)]
#[command(name = "distill")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory containing markdown documents
    #[arg(short, long, default_value = "./data")]
    pub documents: PathBuf,

    /// Configuration file path (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output directory for reports
    #[arg(short, long, default_value = "./output")]
    pub output: PathBuf,

    /// Report formats to write
    #[arg(short, long, value_enum, default_value = "both")]
    pub format: ReportFormat,

    /// Do not write stage checkpoints
    #[arg(long)]
    pub no_checkpoints: bool,

    /// Concurrent extraction and synthesis workers
    #[arg(short = 'j', long)]
    pub workers: Option<usize>,

    /// Principle extraction backend
    #[arg(long, value_enum, env = "DISTILL_LLM_PROVIDER")]
    pub llm_provider: Option<ProviderArg>,

    /// Model name for the generative backend
    #[arg(long, env = "DISTILL_LLM_MODEL")]
    pub llm_model: Option<String>,

    /// Endpoint of the generative backend
    #[arg(long, env = "DISTILL_LLM_ENDPOINT")]
    pub llm_endpoint: Option<String>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

/// Which report files to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    /// JSON only
    Json,
    /// Markdown only
    Markdown,
    /// JSON and markdown
    Both,
}

impl ReportFormat {
    /// Whether a JSON report is written.
    pub fn writes_json(&self) -> bool {
        matches!(self, ReportFormat::Json | ReportFormat::Both)
    }

    /// Whether a markdown report is written.
    pub fn writes_markdown(&self) -> bool {
        matches!(self, ReportFormat::Markdown | ReportFormat::Both)
    }
}

/// Principle backend argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ProviderArg {
    /// Keyword heuristics only
    Heuristic,
    /// Local Ollama server
    Ollama,
}

impl From<ProviderArg> for BackendKind {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Heuristic => BackendKind::Heuristic,
            ProviderArg::Ollama => BackendKind::Ollama,
        }
    }
}

impl Cli {
    /// Apply command-line and environment overrides on top of file configuration.
    pub fn apply_overrides(&self, config: &mut PipelineConfig) {
        if self.no_checkpoints {
            config.checkpoints.enabled = false;
        }
        if let Some(workers) = self.workers {
            config.processing.parallel_workers = workers;
        }

        let backend = &mut config.extractor.backend;
        if let Some(provider) = self.llm_provider {
            backend.provider = provider.into();
        }
        if let Some(model) = &self.llm_model {
            backend.model = model.clone();
        }
        if let Some(endpoint) = &self.llm_endpoint {
            backend.endpoint = endpoint.clone();
        }
    }
}
