//! Distill Orchestrator
//!
//! Drives a corpus of documents through the five pipeline stages and
//! assembles the final synthesis report.
//!
//! # Overview
//!
//! The Orchestrator is responsible for:
//! - **Sequencing**: Each stage consumes the complete output of the previous one
//! - **Bounded parallelism**: Per-document and per-theme work runs on a worker pool
//! - **Checkpointing**: Every stage's output is persisted as JSON
//! - **Cancellation**: A shared flag stops the run at the next stage boundary
//! - **Metrics collection**: Stage timings, item failures and checkpoint writes
//!
//! # Stages
//!
//! | Stage | Input | Output | Item failures |
//! |-------|-------|--------|---------------|
//! | **Deconstruction** | documents | analyzed documents | dropped document |
//! | **Pattern recognition** | analyzed documents | pattern report | none |
//! | **Categorization** | analyzed documents, patterns | theme structure | none |
//! | **Synthesis** | themes | chapters | dropped theme |
//! | **Validation** | chapters | validation report | none |
//!
//! # Usage
//!
//! ```no_run
//! use distill_domain::Document;
//! use distill_orchestrator::{Orchestrator, PipelineConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PipelineConfig::from_file("distill.toml")?;
//!     let orchestrator = Orchestrator::new(config)?;
//!
//!     let documents = vec![Document::new("doc_000", "journal.md", "Key lesson: size down after losses.")];
//!     let run = orchestrator.run(documents).await?;
//!
//!     println!("Quality: {:.1}/10", run.report.metadata.overall_quality_score);
//!     println!("{}", run.metrics.summary());
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [extractor]
//! prompt_char_limit = 2000
//!
//! [extractor.backend]
//! provider = "heuristic"
//!
//! [processing]
//! parallel_workers = 4
//!
//! [checkpoints]
//! enabled = true
//! directory = "./checkpoints"
//! write_timeout_secs = 10
//!
//! [validation]
//! min_evidence_per_principle = 2
//! ```
//!
//! # Checkpoints
//!
//! Checkpoints can be read back for inspection or resumption tooling:
//!
//! ```no_run
//! use distill_domain::{PipelineStage, ThemeStructure};
//! use distill_orchestrator::{Checkpoint, CheckpointStore};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = CheckpointStore::new("./checkpoints");
//! let themes: Checkpoint<ThemeStructure> = store.load(PipelineStage::Categorization, true)?;
//! println!("{} themes at {}", themes.data.themes.len(), themes.timestamp);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod cancel;
mod checkpoint;
mod config;
mod error;
mod metrics;
mod orchestrator;
mod report;

pub use cancel::CancelFlag;
pub use checkpoint::{Checkpoint, CheckpointStore};
pub use config::{CheckpointConfig, PipelineConfig, ProcessingConfig};
pub use error::{CheckpointError, PipelineError};
pub use metrics::RunMetrics;
pub use orchestrator::Orchestrator;
pub use report::{PipelineRun, ReportMetadata, SynthesisReport};
