//! Error types for the CLI application.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Document directory does not exist
    #[error("Document directory not found: {}", .0.display())]
    DocumentsNotFound(PathBuf),

    /// Document directory holds no markdown files
    #[error("No documents found in {}. Add markdown files to the directory.", .0.display())]
    NoDocuments(PathBuf),

    /// Pipeline error
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] distill_orchestrator::PipelineError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
