//! Error types for pipeline runs

use distill_domain::PipelineStage;
use thiserror::Error;

/// Errors that abort a pipeline run
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A whole stage failed
    #[error("Stage {stage} failed: {reason}")]
    Stage {
        /// Stage that failed
        stage: PipelineStage,
        /// Cause
        reason: String,
    },

    /// The run was cancelled before `stage` started
    #[error("Run cancelled before {stage}")]
    Cancelled {
        /// First stage that did not run
        stage: PipelineStage,
    },
}

/// Errors from reading or writing checkpoints
#[derive(Error, Debug)]
pub enum CheckpointError {
    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Payload could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No checkpoint exists for the stage
    #[error("No checkpoint found for {0}")]
    NotFound(PipelineStage),

    /// The write did not finish in time
    #[error("Checkpoint write timed out after {0}s")]
    Timeout(u64),

    /// The write passed its deadline and discarded its output
    #[error("Checkpoint for {0} passed its deadline and was discarded")]
    DeadlineExceeded(PipelineStage),

    /// The blocking write task panicked or was cancelled
    #[error("Checkpoint task failed: {0}")]
    Task(String),
}
