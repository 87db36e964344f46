//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur during extraction
///
/// Only [`ExtractorError::TextTooLong`] reaches callers of
/// `Extractor::analyze`; backend errors are absorbed by the generative
/// strategy's fallback.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Document exceeds the configured maximum length
    #[error("Text too long: {len} bytes (max: {max})")]
    TextTooLong {
        /// Document length in bytes
        len: usize,
        /// Configured limit
        max: usize,
    },

    /// The generative backend call failed
    #[error("Backend error: {0}")]
    Backend(String),

    /// Principle response did not have the expected shape
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
