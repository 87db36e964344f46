//! Error types for the Synthesizer

use thiserror::Error;

/// Errors that can occur while synthesizing one theme
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SynthesizerError {
    /// Theme lists no member documents
    #[error("Theme {0} has no member documents")]
    EmptyTheme(String),

    /// Theme references documents missing from the analyzed set
    #[error("Theme {theme_id} references unknown documents: {}", missing.join(", "))]
    UnknownDocuments {
        /// Theme being synthesized
        theme_id: String,
        /// Ids not found among the analyzed documents
        missing: Vec<String>,
    },
}
