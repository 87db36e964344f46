//! Distill CLI library.
//!
//! This library provides the pieces of the `distill` binary: argument
//! parsing, configuration lookup, document loading, and report output.

pub mod cli;
pub mod config;
pub mod error;
pub mod loader;
pub mod output;

pub use cli::{Cli, ProviderArg, ReportFormat};
pub use config::load_config;
pub use error::{CliError, Result};
pub use loader::load_documents;
pub use output::{render_markdown, Formatter, ReportWriter};
