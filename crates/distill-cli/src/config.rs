//! Locating and loading the pipeline configuration.

use crate::error::{CliError, Result};
use distill_orchestrator::PipelineConfig;
use std::path::{Path, PathBuf};
use tracing::info;

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "distill.toml";

/// Candidate config files, most specific first.
///
/// An explicit path always wins; otherwise `./distill.toml`, then
/// `<config dir>/distill/config.toml`.
pub fn config_candidates(explicit: Option<&Path>) -> Vec<PathBuf> {
    if let Some(path) = explicit {
        return vec![path.to_path_buf()];
    }

    let mut candidates = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("distill").join("config.toml"));
    }
    candidates
}

/// Load the pipeline configuration.
///
/// A missing explicit file is an error; missing implicit files fall back to
/// defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<PipelineConfig> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(CliError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
    }

    match config_candidates(explicit).into_iter().find(|p| p.exists()) {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            PipelineConfig::from_file(&path).map_err(CliError::Config)
        }
        None => {
            info!("No configuration file found, using defaults");
            Ok(PipelineConfig::default())
        }
    }
}
