//! Configuration for a pipeline run
//!
//! One value threaded through the Orchestrator; every section falls back to
//! its defaults when absent from the TOML.

use distill_extractor::ExtractorConfig;
use distill_validator::ValidationConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Worker settings for the per-item stages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Concurrent extraction and synthesis tasks (1 = sequential)
    pub parallel_workers: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self { parallel_workers: 4 }
    }
}

/// Where and whether stage checkpoints are written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckpointConfig {
    /// Write a checkpoint after every stage
    pub enabled: bool,

    /// Checkpoint directory, created on first write
    pub directory: PathBuf,

    /// Upper bound on a single checkpoint write (seconds)
    pub write_timeout_secs: u64,
}

impl CheckpointConfig {
    /// Get the write timeout as a Duration
    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_secs)
    }
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: PathBuf::from("./checkpoints"),
            write_timeout_secs: 10,
        }
    }
}

/// Configuration for the whole pipeline
///
/// # Examples
///
/// ```
/// use distill_orchestrator::PipelineConfig;
///
/// let config = PipelineConfig::from_toml(
///     r#"
///     [processing]
///     parallel_workers = 2
///
///     [checkpoints]
///     enabled = false
///     "#,
/// )
/// .unwrap();
/// assert_eq!(config.processing.parallel_workers, 2);
/// assert!(!config.checkpoints.enabled);
/// assert_eq!(config.extractor.max_text_length, None);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Stage 1 settings, including the principle backend
    pub extractor: ExtractorConfig,

    /// Worker settings
    pub processing: ProcessingConfig,

    /// Checkpoint settings
    pub checkpoints: CheckpointConfig,

    /// Stage 4 thresholds
    pub validation: ValidationConfig,
}

impl PipelineConfig {
    /// Sequential preset: one worker, no checkpoints
    pub fn sequential() -> Self {
        Self {
            processing: ProcessingConfig { parallel_workers: 1 },
            checkpoints: CheckpointConfig {
                enabled: false,
                ..CheckpointConfig::default()
            },
            ..Self::default()
        }
    }

    /// Point checkpoints at `directory` and enable them
    pub fn with_checkpoint_dir(mut self, directory: impl Into<PathBuf>) -> Self {
        self.checkpoints.enabled = true;
        self.checkpoints.directory = directory.into();
        self
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), String> {
        self.extractor.validate()?;
        self.validation.validate()?;

        if self.processing.parallel_workers == 0 {
            return Err("processing.parallel_workers must be greater than 0".to_string());
        }
        if self.checkpoints.enabled {
            if self.checkpoints.write_timeout_secs == 0 {
                return Err("checkpoints.write_timeout_secs must be greater than 0".to_string());
            }
            if self.checkpoints.directory.as_os_str().is_empty() {
                return Err("checkpoints.directory cannot be empty".to_string());
            }
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::from_toml(&contents)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use distill_extractor::BackendKind;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.processing.parallel_workers, 4);
        assert!(config.checkpoints.enabled);
        assert_eq!(config.checkpoints.directory, PathBuf::from("./checkpoints"));
        assert_eq!(config.checkpoints.write_timeout(), Duration::from_secs(10));
        assert_eq!(config.extractor.backend.provider, BackendKind::Heuristic);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sequential_preset() {
        let config = PipelineConfig::sequential();
        assert_eq!(config.processing.parallel_workers, 1);
        assert!(!config.checkpoints.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let mut config = PipelineConfig::default();
        config.processing.parallel_workers = 0;
        assert!(config.validate().unwrap_err().contains("parallel_workers"));
    }

    #[test]
    fn test_nested_sections_validated() {
        let mut config = PipelineConfig::default();
        config.validation.principles_pass_ratio = 2.0;
        assert!(config.validate().unwrap_err().contains("principles_pass_ratio"));
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = PipelineConfig::from_toml("").unwrap();
        assert_eq!(config.processing, ProcessingConfig::default());
        assert_eq!(config.checkpoints, CheckpointConfig::default());
    }

    #[test]
    fn test_backend_section_from_toml() {
        let config = PipelineConfig::from_toml(
            r#"
            [extractor.backend]
            provider = "ollama"
            model = "mistral"
            "#,
        )
        .unwrap();
        assert_eq!(config.extractor.backend.provider, BackendKind::Ollama);
        assert_eq!(config.extractor.backend.model, "mistral");
        assert_eq!(config.extractor.backend.max_retries, 3);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = PipelineConfig::sequential().with_checkpoint_dir("/tmp/distill");
        let parsed = PipelineConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed.checkpoints.directory, PathBuf::from("/tmp/distill"));
        assert!(parsed.checkpoints.enabled);
        assert_eq!(parsed.processing.parallel_workers, 1);
    }
}
