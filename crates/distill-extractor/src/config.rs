//! Configuration for the Extractor

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which principle strategy backs the extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Keyword scan; no external calls
    #[default]
    Heuristic,
    /// Local Ollama server
    Ollama,
}

/// Connection settings for the generative backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Backend selection
    pub provider: BackendKind,

    /// API endpoint
    pub endpoint: String,

    /// Model name
    pub model: String,

    /// Per-request timeout (seconds)
    pub timeout_secs: u64,

    /// Attempts before giving up on a request
    pub max_retries: u32,
}

impl BackendConfig {
    /// Get the request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            provider: BackendKind::Heuristic,
            endpoint: distill_llm::ollama::DEFAULT_ENDPOINT.to_string(),
            model: "llama3".to_string(),
            timeout_secs: 30,
            max_retries: 3,
        }
    }
}

/// Configuration for the Extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Optional input size cap (bytes); unset means any length is analyzed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_text_length: Option<usize>,

    /// Characters of the document included in a generative prompt
    pub prompt_char_limit: usize,

    /// Principle strategy backend
    pub backend: BackendConfig,
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_text_length == Some(0) {
            return Err("max_text_length must be greater than 0".to_string());
        }
        if self.prompt_char_limit == 0 {
            return Err("prompt_char_limit must be greater than 0".to_string());
        }
        if self.backend.provider == BackendKind::Ollama {
            if self.backend.timeout_secs == 0 {
                return Err("backend.timeout_secs must be greater than 0".to_string());
            }
            if self.backend.max_retries == 0 {
                return Err("backend.max_retries must be greater than 0".to_string());
            }
            if self.backend.model.trim().is_empty() {
                return Err("backend.model cannot be empty".to_string());
            }
            if !self.backend.endpoint.starts_with("http://")
                && !self.backend.endpoint.starts_with("https://")
            {
                return Err(format!(
                    "backend.endpoint must be an http(s) URL, got '{}'",
                    self.backend.endpoint
                ));
            }
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    /// Heuristic backend with the standard limits
    fn default() -> Self {
        Self {
            max_text_length: None,
            prompt_char_limit: 2_000,
            backend: BackendConfig::default(),
        }
    }
}

impl ExtractorConfig {
    /// Generative preset: local Ollama with the given model
    pub fn ollama(model: impl Into<String>) -> Self {
        Self {
            backend: BackendConfig {
                provider: BackendKind::Ollama,
                model: model.into(),
                ..BackendConfig::default()
            },
            ..Self::default()
        }
    }

    /// Lenient preset: a longer prompt window and a patient backend
    pub fn lenient() -> Self {
        Self {
            max_text_length: None,
            prompt_char_limit: 4_000,
            backend: BackendConfig {
                timeout_secs: 120,
                ..BackendConfig::default()
            },
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.backend.provider, BackendKind::Heuristic);
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(ExtractorConfig::ollama("mistral").validate().is_ok());
        assert!(ExtractorConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_invalid_max_text_length() {
        let mut config = ExtractorConfig::default();
        config.max_text_length = Some(0);
        assert!(config.validate().is_err());

        config.max_text_length = Some(1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_has_no_size_cap() {
        assert_eq!(ExtractorConfig::default().max_text_length, None);

        let toml_str = ExtractorConfig::default().to_toml().unwrap();
        assert!(!toml_str.contains("max_text_length"));
    }

    #[test]
    fn test_ollama_requires_http_endpoint() {
        let mut config = ExtractorConfig::ollama("llama3");
        config.backend.endpoint = "localhost:11434".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_heuristic_ignores_backend_settings() {
        let mut config = ExtractorConfig::default();
        config.backend.timeout_secs = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_backend_section_selects_heuristic() {
        let config = ExtractorConfig::from_toml("max_text_length = 1000").unwrap();
        assert_eq!(config.max_text_length, Some(1000));
        assert_eq!(config.prompt_char_limit, 2_000);
        assert_eq!(config.backend.provider, BackendKind::Heuristic);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig::ollama("mistral");
        let toml_str = config.to_toml().unwrap();
        assert!(toml_str.contains("provider = \"ollama\""));

        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();
        assert_eq!(parsed.backend.provider, BackendKind::Ollama);
        assert_eq!(parsed.backend.model, "mistral");
        assert_eq!(parsed.max_text_length, config.max_text_length);
    }
}
