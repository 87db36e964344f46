//! Distill LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `distill-domain`, used by
//! the generative principle strategy in `distill-extractor`.
//!
//! # Providers
//!
//! - `MockProvider`: Scripted responses for tests, records every prompt
//! - `OllamaProvider`: Local Ollama API integration
//!
//! # Examples
//!
//! ```
//! use distill_llm::MockProvider;
//! use distill_domain::LlmProvider;
//!
//! let provider = MockProvider::principle("Cut losers early", 0.8);
//! let reply = provider.generate("Extract the core principle...").unwrap();
//! assert!(reply.contains("\"core_principle\":\"Cut losers early\""));
//! assert_eq!(provider.prompts().len(), 1);
//! ```

#![warn(missing_docs)]

pub mod ollama;

use distill_domain::LlmProvider as LlmProviderTrait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

pub use ollama::OllamaProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Request exceeded the configured timeout
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// The blocking wrapper could not start its runtime
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Scripted failure from a mock
    #[error("Scripted failure for prompt: {0}")]
    Scripted(String),
}

/// Scripted LLM provider for tests
///
/// Answers from a per-prompt table, then from a fallback reply. Every prompt
/// received is recorded; clones share the script and the record, so a
/// provider moved into an extractor can still be inspected.
///
/// # Examples
///
/// ```
/// use distill_llm::MockProvider;
/// use distill_domain::LlmProvider;
///
/// let provider = MockProvider::new("fallback")
///     .with_response("known prompt", "scripted")
///     .with_failure("broken prompt");
///
/// assert_eq!(provider.generate("known prompt").unwrap(), "scripted");
/// assert_eq!(provider.generate("other").unwrap(), "fallback");
/// assert!(provider.generate("broken prompt").is_err());
/// assert_eq!(provider.prompts().len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    fallback: Option<String>,
    script: Arc<Mutex<HashMap<String, Option<String>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockProvider {
    /// Reply with `response` to every prompt not scripted otherwise
    pub fn new(response: impl Into<String>) -> Self {
        Self::with_fallback(Some(response.into()))
    }

    /// Reply with the JSON object the principle prompt asks for
    pub fn principle(core_principle: &str, confidence: f64) -> Self {
        let reply = serde_json::json!({
            "core_principle": core_principle,
            "confidence": confidence,
            "reasoning": "scripted",
        });
        Self::new(reply.to_string())
    }

    /// Fail every prompt not scripted otherwise, like an unreachable server
    pub fn offline() -> Self {
        Self::with_fallback(None)
    }

    fn with_fallback(fallback: Option<String>) -> Self {
        Self {
            fallback,
            script: Arc::new(Mutex::new(HashMap::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Script a reply for one exact prompt
    pub fn with_response(self, prompt: impl Into<String>, response: impl Into<String>) -> Self {
        lock(&self.script).insert(prompt.into(), Some(response.into()));
        self
    }

    /// Script a failure for one exact prompt
    pub fn with_failure(self, prompt: impl Into<String>) -> Self {
        lock(&self.script).insert(prompt.into(), None);
        self
    }

    /// Prompts received so far, oldest first
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }

    /// Number of prompts received so far
    pub fn call_count(&self) -> usize {
        lock(&self.prompts).len()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        lock(&self.prompts).push(prompt.to_string());

        let scripted = lock(&self.script).get(prompt).cloned();
        match scripted {
            Some(Some(response)) => Ok(response),
            Some(None) => Err(LlmError::Scripted(prompt.chars().take(40).collect())),
            None => self
                .fallback
                .clone()
                .ok_or_else(|| LlmError::Communication("mock provider is offline".to_string())),
        }
    }

    fn generate_structured(&self, prompt: &str, _schema: &str) -> Result<String, Self::Error> {
        self.generate(prompt)
    }
}
