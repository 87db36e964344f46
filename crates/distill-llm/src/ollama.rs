//! Ollama Provider Implementation
//!
//! Generative backend for principle extraction, talking to a local Ollama
//! server over `/api/generate`.
//!
//! - Configurable endpoint, model and request timeout
//! - Transient failures (5xx, connection errors, timeouts) are retried with
//!   exponential backoff; a missing model is not
//! - The `LlmProvider` impl blocks on a runtime owned by the provider and
//!   built on first use, so it must be called from a blocking worker, never
//!   from async code
//!
//! # Examples
//!
//! ```no_run
//! use distill_llm::OllamaProvider;
//! use std::time::Duration;
//!
//! let provider = OllamaProvider::new("http://localhost:11434", "llama3")
//!     .with_timeout(Duration::from_secs(20))
//!     .with_max_retries(2);
//! ```

use crate::LlmError;
use distill_domain::LlmProvider as LlmProviderTrait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{debug, warn};

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default timeout for LLM requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of attempts per prompt
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Ollama API provider for local LLM inference
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    client: reqwest::Client,
    timeout: Duration,
    max_retries: u32,
    runtime: OnceLock<Runtime>,
}

impl fmt::Debug for OllamaProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OllamaProvider")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'a str>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Outcome of one HTTP attempt
enum Attempt {
    Done(Result<String, LlmError>),
    Retry(LlmError),
}

fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            warn!("Failed to build HTTP client with timeout ({}), using defaults", e);
            reqwest::Client::new()
        })
}

/// Delay before retry number `attempt` (1-based): 1s, 2s, 4s, ...
fn backoff(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << (attempt.saturating_sub(1)).min(6))
}

impl OllamaProvider {
    /// Create a provider for `model` served at `endpoint`
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        let timeout = Duration::from_secs(DEFAULT_TIMEOUT_SECS);
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client: build_client(timeout),
            timeout,
            max_retries: DEFAULT_MAX_RETRIES,
            runtime: OnceLock::new(),
        }
    }

    /// Create a provider on `http://localhost:11434`
    pub fn default_endpoint(model: impl Into<String>) -> Self {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Set the number of attempts per prompt (at least 1)
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self.client = build_client(timeout);
        self
    }

    /// Model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Full URL of the generate endpoint
    pub fn generate_url(&self) -> String {
        format!("{}/api/generate", self.endpoint)
    }

    /// Generate free text
    pub async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.request(prompt, None).await
    }

    /// Generate using Ollama's JSON output mode
    pub async fn generate_json(&self, prompt: &str) -> Result<String, LlmError> {
        self.request(prompt, Some("json")).await
    }

    async fn request(&self, prompt: &str, format: Option<&str>) -> Result<String, LlmError> {
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            format,
        };

        let mut last_error = LlmError::Communication("no attempt made".to_string());
        for attempt in 1..=self.max_retries {
            match self.attempt(&body).await {
                Attempt::Done(result) => return result,
                Attempt::Retry(e) => {
                    debug!("Ollama attempt {}/{} failed: {}", attempt, self.max_retries, e);
                    last_error = e;
                }
            }
            if attempt < self.max_retries {
                tokio::time::sleep(backoff(attempt)).await;
            }
        }

        warn!("Ollama gave up after {} attempts: {}", self.max_retries, last_error);
        Err(last_error)
    }

    async fn attempt(&self, body: &GenerateRequest<'_>) -> Attempt {
        let response = match self.client.post(self.generate_url()).json(body).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => return Attempt::Retry(LlmError::Timeout(self.timeout.as_secs())),
            Err(e) => return Attempt::Retry(LlmError::Communication(format!("Request failed: {}", e))),
        };

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Attempt::Done(Err(LlmError::ModelNotAvailable(self.model.clone())));
        }
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Attempt::Retry(LlmError::Communication(format!("HTTP {}: {}", status, detail)));
        }

        Attempt::Done(
            response
                .json::<GenerateResponse>()
                .await
                .map(|body| body.response)
                .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e))),
        )
    }

    /// Runtime that drives blocking calls; the client's pooled
    /// connections stay bound to it for the provider's lifetime
    fn runtime(&self) -> Result<&Runtime, LlmError> {
        if let Some(runtime) = self.runtime.get() {
            return Ok(runtime);
        }

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("ollama-client")
            .enable_all()
            .build()
            .map_err(|e| LlmError::Runtime(e.to_string()))?;

        if let Err(extra) = self.runtime.set(runtime) {
            // Another worker initialized it first
            extra.shutdown_background();
        }
        self.runtime
            .get()
            .ok_or_else(|| LlmError::Runtime("runtime not initialized".to_string()))
    }

    fn block_on<F>(&self, future: F) -> Result<String, LlmError>
    where
        F: std::future::Future<Output = Result<String, LlmError>>,
    {
        self.runtime()?.block_on(future)
    }
}

impl Drop for OllamaProvider {
    fn drop(&mut self) {
        // Dropping a runtime blocks, which panics inside async code
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

impl LlmProviderTrait for OllamaProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.block_on(self.request(prompt, None))
    }

    fn generate_structured(&self, prompt: &str, _schema: &str) -> Result<String, Self::Error> {
        self.block_on(self.request(prompt, Some("json")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_settings() {
        let provider = OllamaProvider::new("http://localhost:11434/", "llama3");
        assert_eq!(provider.generate_url(), "http://localhost:11434/api/generate");
        assert_eq!(provider.model(), "llama3");
        assert_eq!(provider.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(provider.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_builders_clamp_retries() {
        let provider = OllamaProvider::default_endpoint("mistral")
            .with_max_retries(0)
            .with_timeout(Duration::from_secs(5));
        assert_eq!(provider.max_retries, 1);
        assert_eq!(provider.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_backoff_doubles() {
        assert_eq!(backoff(1), Duration::from_secs(1));
        assert_eq!(backoff(2), Duration::from_secs(2));
        assert_eq!(backoff(3), Duration::from_secs(4));
    }

    #[test]
    fn test_json_mode_in_request_body() {
        let body = GenerateRequest {
            model: "llama3",
            prompt: "hi",
            stream: false,
            format: Some("json"),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["format"], "json");
        assert_eq!(json["stream"], false);

        let plain = GenerateRequest { format: None, ..body };
        assert!(serde_json::to_value(&plain).unwrap().get("format").is_none());
    }

    #[test]
    fn test_debug_hides_client() {
        let debug = format!("{:?}", OllamaProvider::default_endpoint("llama3"));
        assert!(debug.contains("llama3"));
        assert!(!debug.contains("client"));
    }

    #[test]
    fn test_blocking_calls_share_one_runtime() {
        let provider = OllamaProvider::new("http://127.0.0.1:9", "llama3")
            .with_max_retries(1)
            .with_timeout(Duration::from_secs(2));

        assert!(LlmProviderTrait::generate(&provider, "first").is_err());
        let first: *const Runtime = provider.runtime().unwrap();
        assert!(LlmProviderTrait::generate(&provider, "second").is_err());
        let second: *const Runtime = provider.runtime().unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_drop_after_blocking_use_inside_async_context() {
        let provider = tokio::task::spawn_blocking(|| {
            let provider = OllamaProvider::new("http://127.0.0.1:9", "llama3")
                .with_max_retries(1)
                .with_timeout(Duration::from_secs(2));
            let _ = LlmProviderTrait::generate(&provider, "warm up");
            provider
        })
        .await
        .unwrap();

        assert!(provider.runtime.get().is_some());
        drop(provider);
    }

    #[tokio::test]
    #[ignore] // Only run when Ollama is available
    async fn test_ollama_generate_integration() {
        let provider = OllamaProvider::default_endpoint("llama3");
        if let Ok(response) = provider.generate("Say 'hello' and nothing else").await {
            assert!(!response.is_empty());
        }
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        // Port 9 (discard) is not an Ollama server
        let provider = OllamaProvider::new("http://127.0.0.1:9", "llama3")
            .with_max_retries(1)
            .with_timeout(Duration::from_secs(2));

        let result = provider.generate("test").await;
        assert!(matches!(
            result,
            Err(LlmError::Communication(_)) | Err(LlmError::Timeout(_))
        ));
    }
}
