//! Text-generation provider abstraction.
//!
//! Recipes are produced by a language model behind the [`LlmProvider`] trait, so
//! the gateway can run against Gemini in production and [`FakeProvider`] in tests.

mod config;
mod fake;
mod gemini;

pub use config::{GeneratorConfig, ProviderKind, DEFAULT_GEMINI_MODEL, DEFAULT_TIMEOUT_SECS};
pub use fake::{FakeProvider, SAMPLE_RECIPE};
pub use gemini::GeminiProvider;

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error type for LLM operations.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("API returned error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Provider did not answer within {0} seconds")]
    Timeout(u64),

    #[error("Provider returned no text")]
    EmptyResponse,
}

/// Trait for LLM providers.
///
/// Implementations should be stateless and thread-safe. The provider is responsible
/// for making API calls and returning the model's text response.
#[async_trait]
pub trait LlmProvider: Send + Sync + fmt::Debug {
    /// Send a prompt to the LLM and get a text response.
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;

    /// Get the provider name (e.g., "gemini", "fake").
    fn provider_name(&self) -> &'static str;

    /// Get the model name (e.g., "gemini-2.0-flash").
    fn model_name(&self) -> &str;
}

/// Build the provider described by `config`.
pub fn create_provider(config: &GeneratorConfig) -> Result<Box<dyn LlmProvider>, LlmError> {
    match config.provider {
        ProviderKind::Fake => Ok(Box::new(FakeProvider::default())),
        ProviderKind::Gemini => {
            let api_key = config
                .api_key
                .clone()
                .ok_or_else(|| LlmError::NotConfigured("GEMINI_API_KEY not set".to_string()))?;
            let provider = GeminiProvider::new(api_key, config.model.clone())
                .with_temperature(config.temperature)
                .with_request_timeout(config.timeout)?;
            Ok(Box::new(provider))
        }
    }
}
