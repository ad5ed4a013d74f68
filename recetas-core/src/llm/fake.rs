//! Fake LLM provider for testing and offline development.
//!
//! This provider returns deterministic responses based on prompt matching,
//! allowing tests to run without network access or API costs.

use super::{LlmError, LlmProvider};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Duration;

/// A well-formed recipe in the layout the parser expects.
pub const SAMPLE_RECIPE: &str = "**Título:** Arroz con pollo sencillo
**Ingredientes:**
- 2 tazas de arroz
- 500 g de pollo en trozos
- 1 cebolla picada
- Sal al gusto
**Instrucciones:**
1. Dorar el pollo en una olla con un poco de aceite.
2. Añadir la cebolla y sofreír hasta que esté transparente.
3. Incorporar el arroz y 4 tazas de agua con sal.
4. Cocinar a fuego lento 20 minutos y servir.";

/// A fake LLM provider for testing.
///
/// Responses are matched by checking if the prompt contains a registered substring.
/// If no match is found, returns a default response or error.
#[derive(Debug)]
pub struct FakeProvider {
    /// Map of prompt substring -> response
    responses: RwLock<HashMap<String, String>>,
    /// Default response if no match found
    default_response: Option<String>,
    /// Simulated latency applied before answering
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl Default for FakeProvider {
    fn default() -> Self {
        Self::new().with_default_response(SAMPLE_RECIPE)
    }
}

impl FakeProvider {
    /// Create a new FakeProvider with no registered responses.
    pub fn new() -> Self {
        Self {
            responses: RwLock::new(HashMap::new()),
            default_response: None,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a FakeProvider that returns a specific response for prompts containing a substring.
    pub fn with_response(prompt_contains: &str, response: &str) -> Self {
        let provider = Self::new();
        provider.add_response(prompt_contains, response);
        provider
    }

    /// Add a response for prompts containing a specific substring.
    pub fn add_response(&self, prompt_contains: &str, response: &str) {
        let mut responses = self
            .responses
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        responses.insert(prompt_contains.to_string(), response.to_string());
    }

    /// Set the default response when no pattern matches.
    pub fn with_default_response(mut self, response: &str) -> Self {
        self.default_response = Some(response.to_string());
        self
    }

    /// Sleep for `delay` before every answer.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of times `complete` has been called.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for FakeProvider {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        // Find first matching pattern (case-insensitive)
        let prompt_lower = prompt.to_lowercase();
        let matched = {
            let responses = self
                .responses
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            responses
                .iter()
                .find(|(pattern, _)| prompt_lower.contains(&pattern.to_lowercase()))
                .map(|(_, response)| response.clone())
        };

        if let Some(response) = matched {
            return Ok(response);
        }

        match &self.default_response {
            Some(response) => Ok(response.clone()),
            None => Err(LlmError::RequestFailed(format!(
                "FakeProvider: No response configured for prompt (first 100 chars): {}",
                prompt.chars().take(100).collect::<String>()
            ))),
        }
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_recipe;

    #[tokio::test]
    async fn test_fake_provider_matching() {
        let provider = FakeProvider::with_response("pollo", "receta de pollo");
        let result = provider.complete("Genera algo con pollo").await.unwrap();
        assert_eq!(result, "receta de pollo");
    }

    #[tokio::test]
    async fn test_fake_provider_case_insensitive() {
        let provider = FakeProvider::with_response("POLLO", "receta");
        let result = provider.complete("pollo asado").await.unwrap();
        assert_eq!(result, "receta");
    }

    #[tokio::test]
    async fn test_fake_provider_no_match() {
        let provider = FakeProvider::new();
        let result = provider.complete("random prompt").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_default_provider_returns_sample_recipe() {
        let provider = FakeProvider::default();
        let text = provider.complete("anything").await.unwrap();
        let draft = parse_recipe(&text);
        assert_eq!(draft.title, "Arroz con pollo sencillo");
        assert_eq!(draft.ingredients.len(), 4);
        assert_eq!(draft.instructions.len(), 4);
    }

    #[tokio::test]
    async fn test_call_count() {
        let provider = FakeProvider::default();
        assert_eq!(provider.call_count(), 0);
        provider.complete("a").await.unwrap();
        provider.complete("b").await.unwrap();
        assert_eq!(provider.call_count(), 2);
    }
}
