//! Generator configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use super::LlmError;

/// Default Gemini model.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Default sampling temperature. Recipes benefit from some variety.
pub const DEFAULT_TEMPERATURE: f32 = 0.9;

/// Default time to wait for the generator before giving up.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Which provider backs recipe generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Gemini,
    Fake,
}

impl FromStr for ProviderKind {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "fake" => Ok(Self::Fake),
            other => Err(LlmError::NotConfigured(format!(
                "Unknown provider: {}",
                other
            ))),
        }
    }
}

/// Generator configuration.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub provider: ProviderKind,
    /// API key for Gemini. Only required when `provider` is Gemini.
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    /// Upper bound on a single generation call.
    pub timeout: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Fake,
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from environment variables.
    ///
    /// - `RECETAS_GENERATOR`: "gemini" | "fake" (default: "fake")
    /// - `GEMINI_API_KEY`: required for gemini
    /// - `RECETAS_GENERATOR_MODEL`: model name (default: "gemini-2.0-flash")
    /// - `RECETAS_GENERATOR_TEMPERATURE`: sampling temperature (default: 0.9)
    /// - `RECETAS_GENERATOR_TIMEOUT_SECS`: per-call timeout (default: 30)
    pub fn from_env() -> Result<Self, LlmError> {
        let provider = env::var("RECETAS_GENERATOR")
            .ok()
            .map(|v| v.parse())
            .transpose()?
            .unwrap_or(ProviderKind::Fake);

        let api_key = env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty());

        let model =
            env::var("RECETAS_GENERATOR_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string());

        let temperature = parse_var("RECETAS_GENERATOR_TEMPERATURE", DEFAULT_TEMPERATURE)?;
        let timeout_secs = parse_var("RECETAS_GENERATOR_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;

        Ok(Self {
            provider,
            api_key,
            model,
            temperature,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, LlmError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| LlmError::NotConfigured(format!("{} has invalid value {:?}", name, raw))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_parsing() {
        assert_eq!("Gemini".parse::<ProviderKind>().unwrap(), ProviderKind::Gemini);
        assert_eq!(" fake ".parse::<ProviderKind>().unwrap(), ProviderKind::Fake);
        assert!("openai".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = GeneratorConfig::default();
        assert_eq!(config.provider, ProviderKind::Fake);
        assert_eq!(config.model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }
}
