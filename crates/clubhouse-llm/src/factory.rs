//! Provider selection from configuration

use crate::{anthropic, groq, AnthropicProvider, GroqProvider, LlmError, MockProvider};
use clubhouse_domain::LlmProvider;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Which backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Groq (free tier)
    #[default]
    Groq,
    /// Anthropic Messages API
    Anthropic,
    /// Offline mock
    Mock,
}

impl ProviderKind {
    /// Get the provider name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Groq => "groq",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Mock => "mock",
        }
    }

    /// Model used when none is configured
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Groq => groq::DEFAULT_MODEL,
            ProviderKind::Anthropic => anthropic::DEFAULT_MODEL,
            ProviderKind::Mock => "mock",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "groq" => Ok(ProviderKind::Groq),
            "anthropic" => Ok(ProviderKind::Anthropic),
            "mock" => Ok(ProviderKind::Mock),
            other => Err(LlmError::Config(format!("Unknown LLM provider: {}", other))),
        }
    }
}

/// LLM configuration section
///
/// # Examples
///
/// ```
/// use clubhouse_llm::{LlmSettings, ProviderKind};
///
/// let settings = LlmSettings::default();
/// assert_eq!(settings.provider, ProviderKind::Groq);
/// assert_eq!(settings.effective_model(), "llama-3.3-70b-versatile");
/// assert_eq!(settings.temperature, 0.3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Backend to use
    pub provider: ProviderKind,

    /// Model override; the provider's default when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// API key; normally supplied through the environment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Endpoint override, e.g. a proxy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Sampling temperature in `[0, 2]`
    pub temperature: f32,

    /// Upper bound on generated tokens
    pub max_tokens: u32,

    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Groq,
            model: None,
            api_key: None,
            endpoint: None,
            temperature: 0.3,
            max_tokens: 1000,
            request_timeout_secs: 30,
        }
    }
}

impl LlmSettings {
    /// Configured model, or the provider default
    pub fn effective_model(&self) -> &str {
        self.model.as_deref().unwrap_or_else(|| self.provider.default_model())
    }

    /// Get the request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate value ranges (the API key is checked by [`build_provider`])
    pub fn validate(&self) -> Result<(), LlmError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(LlmError::Config(format!(
                "temperature must be within [0, 2], got {}",
                self.temperature
            )));
        }
        if self.max_tokens == 0 {
            return Err(LlmError::Config("max_tokens must be greater than 0".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(LlmError::Config("request_timeout_secs must be greater than 0".to_string()));
        }
        Ok(())
    }
}

/// Build the configured provider
///
/// A hosted provider without an API key is a configuration error.
///
/// # Examples
///
/// ```
/// use clubhouse_domain::LlmProvider;
/// use clubhouse_llm::{build_provider, LlmSettings, ProviderKind};
///
/// let settings = LlmSettings { provider: ProviderKind::Mock, ..Default::default() };
/// let provider = build_provider(&settings).unwrap();
/// assert_eq!(provider.name(), "mock");
///
/// let missing_key = LlmSettings { provider: ProviderKind::Groq, api_key: None, ..Default::default() };
/// assert!(build_provider(&missing_key).is_err());
/// ```
pub fn build_provider(settings: &LlmSettings) -> Result<Box<dyn LlmProvider<Error = LlmError>>, LlmError> {
    settings.validate()?;
    let model = settings.effective_model();
    let timeout = settings.request_timeout();
    let api_key = settings.api_key.clone().unwrap_or_default();

    let provider: Box<dyn LlmProvider<Error = LlmError>> = match settings.provider {
        ProviderKind::Groq => Box::new(match &settings.endpoint {
            Some(endpoint) => GroqProvider::with_endpoint(endpoint.as_str(), api_key, model, timeout)?,
            None => GroqProvider::new(api_key, model, timeout)?,
        }),
        ProviderKind::Anthropic => Box::new(match &settings.endpoint {
            Some(endpoint) => AnthropicProvider::with_endpoint(endpoint.as_str(), api_key, model, timeout)?,
            None => AnthropicProvider::new(api_key, model, timeout)?,
        }),
        ProviderKind::Mock => Box::new(MockProvider::new(
            "I'm running in offline mode, so this is a placeholder answer. [Source 1]",
        )),
    };

    tracing::info!(provider = settings.provider.as_str(), model, "LLM provider ready");
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_parsing() {
        assert_eq!("Groq".parse::<ProviderKind>().unwrap(), ProviderKind::Groq);
        assert_eq!(" anthropic ".parse::<ProviderKind>().unwrap(), ProviderKind::Anthropic);
        assert!("openai".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_effective_model_per_provider() {
        let settings = LlmSettings {
            provider: ProviderKind::Anthropic,
            ..Default::default()
        };
        assert_eq!(settings.effective_model(), anthropic::DEFAULT_MODEL);

        let settings = LlmSettings {
            model: Some("llama-3.1-8b-instant".to_string()),
            ..Default::default()
        };
        assert_eq!(settings.effective_model(), "llama-3.1-8b-instant");
    }

    #[test]
    fn test_validate_ranges() {
        let hot = LlmSettings {
            temperature: 2.5,
            ..Default::default()
        };
        assert!(hot.validate().is_err());

        let mute = LlmSettings {
            max_tokens: 0,
            ..Default::default()
        };
        assert!(mute.validate().is_err());
        assert!(LlmSettings::default().validate().is_ok());
    }

    #[test]
    fn test_build_hosted_providers_with_keys() {
        let groq = LlmSettings {
            api_key: Some("gsk_test".to_string()),
            ..Default::default()
        };
        assert_eq!(build_provider(&groq).unwrap().name(), "groq");

        let anthropic = LlmSettings {
            provider: ProviderKind::Anthropic,
            api_key: Some("sk-ant-test".to_string()),
            endpoint: Some("http://localhost:9999".to_string()),
            ..Default::default()
        };
        assert_eq!(build_provider(&anthropic).unwrap().name(), "anthropic");
    }

    #[test]
    fn test_missing_key_rejected() {
        let settings = LlmSettings {
            provider: ProviderKind::Anthropic,
            ..Default::default()
        };
        assert!(matches!(build_provider(&settings), Err(LlmError::Config(_))));
    }

    #[test]
    fn test_settings_serde_round_trip() {
        let settings = LlmSettings {
            provider: ProviderKind::Mock,
            model: Some("m".to_string()),
            ..Default::default()
        };
        let text = serde_json::to_string(&settings).unwrap();
        let parsed: LlmSettings = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }
}
