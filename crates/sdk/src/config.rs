//! Configuration types for the Jobpilot SDK.

use std::time::Duration;
use url::Url;

/// Default base URL of the scheduling API.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api/v1";

/// Default DashScope text-generation endpoint.
pub const DEFAULT_REASONING_ENDPOINT: &str =
    "https://dashscope.aliyuncs.com/api/v1/services/aigc/text-generation/generation";

/// Default text-generation model.
pub const DEFAULT_REASONING_MODEL: &str = "qwen-max";

/// Configuration for the scheduling API client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the scheduling API; endpoints are appended verbatim.
    pub base_url: Url,
    /// Bearer token sent with every request.
    pub auth_token: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a new configuration with the given base URL.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            auth_token: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Configuration for the text-generation service client.
#[derive(Debug, Clone)]
pub struct ReasoningConfig {
    /// API key; without one the client answers with a fixed notice.
    pub api_key: Option<String>,
    /// Full URL of the generation endpoint.
    pub endpoint: Url,
    /// Model name.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Optional cap on generated tokens.
    pub max_tokens: Option<u32>,
    /// Request timeout.
    pub timeout: Duration,
}

impl ReasoningConfig {
    /// Create a new configuration pointing at the given endpoint.
    pub fn new(endpoint: Url) -> Self {
        Self {
            api_key: None,
            endpoint,
            model: DEFAULT_REASONING_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: None,
            timeout: Duration::from_secs(60),
        }
    }

    /// Whether a usable API key is present.
    pub fn is_configured(&self) -> bool {
        self.api_key
            .as_deref()
            .map(|key| !key.trim().is_empty())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_defaults() {
        let url = Url::parse(DEFAULT_API_BASE_URL).unwrap();
        let config = ClientConfig::new(url.clone());

        assert_eq!(config.base_url, url);
        assert!(config.auth_token.is_none());
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_reasoning_config_defaults() {
        let config = ReasoningConfig::new(Url::parse(DEFAULT_REASONING_ENDPOINT).unwrap());

        assert_eq!(config.model, "qwen-max");
        assert_eq!(config.temperature, 0.7);
        assert!(config.max_tokens.is_none());
        assert!(!config.is_configured());
    }

    #[test]
    fn test_blank_api_key_is_not_configured() {
        let mut config = ReasoningConfig::new(Url::parse(DEFAULT_REASONING_ENDPOINT).unwrap());
        config.api_key = Some("   ".to_string());
        assert!(!config.is_configured());

        config.api_key = Some("sk-test".to_string());
        assert!(config.is_configured());
    }
}
