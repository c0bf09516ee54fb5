// Startup configuration for the MCP server

use anyhow::{Context, Result};
use jobpilot_sdk::config::{DEFAULT_API_BASE_URL, DEFAULT_REASONING_ENDPOINT, DEFAULT_REASONING_MODEL};
use jobpilot_sdk::{ClientConfig, ReasoningConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct McpConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub reasoning: ReasoningSection,
}

/// `[api]` section: the scheduling service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub auth_token: Option<String>,

    #[serde(default = "default_api_timeout")]
    pub timeout_secs: u64,
}

/// `[reasoning]` section: the text-generation service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningSection {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default)]
    pub max_tokens: Option<u32>,

    #[serde(default = "default_reasoning_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_api_timeout() -> u64 {
    30
}

fn default_endpoint() -> String {
    DEFAULT_REASONING_ENDPOINT.to_string()
}

fn default_model() -> String {
    DEFAULT_REASONING_MODEL.to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_reasoning_timeout() -> u64 {
    60
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth_token: None,
            timeout_secs: default_api_timeout(),
        }
    }
}

impl Default for ReasoningSection {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_endpoint(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: None,
            timeout_secs: default_reasoning_timeout(),
        }
    }
}

/// Values taken from command-line flags or their environment variables.
/// Empty strings are treated as absent.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_url: Option<String>,
    pub auth_token: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
}

impl McpConfig {
    /// Load configuration from a TOML file, falling back to defaults when
    /// no path is given or the file does not exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => return Ok(Self::default()),
        };

        if !path.exists() {
            tracing::info!(path = %path.display(), "Configuration file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file {}", path.display()))
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(url) = non_empty(overrides.api_url) {
            self.api.base_url = url;
        }
        if let Some(token) = non_empty(overrides.auth_token) {
            self.api.auth_token = Some(token);
        }
        if let Some(key) = non_empty(overrides.api_key) {
            self.reasoning.api_key = Some(key);
        }
        if let Some(model) = non_empty(overrides.model) {
            self.reasoning.model = model;
        }
    }

    pub fn client_config(&self) -> Result<ClientConfig> {
        let base_url = Url::parse(self.api.base_url.trim())
            .with_context(|| format!("Invalid API base URL '{}'", self.api.base_url))?;

        let mut config = ClientConfig::new(base_url);
        config.auth_token = non_empty(self.api.auth_token.clone());
        config.timeout = Duration::from_secs(self.api.timeout_secs);
        Ok(config)
    }

    pub fn reasoning_config(&self) -> Result<ReasoningConfig> {
        let endpoint = Url::parse(self.reasoning.endpoint.trim()).with_context(|| {
            format!("Invalid reasoning endpoint '{}'", self.reasoning.endpoint)
        })?;

        let mut config = ReasoningConfig::new(endpoint);
        config.api_key = non_empty(self.reasoning.api_key.clone());
        config.model = self.reasoning.model.clone();
        config.temperature = self.reasoning.temperature;
        config.max_tokens = self.reasoning.max_tokens;
        config.timeout = Duration::from_secs(self.reasoning.timeout_secs);
        Ok(config)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
