//! Main client for the scheduling API.

use crate::api::{JobsApi, StatsApi};
use crate::config::{ClientConfig, DEFAULT_API_BASE_URL};
use crate::error::SdkResult;
use crate::transport::{HttpMethod, HttpTransport};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Client for the Go-Job scheduling REST API.
#[derive(Debug, Clone)]
pub struct SchedulerClient {
    config: Arc<ClientConfig>,
    http: HttpTransport,
}

impl SchedulerClient {
    /// Create a new client builder.
    pub fn builder() -> SchedulerClientBuilder {
        SchedulerClientBuilder::new()
    }

    /// Create a client from configuration.
    pub fn from_config(config: ClientConfig) -> SdkResult<Self> {
        let config = Arc::new(config);
        let http = HttpTransport::new(config.clone())?;

        Ok(Self { config, http })
    }

    /// Base URL every endpoint is appended to.
    pub fn base_url(&self) -> &Url {
        &self.config.base_url
    }

    /// Issue a raw request against the API.
    pub async fn request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        data: Option<&Value>,
    ) -> SdkResult<Value> {
        self.http.request(method, endpoint, data).await
    }

    /// Get the jobs API.
    pub fn jobs(&self) -> JobsApi<'_> {
        JobsApi::new(self)
    }

    /// Get the stats API.
    pub fn stats(&self) -> StatsApi<'_> {
        StatsApi::new(self)
    }
}

/// Builder for creating a SchedulerClient.
pub struct SchedulerClientBuilder {
    base_url: Option<String>,
    auth_token: Option<String>,
    timeout: Duration,
}

impl SchedulerClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            base_url: None,
            auth_token: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Set the base URL of the scheduling API.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the bearer token.
    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client. Falls back to the default base URL.
    pub fn build(self) -> SdkResult<SchedulerClient> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let config = ClientConfig {
            base_url: Url::parse(&base_url)?,
            auth_token: self.auth_token.filter(|t| !t.is_empty()),
            timeout: self.timeout,
        };

        SchedulerClient::from_config(config)
    }
}

impl Default for SchedulerClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SdkError;

    #[test]
    fn test_builder_defaults() {
        let client = SchedulerClient::builder().build().unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8080/api/v1");
    }

    #[test]
    fn test_builder_rejects_bad_url() {
        let result = SchedulerClient::builder().base_url("not a url").build();
        assert!(matches!(result, Err(SdkError::InvalidUrl(_))));
    }
}
