//! HTTP transport layer for the scheduling API.

use crate::config::ClientConfig;
use crate::error::{SdkError, SdkResult};
use reqwest::{header, Client};
use serde_json::Value;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, error};
use url::Url;

/// HTTP methods the scheduling API client issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            _ => Err(SdkError::UnsupportedMethod(s.to_string())),
        }
    }
}

/// HTTP transport for making API requests.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: Arc<ClientConfig>,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given configuration.
    pub fn new(config: Arc<ClientConfig>) -> SdkResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        // Add bearer token if present
        if let Some(token) = config.auth_token.as_deref().filter(|t| !t.is_empty()) {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|_| SdkError::Config("Invalid auth token format".to_string()))?,
            );
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    /// Append an endpoint to the configured base URL.
    ///
    /// Unlike `Url::join`, this keeps any path prefix on the base URL.
    fn build_url(&self, endpoint: &str) -> SdkResult<Url> {
        let base = self.config.base_url.as_str().trim_end_matches('/');
        let endpoint = endpoint.trim_start_matches('/');
        Ok(Url::parse(&format!("{}/{}", base, endpoint))?)
    }

    /// Issue a request and decode the JSON response.
    ///
    /// `data` is sent as query parameters for GET and as a JSON body
    /// otherwise. Every failure is logged here and returned as a value.
    pub async fn request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        data: Option<&Value>,
    ) -> SdkResult<Value> {
        let result = self.execute(method, endpoint, data).await;
        if let Err(e) = &result {
            error!(method = %method, endpoint = endpoint, error = %e, "API request failed");
        }
        result
    }

    async fn execute(
        &self,
        method: HttpMethod,
        endpoint: &str,
        data: Option<&Value>,
    ) -> SdkResult<Value> {
        let url = self.build_url(endpoint)?;
        debug!(method = %method, url = %url, "API request");

        let mut request = match method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
            HttpMethod::Put => self.client.put(url),
            HttpMethod::Delete => self.client.delete(url),
        };

        if let Some(data) = data {
            request = match method {
                HttpMethod::Get => request.query(&query_pairs(data)?),
                _ => request.json(data),
            };
        }

        let response = request.send().await.map_err(SdkError::from_transport)?;
        let status = response.status();
        let body = response.text().await.map_err(SdkError::from_transport)?;

        if !status.is_success() {
            return Err(SdkError::from_response(status.as_u16(), &body));
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Flatten a JSON object into query parameters. Null values are dropped.
fn query_pairs(data: &Value) -> SdkResult<Vec<(String, String)>> {
    let object = data.as_object().ok_or_else(|| {
        SdkError::InvalidRequest("query parameters must be a JSON object".to_string())
    })?;

    Ok(object
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| {
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), rendered)
        })
        .collect())
}
