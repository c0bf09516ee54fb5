//! Client for the text-generation service used to analyze scheduling data.
//!
//! The [`Reasoner`] boundary never fails: whatever happens, callers get a
//! string they can embed in a response.

use crate::config::ReasoningConfig;
use crate::error::{SdkError, SdkResult};
use async_trait::async_trait;
use jobpilot_core::types::AnalysisContext;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Role instruction sent ahead of every question.
pub const SYSTEM_PROMPT: &str = "You are a professional AI assistant for a job scheduling system, \
specializing in analyzing and optimizing the execution of scheduled jobs. \
Provide professional, detailed analysis and recommendations.";

/// Returned instead of calling out when no API key is configured.
pub const NOT_CONFIGURED_MESSAGE: &str = "DashScope API key is not configured";

/// Something that turns a question plus structured context into free text.
#[async_trait]
pub trait Reasoner: Send + Sync {
    /// Always returns text; failures are described in the returned string.
    async fn analyze(&self, prompt: &str, context: Option<&AnalysisContext>) -> String;
}

/// A chat message in the generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default)]
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Build the system + user exchange for a question.
pub fn build_messages(prompt: &str, context: Option<&AnalysisContext>) -> SdkResult<Vec<ChatMessage>> {
    let serialized = match context {
        Some(context) => serde_json::to_string(context)?,
        None => String::new(),
    };

    Ok(vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(format!("Context: {}\n\nQuestion: {}", serialized, prompt)),
    ])
}

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    model: &'a str,
    input: GenerationInput<'a>,
    parameters: GenerationParameters,
}

#[derive(Debug, Serialize)]
struct GenerationInput<'a> {
    messages: &'a [ChatMessage],
}

#[derive(Debug, Serialize)]
struct GenerationParameters {
    temperature: f32,
    result_format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    output: Option<GenerationOutput>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct GenerationOutput {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    choices: Vec<GenerationChoice>,
}

#[derive(Debug, Deserialize)]
struct GenerationChoice {
    message: ChatMessage,
}

/// DashScope text-generation client.
#[derive(Debug, Clone)]
pub struct DashScopeClient {
    client: Client,
    config: Arc<ReasoningConfig>,
}

impl DashScopeClient {
    pub fn new(config: ReasoningConfig) -> SdkResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ReasoningConfig {
        &self.config
    }

    /// Send one generation request and return the reply text.
    pub async fn generate(&self, messages: &[ChatMessage]) -> SdkResult<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| SdkError::Config("reasoning API key is not configured".to_string()))?;

        let request = GenerationRequest {
            model: &self.config.model,
            input: GenerationInput { messages },
            parameters: GenerationParameters {
                temperature: self.config.temperature,
                result_format: "message",
                max_tokens: self.config.max_tokens,
            },
        };

        debug!(model = %self.config.model, endpoint = %self.config.endpoint, "Generation request");

        let response = self
            .client
            .post(self.config.endpoint.clone())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(SdkError::from_transport)?;

        let status = response.status();
        let body = response.text().await.map_err(SdkError::from_transport)?;

        if !status.is_success() {
            return Err(service_error(status.as_u16(), &body));
        }

        let parsed: GenerationResponse = serde_json::from_str(&body)?;
        let output = match parsed.output {
            Some(output) => output,
            None => {
                return Err(SdkError::Api {
                    status: status.as_u16(),
                    message: parsed
                        .message
                        .unwrap_or_else(|| "response carried no output".to_string()),
                    details: parsed.code,
                })
            }
        };

        let from_choice = output
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .filter(|content| !content.is_empty());

        from_choice
            .or(output.text)
            .ok_or_else(|| SdkError::UnexpectedResponse("generation output had no text".to_string()))
    }
}

/// Map a non-2xx reply, which DashScope shapes as `{code, message}`.
fn service_error(status: u16, body: &str) -> SdkError {
    #[derive(Deserialize)]
    struct ServiceError {
        #[serde(default)]
        code: Option<String>,
        message: String,
    }

    match serde_json::from_str::<ServiceError>(body) {
        Ok(err) => SdkError::Api {
            status,
            message: err.message,
            details: err.code,
        },
        Err(_) => SdkError::from_response(status, body),
    }
}

#[async_trait]
impl Reasoner for DashScopeClient {
    async fn analyze(&self, prompt: &str, context: Option<&AnalysisContext>) -> String {
        if !self.config.is_configured() {
            return NOT_CONFIGURED_MESSAGE.to_string();
        }

        let messages = match build_messages(prompt, context) {
            Ok(messages) => messages,
            Err(e) => return format!("AI analysis error: {}", e),
        };

        match self.generate(&messages).await {
            Ok(text) => text,
            Err(SdkError::Api { status, message, .. }) => {
                warn!(status = status, message = %message, "Reasoning service reported a failure");
                format!("AI analysis failed: {}", message)
            }
            Err(e) => {
                error!(error = %e, "Reasoning service call failed");
                format!("AI analysis error: {}", e)
            }
        }
    }
}
