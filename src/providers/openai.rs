use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::Provider;
use crate::errors::ProviderError;

/// Fallback when an error body carries no usable message
const UNKNOWN_API_ERROR: &str = "Unknown API error";

/// Client for OpenAI-compatible chat-completion endpoints
///
/// The endpoint and key travel with each call, because they come from
/// user settings that may change between calls.
#[derive(Debug, Clone)]
pub struct OpenAI {
    /// HTTP client for API requests
    client: Client,
    /// Value of the `HTTP-Referer` header, if any
    referer: Option<String>,
}

/// Chat-completion request body
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OpenAIRequest {
    /// The model to use
    pub model: String,

    /// The messages for the conversation
    pub messages: Vec<OpenAIMessage>,

    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Maximum number of tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// Chat message format
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OpenAIMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,

    /// Content of the message; some providers send `null`
    #[serde(default)]
    pub content: Option<String>,
}

/// Chat-completion response
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIResponse {
    /// Candidate completions
    #[serde(default)]
    pub choices: Vec<OpenAIChoice>,

    /// Token usage information
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

/// One candidate completion
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIChoice {
    /// The generated message
    pub message: OpenAIMessage,
}

/// Token usage information
#[derive(Debug, Clone, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// A request bound to the endpoint and credentials it is sent with
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionCall {
    /// Full chat-completion URL
    pub endpoint: String,
    /// Bearer token
    pub api_key: String,
    /// Client-identifying title sent as `X-Title`
    pub title: String,
    /// Request body
    pub body: OpenAIRequest,
}

impl OpenAIRequest {
    /// Create a new request
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            temperature: None,
            max_tokens: None,
        }
    }

    /// Add a message to the request
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(OpenAIMessage {
            role: role.into(),
            content: Some(content.into()),
        });
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the output budget
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Content of the first user message
    pub fn user_prompt(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == "user")
            .and_then(|m| m.content.as_deref())
    }
}

impl OpenAI {
    /// Create a new client with the given request timeout
    pub fn new(timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                warn!(
                    "Failed to build HTTP client with a {}s timeout, using defaults: {}",
                    timeout_secs, e
                );
                Client::new()
            });

        Self {
            client,
            referer: None,
        }
    }

    /// Send an `HTTP-Referer` header with every request
    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    /// Send a chat-completion request
    pub async fn send(&self, call: CompletionCall) -> Result<OpenAIResponse, ProviderError> {
        debug!(
            "POST {} (model: {}, title: {})",
            call.endpoint, call.body.model, call.title
        );

        let mut builder = self
            .client
            .post(&call.endpoint)
            .header("Authorization", format!("Bearer {}", call.api_key))
            .header("Content-Type", "application/json")
            .header("X-Title", &call.title);

        if let Some(referer) = &self.referer {
            builder = builder.header("HTTP-Referer", referer);
        }

        let response = builder.json(&call.body).send().await.map_err(|e| {
            if e.is_builder() {
                ProviderError::RequestFailed(e.to_string())
            } else {
                ProviderError::ConnectionError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = extract_error_message(&error_text);
            error!("Chat-completion API error ({}): {}", status, message);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        response
            .json::<OpenAIResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl Provider for OpenAI {
    type Request = CompletionCall;
    type Response = OpenAIResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        self.send(request).await
    }

    fn extract_text(response: &Self::Response) -> Option<String> {
        extract_first_choice(response)
    }
}

/// Content of the first choice, `None` when there are no choices
pub fn extract_first_choice(response: &OpenAIResponse) -> Option<String> {
    response
        .choices
        .first()
        .map(|choice| choice.message.content.clone().unwrap_or_default())
}

/// Pull the server message out of an error body
///
/// Looks at `error.message`, then `message`; anything else yields a
/// generic fallback.
pub fn extract_error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return UNKNOWN_API_ERROR.to_string();
    };

    value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .or_else(|| value.get("message").and_then(|v| v.as_str()))
        .filter(|m| !m.is_empty())
        .unwrap_or(UNKNOWN_API_ERROR)
        .to_string()
}
