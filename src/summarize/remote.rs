//! Remote chat-completion client used for both the map and reduce phases.
//!
//! The service speaks the common chat-completions shape: a POST with
//! `{model, messages, temperature, max_tokens}` answered by
//! `{choices: [{message: {content}}]}`. One request per call, a bounded
//! timeout, and no retries; any failure is reported to the caller, which
//! degrades to the local fallback summarizer.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

/// Bound on each outbound summarization request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Errors surfaced by the remote summarization client.
#[derive(Debug, Error)]
pub enum ChatClientError {
    /// The service could not be reached (connect error, timeout).
    #[error("Summarization service unreachable: {0}")]
    Unreachable(String),
    /// The service answered with a non-success status.
    #[error("Failed to generate summary: {0}")]
    GenerationFailed(String),
    /// The response body could not be parsed or carried no content.
    #[error("Malformed service response: {0}")]
    InvalidResponse(String),
}

/// One chat-completion request as issued by the orchestrator.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Model identifier understood by the service.
    pub model: String,
    /// User-role prompt content.
    pub prompt: String,
    /// Sampling temperature for this call.
    pub temperature: f32,
    /// Completion token ceiling for this call.
    pub max_tokens: u32,
}

/// Interface implemented by chat-completion backends.
#[async_trait]
pub trait ChatCompletionClient: Send + Sync {
    /// Issue one completion request and return the assistant's text.
    async fn complete(&self, request: ChatRequest) -> Result<String, ChatClientError>;
}

/// Reqwest-backed client for a hosted chat-completions endpoint.
pub struct HttpChatClient {
    http: Client,
    endpoint: String,
    api_key: String,
}

impl HttpChatClient {
    /// Construct a client for the given endpoint and bearer credential.
    pub fn new(endpoint: String, api_key: String) -> Self {
        let http = Client::builder()
            .user_agent("docsum/summarizer")
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to construct reqwest::Client for summarization");
        Self {
            http,
            endpoint,
            api_key,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[async_trait]
impl ChatCompletionClient for HttpChatClient {
    async fn complete(&self, request: ChatRequest) -> Result<String, ChatClientError> {
        let payload = json!({
            "model": request.model,
            "messages": [{ "role": "user", "content": request.prompt }],
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        });

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                ChatClientError::Unreachable(format!(
                    "failed to reach {}: {error}",
                    self.endpoint
                ))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ChatClientError::GenerationFailed(format!(
                "service returned {status}: {body}"
            )));
        }

        let body: ChatResponse = response.json().await.map_err(|error| {
            ChatClientError::InvalidResponse(format!("failed to decode response: {error}"))
        })?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(ChatClientError::InvalidResponse(
                "response carried no summary content".into(),
            ));
        }

        Ok(content.trim().to_string())
    }
}
