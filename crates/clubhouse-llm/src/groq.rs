//! Groq Provider Implementation
//!
//! Groq serves open models through an OpenAI-compatible chat completions API
//! with a free tier, which makes it the default backend.
//!
//! # Examples
//!
//! ```no_run
//! use clubhouse_llm::GroqProvider;
//! use std::time::Duration;
//!
//! let provider = GroqProvider::new("gsk_...", "llama-3.3-70b-versatile", Duration::from_secs(30)).unwrap();
//! ```

use crate::{http, LlmError};
use async_trait::async_trait;
use clubhouse_domain::{GenerationRequest, LlmProvider};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Groq API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1";

/// Default model
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Groq chat completions provider
pub struct GroqProvider {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

/// Request body for the chat completions API
#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Response from the chat completions API
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

impl GroqProvider {
    /// Create a new Groq provider against the public endpoint
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Result<Self, LlmError> {
        Self::with_endpoint(DEFAULT_ENDPOINT, api_key, model, timeout)
    }

    /// Create a provider against a custom OpenAI-compatible endpoint
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::Config("Groq API key is required (GROQ_API_KEY)".to_string()));
        }

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
            client: http::client(timeout)?,
        })
    }

    /// Model name in use
    pub fn model(&self) -> &str {
        &self.model
    }

    pub(crate) fn build_body<'a>(&'a self, request: &'a GenerationRequest) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if !request.system_prompt.is_empty() {
            messages.push(ChatMessage {
                role: "system",
                content: &request.system_prompt,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.user_prompt,
        });

        ChatRequest {
            model: &self.model,
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

/// Pull the first choice's text out of a chat completions response
pub(crate) fn parse_response(body: &str) -> Result<String, LlmError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| LlmError::InvalidResponse("Response contained no message content".to_string()))
}

#[async_trait]
impl LlmProvider for GroqProvider {
    type Error = LlmError;

    async fn generate(&self, request: &GenerationRequest) -> Result<String, Self::Error> {
        let url = format!("{}/chat/completions", self.endpoint);
        let builder = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.build_body(request));

        let body = http::send(builder, &self.model).await?;
        parse_response(&body)
    }

    fn name(&self) -> &str {
        "groq"
    }
}
