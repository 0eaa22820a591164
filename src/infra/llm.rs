//! Chat-completion client for the recommendation proxy.
//!
//! The adapter owns transport details only: request shape, timeout,
//! and HTTP error mapping. Prompt assembly and grounding live in the
//! recommendation service.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::{LLM_MAX_TOKENS, LLM_TEMPERATURE, LLM_TIMEOUT};
use crate::errors::{AppError, AppResult};

#[cfg(feature = "test-utils")]
use mockall::automock;

/// Result of a completion call
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub tokens_used: i64,
}

/// Boundary to the external text-generation service.
#[cfg_attr(feature = "test-utils", automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> AppResult<Completion>;
}

/// OpenAI-compatible chat-completions adapter
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    /// Build the adapter with a bounded request timeout.
    ///
    /// # Errors
    /// Returns an error when the HTTP client cannot be constructed.
    pub fn new(api_key: String, base_url: String, model: String) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(LLM_TIMEOUT)
            .build()
            .map_err(|e| AppError::internal(format!("HTTP client build failed: {}", e)))?;
        Ok(Self {
            client,
            base_url,
            api_key,
            model,
        })
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct ChatUsage {
    total_tokens: i64,
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> AppResult<Completion> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            max_tokens: LLM_MAX_TOKENS,
            temperature: LLM_TEMPERATURE,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::upstream("Completion request timed out")
                } else {
                    AppError::upstream(format!("Completion request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::upstream(format!(
                "Completion service returned {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::upstream(format!("Malformed completion response: {}", e)))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AppError::upstream("Completion response had no choices"))?;

        Ok(Completion {
            text,
            tokens_used: parsed.usage.map(|u| u.total_tokens).unwrap_or(0),
        })
    }
}
