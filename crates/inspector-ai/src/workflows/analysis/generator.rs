use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::GeneratorConfig;

/// Seam to the external text-generation capability. Implementations return
/// the raw analysis text for a system/user prompt pair or a typed failure.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, system_prompt: &str, user_prompt: &str)
        -> Result<String, GeneratorError>;
}

#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("OPENAI_API_KEY must be set to call the generation service")]
    MissingApiKey,
    #[error("generation request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("generation service returned {status}: {message}")]
    Upstream { status: StatusCode, message: String },
    #[error("generation response was not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("generation service returned no completion")]
    EmptyCompletion,
}

/// Chat-completions client for the OpenAI-compatible generation endpoint.
///
/// Every request carries the configured deadline; transient failures
/// (timeouts, connection errors, 429, 5xx) are retried with capped
/// exponential backoff up to `max_retries` additional attempts.
pub struct OpenAiGenerator {
    config: GeneratorConfig,
    api_key: String,
    http: reqwest::Client,
}

impl OpenAiGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self, GeneratorError> {
        let api_key = config.api_key.clone().ok_or(GeneratorError::MissingApiKey)?;
        let http = reqwest::Client::builder()
            .user_agent("inspector-ai")
            .build()?;

        Ok(Self {
            config,
            api_key,
            http,
        })
    }

    async fn send_chat(&self, request: &ChatRequest<'_>) -> Result<String, GeneratorError> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .timeout(self.config.request_timeout)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = upstream_message(response).await;
            return Err(GeneratorError::Upstream { status, message });
        }

        let body = response.text().await?;
        let completion: ChatResponse = serde_json::from_str(&body)?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(GeneratorError::EmptyCompletion)
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, GeneratorError> {
        let request = ChatRequest {
            model: &self.config.model,
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
        };

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.send_chat(&request).await {
                Ok(text) => return Ok(text),
                Err(error) if attempt <= self.config.max_retries && should_retry(&error) => {
                    let delay = backoff_delay(
                        self.config.initial_backoff,
                        self.config.max_backoff,
                        attempt - 1,
                    );
                    warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "generation request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(error) => return Err(error),
            }
        }
    }
}

fn should_retry(error: &GeneratorError) -> bool {
    match error {
        GeneratorError::Request(err) => err.is_timeout() || err.is_connect(),
        GeneratorError::Upstream { status, .. } => {
            *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
        }
        GeneratorError::MissingApiKey
        | GeneratorError::Decode(_)
        | GeneratorError::EmptyCompletion => false,
    }
}

fn backoff_delay(initial: Duration, max: Duration, exponent: u32) -> Duration {
    let multiplier = 1u64.checked_shl(exponent).unwrap_or(u64::MAX);
    let delay_ms = (initial.as_millis() as u64).saturating_mul(multiplier);
    Duration::from_millis(delay_ms.min(max.as_millis() as u64))
}

async fn upstream_message(response: reqwest::Response) -> String {
    let body = match response.text().await {
        Ok(body) => body,
        Err(_) => return "<unreadable error body>".to_string(),
    };

    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(&body) {
        if let Some(message) = envelope.error.message {
            return message;
        }
    }

    body.chars().take(2_048).collect()
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorObject,
}

#[derive(Debug, Deserialize)]
struct ErrorObject {
    message: Option<String>,
}
