// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Hosted answer generation
//!
//! Sends an OpenAI-style chat-completion request (fixed system instruction
//! plus the assembled prompt) to the hosted inference endpoint and returns
//! the answer text.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";

/// Output token budget for a single answer.
pub const MAX_ANSWER_TOKENS: u32 = 400;

/// Sampling temperature for answer generation.
pub const TEMPERATURE: f32 = 0.3;

#[derive(Debug, Clone, Error)]
pub enum GenerateError {
    #[error("Generation request failed: {0}")]
    Http(String),

    #[error("Generation endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed completion payload: {0}")]
    Malformed(String),
}

/// Produces a natural-language answer for an assembled prompt.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}

/// Generator backed by a hosted chat-completion endpoint.
pub struct HostedGenerator {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    system_prompt: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// Pull the answer text out of a parsed completion.
fn first_choice_content(completion: ChatCompletionResponse) -> Result<String, GenerateError> {
    completion
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| GenerateError::Malformed("no choices in completion".to_string()))
}

impl HostedGenerator {
    pub fn new(api_key: &str, model: &str, system_prompt: &str) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_key, model, system_prompt)
    }

    /// Point the generator at a non-default endpoint (used by tests).
    pub fn with_base_url(base_url: &str, api_key: &str, model: &str, system_prompt: &str) -> Self {
        let client = Client::builder()
            // Generation is the slowest upstream call; allow well over the
            // embedding/query timeouts.
            .timeout(Duration::from_secs(110))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            system_prompt: system_prompt.to_string(),
        }
    }
}

#[async_trait]
impl AnswerGenerator for HostedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let url = format!("{}/models/{}/v1/chat/completions", self.base_url, self.model);
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": self.system_prompt },
                { "role": "user", "content": prompt },
            ],
            "max_tokens": MAX_ANSWER_TOKENS,
            "temperature": TEMPERATURE,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerateError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerateError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let completion = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| GenerateError::Malformed(e.to_string()))?;

        first_choice_content(completion)
    }
}
