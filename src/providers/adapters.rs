use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::CompletionProvider;
use crate::config::ProvidersConfig;
use crate::error::ApiError;

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
// Gemini exposes an OpenAI-compatible surface under v1beta.
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: usize,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Shared chat-completions wire call. All three backends speak the
/// OpenAI-compatible shape; only base URL and credentials differ.
#[derive(Clone)]
pub struct ChatCompletionsClient {
    client: Client,
    base_url: String,
    api_key: String,
    max_tokens: usize,
    temperature: f32,
}

impl ChatCompletionsClient {
    pub fn new(base_url: &str, api_key: String, config: &ProvidersConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_seconds))
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: base_url.to_string(),
            api_key,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    async fn chat(&self, provider: &str, prompt: &str, model: &str) -> Result<String, ApiError> {
        debug!("Chat completion via {} ({} chars prompt)", provider, prompt.len());

        let request = ChatCompletionRequest {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            stream: false,
        };

        let unavailable = |reason: String| ApiError::ProviderUnavailable {
            provider: provider.to_string(),
            reason,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| unavailable(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(unavailable(format!("API error ({}): {}", status, body)));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| unavailable(format!("Failed to parse response: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| unavailable("No choices returned".to_string()))
    }
}

pub struct OpenAiProvider {
    client: ChatCompletionsClient,
}

impl OpenAiProvider {
    pub fn new(config: &ProvidersConfig) -> Self {
        Self {
            client: ChatCompletionsClient::new(
                OPENAI_BASE_URL,
                config.openai.api_key.clone(),
                config,
            ),
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(&self, prompt: &str, model: &str) -> Result<String, ApiError> {
        self.client.chat("openai", prompt, model).await
    }
}

pub struct GroqProvider {
    client: ChatCompletionsClient,
}

impl GroqProvider {
    pub fn new(config: &ProvidersConfig) -> Self {
        Self {
            client: ChatCompletionsClient::new(GROQ_BASE_URL, config.groq.api_key.clone(), config),
        }
    }
}

#[async_trait]
impl CompletionProvider for GroqProvider {
    async fn complete(&self, prompt: &str, model: &str) -> Result<String, ApiError> {
        self.client.chat("groq", prompt, model).await
    }
}

pub struct GeminiProvider {
    client: ChatCompletionsClient,
}

impl GeminiProvider {
    pub fn new(config: &ProvidersConfig) -> Self {
        Self {
            client: ChatCompletionsClient::new(
                GEMINI_BASE_URL,
                config.gemini.api_key.clone(),
                config,
            ),
        }
    }
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    async fn complete(&self, prompt: &str, model: &str) -> Result<String, ApiError> {
        self.client.chat("gemini", prompt, model).await
    }
}
