use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::config::EmbeddingConfig;

/// Anything that can turn text into a fixed-length vector.
/// The pipeline depends on this trait, not on the HTTP client, so tests
/// can substitute a deterministic embedder.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest {
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    input: Option<String>,
}

/// HTTP client for an embedding server (llama.cpp-style `/embedding`
/// endpoint, tolerant of the common response shapes).
#[derive(Clone)]
pub struct HttpEmbeddingClient {
    client: Client,
    base_url: String,
    dimension: usize,
}

impl HttpEmbeddingClient {
    pub fn new(config: &EmbeddingConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(config.timeout_seconds))
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: config.base_url.clone(),
            dimension: config.dimension,
        }
    }

    async fn embed_internal(&self, text: &str) -> Result<Vec<f32>> {
        debug!("Generating embedding for {} chars", text.len());

        let request = EmbeddingRequest {
            content: text.to_string(),
            input: Some(text.to_string()), // some servers read `input` instead
        };

        let url = format!("{}/embedding", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("Failed to connect to embedding server")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Embedding API error ({}): {}", status, body);
        }

        let json_value: serde_json::Value = response
            .json()
            .await
            .context("Failed to parse embedding response as JSON")?;

        let embedding = Self::extract_embedding(&json_value)?;

        if embedding.is_empty() {
            anyhow::bail!("Generated embedding is empty");
        }
        if embedding.len() != self.dimension {
            anyhow::bail!(
                "Embedding dimension mismatch: expected {}, got {}",
                self.dimension,
                embedding.len()
            );
        }

        Ok(embedding)
    }

    /// Accepts `{"embedding": [...]}`, `[{"embedding": [...]}]`,
    /// a bare float array, and OpenAI's `{"data": [{"embedding": [...]}]}`.
    fn extract_embedding(json_value: &serde_json::Value) -> Result<Vec<f32>> {
        let floats = |v: &serde_json::Value| -> Option<Vec<f32>> {
            v.as_array().map(|arr| {
                arr.iter()
                    .filter_map(|x| x.as_f64().map(|f| f as f32))
                    .collect()
            })
        };

        if let Some(arr) = json_value.as_array() {
            if let Some(first) = arr.first() {
                if let Some(emb) = floats(&first["embedding"]) {
                    return Ok(emb);
                }
            }
            if let Some(emb) = floats(json_value) {
                if !emb.is_empty() {
                    return Ok(emb);
                }
            }
        }
        if let Some(emb) = floats(&json_value["embedding"]) {
            return Ok(emb);
        }
        if let Some(data) = json_value["data"].as_array() {
            if let Some(first) = data.first() {
                if let Some(emb) = floats(&first["embedding"]) {
                    return Ok(emb);
                }
            }
        }

        anyhow::bail!("Unrecognized embedding response format: {}", json_value)
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_internal(text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_llama_cpp_shape() {
        let value = serde_json::json!({"embedding": [0.1, 0.2, 0.3]});
        let emb = HttpEmbeddingClient::extract_embedding(&value).unwrap();
        assert_eq!(emb.len(), 3);
    }

    #[test]
    fn extracts_openai_data_shape() {
        let value = serde_json::json!({"data": [{"embedding": [1.0, 2.0]}]});
        let emb = HttpEmbeddingClient::extract_embedding(&value).unwrap();
        assert_eq!(emb, vec![1.0, 2.0]);
    }

    #[test]
    fn extracts_bare_array() {
        let value = serde_json::json!([0.5, 0.25]);
        let emb = HttpEmbeddingClient::extract_embedding(&value).unwrap();
        assert_eq!(emb, vec![0.5, 0.25]);
    }

    #[test]
    fn rejects_unknown_shape() {
        let value = serde_json::json!({"vectors": true});
        assert!(HttpEmbeddingClient::extract_embedding(&value).is_err());
    }
}
