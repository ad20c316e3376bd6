use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use super::{SearchProvider, SearchResult};
use crate::config::SearchConfig;
use crate::error::ApiError;

const CONTENT_SNIPPET_LIMIT: usize = 500;
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

#[derive(Debug, Serialize)]
struct TavilySearchRequest {
    api_key: String,
    query: String,
    search_depth: String,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct TavilySearchResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    score: f32,
}

/// Tavily web search client. One retry with backoff on server-side
/// failure; client-side errors (4xx) surface immediately.
#[derive(Clone)]
pub struct TavilyClient {
    client: Client,
    config: SearchConfig,
}

impl TavilyClient {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_seconds))
                .build()
                .unwrap_or_else(|_| Client::new()),
            config,
        }
    }

    fn scoped_query(&self, query: &str) -> String {
        let prefix = self.config.topic_prefix.trim();
        if prefix.is_empty() {
            query.to_string()
        } else {
            format!("{} {}", prefix, query)
        }
    }

    async fn search_once(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, SearchAttemptError> {
        let request = TavilySearchRequest {
            api_key: self.config.api_key.clone(),
            query: self.scoped_query(query),
            search_depth: "basic".to_string(),
            max_results,
        };

        let url = format!("{}/search", self.config.base_url);
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SearchAttemptError::Retryable(format!("Network error: {}", e)))?;

        let status = response.status();
        if status.is_client_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchAttemptError::Fatal(format!(
                "Search API rejected request ({}): {}",
                status, body
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchAttemptError::Retryable(format!(
                "Search API error ({}): {}",
                status, body
            )));
        }

        let body: TavilySearchResponse = response
            .json()
            .await
            .map_err(|e| SearchAttemptError::Fatal(format!("Malformed search response: {}", e)))?;

        let mut results: Vec<SearchResult> = body
            .results
            .into_iter()
            .map(|r| SearchResult {
                title: r.title,
                url: r.url,
                content: truncate_chars(&r.content, CONTENT_SNIPPET_LIMIT),
                relevance_score: r.score.clamp(0.0, 1.0),
            })
            .collect();

        // Provider order is mostly ranked already; enforce the contract.
        results.sort_by(|a, b| {
            b.relevance_score
                .partial_cmp(&a.relevance_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(max_results);

        debug!("Web search returned {} results", results.len());
        Ok(results)
    }
}

enum SearchAttemptError {
    Retryable(String),
    Fatal(String),
}

#[async_trait]
impl SearchProvider for TavilyClient {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, ApiError> {
        if !self.config.is_configured() {
            return Err(ApiError::SearchUnavailable(
                "Search API key not configured".to_string(),
            ));
        }

        match self.search_once(query, max_results).await {
            Ok(results) => Ok(results),
            Err(SearchAttemptError::Fatal(reason)) => Err(ApiError::SearchUnavailable(reason)),
            Err(SearchAttemptError::Retryable(reason)) => {
                warn!("Web search failed, retrying once: {}", reason);
                tokio::time::sleep(RETRY_BACKOFF).await;
                match self.search_once(query, max_results).await {
                    Ok(results) => Ok(results),
                    Err(SearchAttemptError::Fatal(reason))
                    | Err(SearchAttemptError::Retryable(reason)) => {
                        Err(ApiError::SearchUnavailable(reason))
                    }
                }
            }
        }
    }
}

fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        text.chars().take(limit).collect()
    }
}
