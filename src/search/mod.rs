pub mod tavily;

pub use tavily::TavilyClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// One ranked web hit. `relevance_score` is normalized to [0, 1] at the
/// boundary; provider-native scales are not assumed uniform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub content: String,
    pub relevance_score: f32,
}

/// External web search, behind a trait so the pipeline can be exercised
/// with a failing or canned provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Returns up to `max_results` hits sorted by descending relevance.
    /// Unavailability (timeout, quota, network) is an error here, but
    /// callers must treat it as soft and continue with no web results.
    async fn search(&self, query: &str, max_results: usize)
        -> Result<Vec<SearchResult>, ApiError>;
}
