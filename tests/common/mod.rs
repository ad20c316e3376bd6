// Shared fixtures; not every test binary uses every helper.
#![allow(dead_code)]

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use legal_rag_server::config::{MemoryConfig, RagConfig};
use legal_rag_server::embedding::EmbeddingProvider;
use legal_rag_server::error::ApiError;
use legal_rag_server::index::DocumentIndex;
use legal_rag_server::memory::SessionStore;
use legal_rag_server::pipeline::AnswerPipeline;
use legal_rag_server::providers::{Completion, CompletionRouter, ProviderKind};
use legal_rag_server::search::{SearchProvider, SearchResult};

pub const EMBEDDING_DIM: usize = 16;

/// Deterministic bag-of-words embedder: same text always maps to the
/// same vector, and overlapping vocabulary yields higher similarity.
pub struct HashingEmbedder;

#[async_trait]
impl EmbeddingProvider for HashingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; EMBEDDING_DIM];
        for word in text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let mut hasher = DefaultHasher::new();
            word.hash(&mut hasher);
            vector[(hasher.finish() as usize) % EMBEDDING_DIM] += 1.0;
        }
        Ok(vector)
    }
}

/// Returns a fixed, already-ranked result set.
pub struct CannedSearch {
    pub results: Vec<SearchResult>,
}

#[async_trait]
impl SearchProvider for CannedSearch {
    async fn search(
        &self,
        _query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, ApiError> {
        let mut results = self.results.clone();
        results.truncate(max_results);
        Ok(results)
    }
}

/// Always unavailable, as if the provider timed out.
pub struct FailingSearch;

#[async_trait]
impl SearchProvider for FailingSearch {
    async fn search(&self, _query: &str, _max: usize) -> Result<Vec<SearchResult>, ApiError> {
        Err(ApiError::SearchUnavailable("provider timeout".to_string()))
    }
}

/// Echoes the prompt it received so tests can inspect prompt
/// construction, while reporting a truthful provider description.
pub struct EchoRouter;

#[async_trait]
impl CompletionRouter for EchoRouter {
    async fn complete(
        &self,
        prompt: &str,
        provider: ProviderKind,
        model_override: Option<&str>,
    ) -> Result<Completion, ApiError> {
        let model = model_override.unwrap_or("stub-model");
        Ok(Completion {
            text: prompt.to_string(),
            llm_used: format!("{} ({})", provider, model),
        })
    }
}

/// Always fails, as if credentials were missing.
pub struct UnavailableRouter;

#[async_trait]
impl CompletionRouter for UnavailableRouter {
    async fn complete(
        &self,
        _prompt: &str,
        provider: ProviderKind,
        _model_override: Option<&str>,
    ) -> Result<Completion, ApiError> {
        Err(ApiError::ProviderUnavailable {
            provider: provider.to_string(),
            reason: "API key not configured".to_string(),
        })
    }
}

pub fn rag_config() -> RagConfig {
    RagConfig {
        retrieval_top_k: 5,
        chunk_size: 200,
        chunk_overlap: 40,
    }
}

pub fn memory_config() -> MemoryConfig {
    MemoryConfig {
        max_messages: 8,
        context_messages: 6,
    }
}

pub struct TestHarness {
    pub index: Arc<DocumentIndex>,
    pub sessions: Arc<SessionStore>,
    pub pipeline: Arc<AnswerPipeline>,
}

pub fn harness(search: Arc<dyn SearchProvider>, router: Arc<dyn CompletionRouter>) -> TestHarness {
    let index = Arc::new(DocumentIndex::new());
    let sessions = Arc::new(SessionStore::new(memory_config().max_messages));
    let pipeline = Arc::new(AnswerPipeline::new(
        index.clone(),
        Arc::new(HashingEmbedder),
        search,
        router,
        sessions.clone(),
        rag_config(),
        memory_config(),
    ));
    TestHarness {
        index,
        sessions,
        pipeline,
    }
}

pub fn question(text: &str, session: &str) -> legal_rag_server::models::QuestionRequest {
    legal_rag_server::models::QuestionRequest {
        question: text.to_string(),
        llm_provider: ProviderKind::Groq,
        model_name: None,
        use_web_search: false,
        max_search_results: 3,
        session_id: Some(session.to_string()),
    }
}
