use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use super::prompt;
use crate::config::{MemoryConfig, RagConfig};
use crate::embedding::EmbeddingProvider;
use crate::error::ApiError;
use crate::index::{DocumentIndex, ScoredChunk};
use crate::memory::{ChatMessage, SessionStore, DEFAULT_SESSION_ID};
use crate::models::{BulkQuestionResult, BulkQuestionsResponse, QuestionRequest, QuestionResponse};
use crate::providers::{CompletionRouter, ProviderKind};
use crate::search::{SearchProvider, SearchResult};

const BULK_QUESTION_LIMIT: usize = 5;
const MAX_SEARCH_RESULTS_CAP: usize = 10;

/// Orchestrates one question end to end: memory context, retrieval,
/// optional web search, prompt construction, provider call, memory write.
pub struct AnswerPipeline {
    index: Arc<DocumentIndex>,
    embedder: Arc<dyn EmbeddingProvider>,
    search: Arc<dyn SearchProvider>,
    router: Arc<dyn CompletionRouter>,
    sessions: Arc<SessionStore>,
    rag: RagConfig,
    memory: MemoryConfig,
}

impl AnswerPipeline {
    pub fn new(
        index: Arc<DocumentIndex>,
        embedder: Arc<dyn EmbeddingProvider>,
        search: Arc<dyn SearchProvider>,
        router: Arc<dyn CompletionRouter>,
        sessions: Arc<SessionStore>,
        rag: RagConfig,
        memory: MemoryConfig,
    ) -> Self {
        Self {
            index,
            embedder,
            search,
            router,
            sessions,
            rag,
            memory,
        }
    }

    pub async fn ask(&self, request: QuestionRequest) -> Result<QuestionResponse, ApiError> {
        let question = request.question.trim().to_string();
        if question.is_empty() {
            return Err(ApiError::Validation("Question cannot be empty".to_string()));
        }

        let session_id = request
            .session_id
            .clone()
            .unwrap_or_else(|| DEFAULT_SESSION_ID.to_string());

        info!(
            "Question for session '{}' (provider: {}, web_search: {})",
            session_id, request.llm_provider, request.use_web_search
        );

        // Holding the session lock for the whole request serializes racing
        // requests on the same session; other sessions are unaffected.
        let session = self.sessions.get_or_create(&session_id);
        let mut session_guard = session.lock().await;

        let history = prompt::build_history(&session_guard.recent(self.memory.context_messages));

        let start = Instant::now();

        let max_results = request.max_search_results.clamp(1, MAX_SEARCH_RESULTS_CAP);
        let (chunks, web_results) = tokio::join!(
            self.retrieve_chunks(&question),
            self.search_web(&question, request.use_web_search, max_results),
        );

        let prompt_text = prompt::build_prompt(
            &question,
            &history,
            &chunks,
            &web_results,
            request.use_web_search,
        );

        // A provider failure aborts the whole request: nothing has been
        // appended to the session yet, so memory stays untouched.
        let completion = self
            .router
            .complete(&prompt_text, request.llm_provider, request.model_name.as_deref())
            .await?;

        let processing_time = start.elapsed().as_secs_f64();

        let sources_used = dedup_sources(&chunks);
        let (internal_answer, web_answer) = prompt::split_answer(&completion.text);

        session_guard.append(ChatMessage::user(question.clone()));
        session_guard.append(ChatMessage::assistant(
            completion.text.clone(),
            sources_used.clone(),
            web_results.clone(),
            processing_time,
            completion.llm_used.clone(),
        ));
        drop(session_guard);

        info!(
            "Answered in {:.2}s via {} ({} sources, {} web results)",
            processing_time,
            completion.llm_used,
            sources_used.len(),
            web_results.len()
        );

        Ok(QuestionResponse {
            answer: completion.text,
            internal_answer,
            web_answer,
            sources_used,
            web_search_results: web_results,
            processing_time,
            llm_used: completion.llm_used,
        })
    }

    /// Bulk processing runs each question through the normal pipeline
    /// with web search disabled, capped to a small batch.
    pub async fn ask_bulk(
        &self,
        questions: Vec<String>,
        provider: ProviderKind,
        session_id: Option<String>,
    ) -> Result<BulkQuestionsResponse, ApiError> {
        if questions.is_empty() {
            return Err(ApiError::Validation("No questions provided".to_string()));
        }

        let mut results = Vec::new();
        for question in questions.into_iter().take(BULK_QUESTION_LIMIT) {
            let request = QuestionRequest {
                question: question.clone(),
                llm_provider: provider,
                model_name: None,
                use_web_search: false,
                max_search_results: 3,
                session_id: session_id.clone(),
            };
            match self.ask(request).await {
                Ok(response) => results.push(BulkQuestionResult {
                    question,
                    result: Some(response),
                    error: None,
                }),
                Err(e) => results.push(BulkQuestionResult {
                    question,
                    result: None,
                    error: Some(e.to_string()),
                }),
            }
        }

        Ok(BulkQuestionsResponse {
            processed: results.len(),
            results,
        })
    }

    /// Retrieval is best-effort: an embedding or index failure degrades
    /// to zero chunks so the model can still answer from web context.
    async fn retrieve_chunks(&self, question: &str) -> Vec<ScoredChunk> {
        if self.index.is_empty() {
            return Vec::new();
        }

        match self.embedder.embed(question).await {
            Ok(embedding) => self.index.retrieve(&embedding, self.rag.retrieval_top_k),
            Err(e) => {
                warn!("Retrieval degraded to no context: {}", e);
                Vec::new()
            }
        }
    }

    /// Web search is best-effort enrichment: unavailability yields an
    /// empty result set, never a request failure.
    async fn search_web(
        &self,
        question: &str,
        requested: bool,
        max_results: usize,
    ) -> Vec<SearchResult> {
        if !requested {
            return Vec::new();
        }

        match self.search.search(question, max_results).await {
            Ok(results) => results,
            Err(e) => {
                warn!("Web search omitted from answer: {}", e);
                Vec::new()
            }
        }
    }
}

/// Deduplicate document names preserving retrieval order. Keyed on the
/// name, not the document id: distinct documents uploaded under the same
/// filename count as one source.
fn dedup_sources(chunks: &[ScoredChunk]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    chunks
        .iter()
        .filter(|c| seen.insert(c.document_name.as_str()))
        .map(|c| c.document_name.clone())
        .collect()
}
