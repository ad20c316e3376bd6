use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::providers::ProviderKind;
use crate::search::SearchResult;

// ===== REQUEST MODELS =====

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionRequest {
    pub question: String,
    #[serde(default)]
    pub llm_provider: ProviderKind,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub use_web_search: bool,
    #[serde(default = "default_max_search_results")]
    pub max_search_results: usize,
    #[serde(default)]
    pub session_id: Option<String>,
}

fn default_max_search_results() -> usize {
    3
}

#[derive(Debug, Deserialize)]
pub struct BulkQuestionsRequest {
    pub questions: Vec<String>,
    #[serde(default)]
    pub llm_provider: ProviderKind,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ClearMemoryRequest {
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MemoryStatusQuery {
    #[serde(default)]
    pub session_id: Option<String>,
}

// ===== RESPONSE MODELS =====

#[derive(Debug, Clone, Serialize)]
pub struct QuestionResponse {
    pub answer: String,
    pub internal_answer: String,
    pub web_answer: String,
    pub sources_used: Vec<String>,
    pub web_search_results: Vec<SearchResult>,
    pub processing_time: f64,
    pub llm_used: String,
}

#[derive(Debug, Serialize)]
pub struct BulkQuestionResult {
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<QuestionResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BulkQuestionsResponse {
    pub processed: usize,
    pub results: Vec<BulkQuestionResult>,
}

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub status: String,
    pub message: String,
    pub documents_loaded: usize,
    pub chunks_created: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct MemoryStatusResponse {
    pub session_id: String,
    pub message_count: usize,
    pub max_messages: usize,
    pub recent_questions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ClearMemoryResponse {
    pub message: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub document_id: uuid::Uuid,
    pub name: String,
    pub chunks_created: usize,
}

#[derive(Debug, Serialize)]
pub struct DocumentInfo {
    pub id: uuid::Uuid,
    pub name: String,
    pub size_bytes: usize,
    pub uploaded_at: DateTime<Utc>,
    pub chunks: usize,
}

#[derive(Debug, Serialize)]
pub struct ListDocumentsResponse {
    pub documents: Vec<DocumentInfo>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct DeleteDocumentResponse {
    pub message: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct SearchCapabilities {
    pub web_search_enabled: bool,
    pub retrieval_method: String,
    pub supported_documents: Vec<String>,
    pub default_llm: String,
    pub memory_enabled: bool,
    pub memory_bound: usize,
}
