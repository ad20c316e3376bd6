use axum::{extract::Extension, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::config::Settings;
use crate::document::SUPPORTED_EXTENSIONS;
use crate::index::DocumentIndex;
use crate::models::{SearchCapabilities, SystemStatus};

#[derive(Serialize)]
pub struct HealthResponse {
    message: String,
    status: String,
    version: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "Company Law AI Agent is running".to_string(),
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn system_status(
    Extension(index): Extension<Arc<DocumentIndex>>,
) -> Json<SystemStatus> {
    let stats = index.stats();

    let (status, message) = if stats.documents_loaded == 0 {
        (
            "not_initialized".to_string(),
            "No documents indexed yet - upload company law documents to enable retrieval"
                .to_string(),
        )
    } else {
        ("ready".to_string(), "Company Law AI Agent ready".to_string())
    };

    Json(SystemStatus {
        status,
        message,
        documents_loaded: stats.documents_loaded,
        chunks_created: stats.chunks_created,
        last_updated: stats.last_updated,
    })
}

pub async fn search_capabilities(
    Extension(settings): Extension<Arc<Settings>>,
) -> Json<SearchCapabilities> {
    Json(SearchCapabilities {
        web_search_enabled: settings.search.is_configured(),
        retrieval_method: "Cosine similarity search".to_string(),
        supported_documents: SUPPORTED_EXTENSIONS
            .iter()
            .map(|e| format!(".{}", e))
            .collect(),
        default_llm: format!("Groq ({})", settings.providers.groq.model),
        memory_enabled: true,
        memory_bound: settings.memory.max_messages,
    })
}
