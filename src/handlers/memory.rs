use axum::{
    extract::{Extension, Query},
    Json,
};
use std::sync::Arc;

use crate::memory::{SessionStore, DEFAULT_SESSION_ID};
use crate::models::{
    ClearMemoryRequest, ClearMemoryResponse, MemoryStatusQuery, MemoryStatusResponse,
};

const RECENT_QUESTIONS_SHOWN: usize = 5;

pub async fn memory_status_handler(
    Extension(sessions): Extension<Arc<SessionStore>>,
    Query(query): Query<MemoryStatusQuery>,
) -> Json<MemoryStatusResponse> {
    let session_id = query
        .session_id
        .unwrap_or_else(|| DEFAULT_SESSION_ID.to_string());

    let (message_count, max_messages) = sessions.status(&session_id).await;
    let recent_questions = sessions
        .recent_questions(&session_id, RECENT_QUESTIONS_SHOWN)
        .await;

    Json(MemoryStatusResponse {
        session_id,
        message_count,
        max_messages,
        recent_questions,
    })
}

pub async fn clear_memory_handler(
    Extension(sessions): Extension<Arc<SessionStore>>,
    Json(request): Json<ClearMemoryRequest>,
) -> Json<ClearMemoryResponse> {
    let session_id = request
        .session_id
        .unwrap_or_else(|| DEFAULT_SESSION_ID.to_string());

    sessions.clear(&session_id).await;

    Json(ClearMemoryResponse {
        message: format!("Conversation memory cleared for session '{}'", session_id),
        status: "success".to_string(),
    })
}
