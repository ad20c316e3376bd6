use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Extension, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::config::Settings;
use crate::document::DocumentService;
use crate::handlers;
use crate::index::DocumentIndex;
use crate::memory::SessionStore;
use crate::pipeline::AnswerPipeline;

pub fn build_router(
    settings: Arc<Settings>,
    index: Arc<DocumentIndex>,
    document_service: Arc<DocumentService>,
    sessions: Arc<SessionStore>,
    pipeline: Arc<AnswerPipeline>,
) -> Router {
    let max_upload_bytes = settings.server.max_upload_bytes;

    Router::new()
        .route("/", get(handlers::status::health_check))
        .route("/status", get(handlers::status::system_status))
        .route(
            "/search-capabilities",
            get(handlers::status::search_capabilities),
        )
        .route("/ask", post(handlers::ask::ask_handler))
        .route("/bulk-questions", post(handlers::ask::bulk_questions_handler))
        .route("/documents/upload", post(handlers::documents::upload_handler))
        .route("/documents", get(handlers::documents::list_documents_handler))
        .route(
            "/documents/{id}",
            delete(handlers::documents::delete_document_handler),
        )
        .route("/memory-status", get(handlers::memory::memory_status_handler))
        .route("/clear-memory", post(handlers::memory::clear_memory_handler))
        .layer(Extension(settings))
        .layer(Extension(index))
        .layer(Extension(document_service))
        .layer(Extension(sessions))
        .layer(Extension(pipeline))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(false)),
        )
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}
