use axum::{extract::Extension, Json};
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;
use crate::models::{
    BulkQuestionsRequest, BulkQuestionsResponse, QuestionRequest, QuestionResponse,
};
use crate::pipeline::AnswerPipeline;

pub async fn ask_handler(
    Extension(pipeline): Extension<Arc<AnswerPipeline>>,
    Json(request): Json<QuestionRequest>,
) -> Result<Json<QuestionResponse>, ApiError> {
    info!("Ask request ({} chars)", request.question.len());
    let response = pipeline.ask(request).await?;
    Ok(Json(response))
}

pub async fn bulk_questions_handler(
    Extension(pipeline): Extension<Arc<AnswerPipeline>>,
    Json(request): Json<BulkQuestionsRequest>,
) -> Result<Json<BulkQuestionsResponse>, ApiError> {
    info!("Bulk request with {} questions", request.questions.len());
    let response = pipeline
        .ask_bulk(request.questions, request.llm_provider, request.session_id)
        .await?;
    Ok(Json(response))
}
