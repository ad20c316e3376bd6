use axum::{
    extract::{Extension, Multipart, Path},
    Json,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::document::DocumentService;
use crate::error::ApiError;
use crate::index::DocumentIndex;
use crate::models::{DeleteDocumentResponse, DocumentInfo, ListDocumentsResponse, UploadResponse};

pub async fn upload_handler(
    Extension(document_service): Extension<Arc<DocumentService>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    info!("File upload request received");

    let mut file_data: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Failed to read field: {}", e)))?
    {
        if field.name() == Some("file") {
            filename = field.file_name().map(|s| s.to_string());
            file_data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Validation(format!("Failed to read file: {}", e)))?
                    .to_vec(),
            );
        }
    }

    let file_data = file_data.ok_or_else(|| ApiError::Validation("file required".to_string()))?;
    let filename = filename.ok_or_else(|| ApiError::Validation("filename required".to_string()))?;

    let (document_id, chunks_created) = document_service
        .ingest_upload(filename.clone(), file_data)
        .await?;

    Ok(Json(UploadResponse {
        document_id,
        name: filename,
        chunks_created,
    }))
}

pub async fn list_documents_handler(
    Extension(index): Extension<Arc<DocumentIndex>>,
) -> Json<ListDocumentsResponse> {
    let documents: Vec<DocumentInfo> = index
        .list()
        .into_iter()
        .map(|doc| DocumentInfo {
            id: doc.id,
            name: doc.name.clone(),
            size_bytes: doc.size_bytes,
            uploaded_at: doc.uploaded_at,
            chunks: doc.chunks.len(),
        })
        .collect();

    let total = documents.len();
    Json(ListDocumentsResponse { documents, total })
}

pub async fn delete_document_handler(
    Extension(document_service): Extension<Arc<DocumentService>>,
    Path(document_id): Path<Uuid>,
) -> Result<Json<DeleteDocumentResponse>, ApiError> {
    document_service.delete(document_id)?;

    Ok(Json(DeleteDocumentResponse {
        message: format!("Document {} deleted", document_id),
        status: "success".to_string(),
    }))
}
