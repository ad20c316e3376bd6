use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use super::chunker::TextChunker;
use super::parser::DocumentParser;
use crate::config::RagConfig;
use crate::embedding::EmbeddingProvider;
use crate::error::ApiError;
use crate::index::{Chunk, Document, DocumentIndex};

/// Ingestion front door: parse -> chunk -> embed -> publish.
/// Everything expensive happens before the index write, so concurrent
/// readers never observe a half-ingested document.
pub struct DocumentService {
    index: Arc<DocumentIndex>,
    embedder: Arc<dyn EmbeddingProvider>,
    chunk_size: usize,
    chunk_overlap: usize,
}

impl DocumentService {
    pub fn new(
        index: Arc<DocumentIndex>,
        embedder: Arc<dyn EmbeddingProvider>,
        config: &RagConfig,
    ) -> Self {
        Self {
            index,
            embedder,
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
        }
    }

    /// Ingest an uploaded file. Returns the new document id and the
    /// number of chunks created.
    pub async fn ingest_upload(
        &self,
        filename: String,
        file_data: Vec<u8>,
    ) -> Result<(Uuid, usize), ApiError> {
        info!("Ingesting upload: {} ({} bytes)", filename, file_data.len());

        let parsed = DocumentParser::parse(&filename, &file_data)
            .map_err(|e| ApiError::Ingestion(format!("Failed to parse '{}': {}", filename, e)))?;

        if parsed.content.trim().is_empty() {
            return Err(ApiError::Ingestion(format!(
                "No text content found in '{}'",
                filename
            )));
        }

        let chunker = TextChunker::new(self.chunk_size, self.chunk_overlap);
        let text_chunks = chunker
            .chunk(&parsed.content)
            .map_err(|e| ApiError::Ingestion(format!("Failed to chunk '{}': {}", filename, e)))?;

        if text_chunks.is_empty() {
            return Err(ApiError::Ingestion(format!(
                "No chunks produced from '{}'",
                filename
            )));
        }
        debug!("Created {} chunks from {}", text_chunks.len(), filename);

        let texts: Vec<String> = text_chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self
            .embedder
            .embed_batch(&texts)
            .await
            .map_err(|e| ApiError::Ingestion(format!("Failed to embed '{}': {}", filename, e)))?;

        let document_id = Uuid::new_v4();
        let chunks: Vec<Chunk> = texts
            .into_iter()
            .zip(embeddings)
            .enumerate()
            .map(|(index, (content, embedding))| Chunk {
                document_id,
                document_name: filename.clone(),
                index,
                content,
                embedding,
            })
            .collect();
        let chunk_count = chunks.len();

        self.index.insert(Document {
            id: document_id,
            name: filename.clone(),
            size_bytes: file_data.len(),
            uploaded_at: Utc::now(),
            chunks,
        });

        info!(
            "Document '{}' indexed as {} with {} chunks",
            filename, document_id, chunk_count
        );

        Ok((document_id, chunk_count))
    }

    pub fn delete(&self, document_id: Uuid) -> Result<(), ApiError> {
        if self.index.remove(document_id) {
            Ok(())
        } else {
            Err(ApiError::NotFound(format!(
                "Document {} not found",
                document_id
            )))
        }
    }
}
