use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::similarity::cosine_similarity;

/// An indexed document: immutable once published, replaced wholesale on
/// re-ingestion of the same identifier.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: Uuid,
    pub name: String,
    pub size_bytes: usize,
    pub uploaded_at: DateTime<Utc>,
    pub chunks: Vec<Chunk>,
}

#[derive(Debug, Clone)]
pub struct Chunk {
    pub document_id: Uuid,
    pub document_name: String,
    pub index: usize,
    pub content: String,
    pub embedding: Vec<f32>,
}

/// Retrieval output, ordered by descending similarity.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub document_id: Uuid,
    pub document_name: String,
    pub chunk_index: usize,
    pub content: String,
    pub similarity: f32,
}

#[derive(Debug, Clone, Default)]
pub struct IndexStats {
    pub documents_loaded: usize,
    pub chunks_created: usize,
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct IndexInner {
    documents: HashMap<Uuid, Arc<Document>>,
    last_updated: Option<DateTime<Utc>>,
}

/// In-memory vector index over document chunks.
///
/// Similarity metric is cosine similarity (fixed; it determines ranking
/// determinism). Reads take a shared lock and never observe a partially
/// ingested document: callers prepare the full `Document` (parse, chunk,
/// embed) outside the lock and publish it with a single `insert`.
pub struct DocumentIndex {
    inner: RwLock<IndexInner>,
}

impl DocumentIndex {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(IndexInner::default()),
        }
    }

    /// Publish a fully prepared document. Re-inserting an existing id
    /// replaces its prior chunks (idempotent per identifier).
    pub fn insert(&self, document: Document) {
        let mut inner = self.inner.write();
        let replaced = inner
            .documents
            .insert(document.id, Arc::new(document))
            .is_some();
        inner.last_updated = Some(Utc::now());
        if replaced {
            debug!("Replaced existing document in index");
        }
    }

    /// Top-k chunks by descending cosine similarity to the query
    /// embedding. Ties break on (document id, chunk index) so an
    /// unchanged index always returns the same order. An empty index
    /// yields an empty vec, not an error.
    pub fn retrieve(&self, query_embedding: &[f32], k: usize) -> Vec<ScoredChunk> {
        let inner = self.inner.read();
        let mut scored: Vec<ScoredChunk> = Vec::new();

        for document in inner.documents.values() {
            for chunk in &document.chunks {
                match cosine_similarity(query_embedding, &chunk.embedding) {
                    Ok(similarity) => scored.push(ScoredChunk {
                        document_id: chunk.document_id,
                        document_name: chunk.document_name.clone(),
                        chunk_index: chunk.index,
                        content: chunk.content.clone(),
                        similarity,
                    }),
                    Err(e) => {
                        debug!("Skipping chunk with incompatible embedding: {}", e);
                    }
                }
            }
        }

        scored.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.document_id.cmp(&b.document_id))
                .then_with(|| a.chunk_index.cmp(&b.chunk_index))
        });
        scored.truncate(k);
        scored
    }

    pub fn remove(&self, document_id: Uuid) -> bool {
        let mut inner = self.inner.write();
        let removed = inner.documents.remove(&document_id).is_some();
        if removed {
            inner.last_updated = Some(Utc::now());
            info!("Removed document {} from index", document_id);
        }
        removed
    }

    pub fn contains(&self, document_id: Uuid) -> bool {
        self.inner.read().documents.contains_key(&document_id)
    }

    pub fn list(&self) -> Vec<Arc<Document>> {
        let inner = self.inner.read();
        let mut documents: Vec<Arc<Document>> = inner.documents.values().cloned().collect();
        documents.sort_by(|a, b| a.uploaded_at.cmp(&b.uploaded_at).then(a.id.cmp(&b.id)));
        documents
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().documents.is_empty()
    }

    pub fn stats(&self) -> IndexStats {
        let inner = self.inner.read();
        IndexStats {
            documents_loaded: inner.documents.len(),
            chunks_created: inner
                .documents
                .values()
                .map(|d| d.chunks.len())
                .sum(),
            last_updated: inner.last_updated,
        }
    }
}

impl Default for DocumentIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_chunks(name: &str, embeddings: Vec<Vec<f32>>) -> Document {
        let id = Uuid::new_v4();
        let chunks = embeddings
            .into_iter()
            .enumerate()
            .map(|(i, embedding)| Chunk {
                document_id: id,
                document_name: name.to_string(),
                index: i,
                content: format!("{} chunk {}", name, i),
                embedding,
            })
            .collect();
        Document {
            id,
            name: name.to_string(),
            size_bytes: 100,
            uploaded_at: Utc::now(),
            chunks,
        }
    }

    #[test]
    fn empty_index_returns_empty_not_error() {
        let index = DocumentIndex::new();
        assert!(index.retrieve(&[1.0, 0.0], 5).is_empty());
    }

    #[test]
    fn retrieval_orders_by_descending_similarity() {
        let index = DocumentIndex::new();
        index.insert(doc_with_chunks(
            "agm.txt",
            vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.7, 0.7]],
        ));

        let results = index.retrieve(&[1.0, 0.0], 3);
        assert_eq!(results.len(), 3);
        for pair in results.windows(2) {
            assert!(pair[0].similarity >= pair[1].similarity);
        }
        assert_eq!(results[0].chunk_index, 0);
    }

    #[test]
    fn retrieval_is_deterministic() {
        let index = DocumentIndex::new();
        index.insert(doc_with_chunks("a.txt", vec![vec![1.0, 0.0], vec![1.0, 0.0]]));
        index.insert(doc_with_chunks("b.txt", vec![vec![1.0, 0.0]]));

        let first = index.retrieve(&[1.0, 0.0], 3);
        let second = index.retrieve(&[1.0, 0.0], 3);
        let order =
            |r: &[ScoredChunk]| r.iter().map(|c| (c.document_id, c.chunk_index)).collect::<Vec<_>>();
        assert_eq!(order(&first), order(&second));
    }

    #[test]
    fn reinsert_replaces_prior_chunks() {
        let index = DocumentIndex::new();
        let mut doc = doc_with_chunks("law.txt", vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        index.insert(doc.clone());
        assert_eq!(index.stats().chunks_created, 2);

        doc.chunks.truncate(1);
        index.insert(doc);
        assert_eq!(index.stats().documents_loaded, 1);
        assert_eq!(index.stats().chunks_created, 1);
    }

    #[test]
    fn remove_is_reported() {
        let index = DocumentIndex::new();
        let doc = doc_with_chunks("x.txt", vec![vec![1.0]]);
        let id = doc.id;
        index.insert(doc);
        assert!(index.remove(id));
        assert!(!index.remove(id));
        assert!(index.is_empty());
    }

    #[test]
    fn truncates_to_k() {
        let index = DocumentIndex::new();
        index.insert(doc_with_chunks(
            "big.txt",
            (0..10).map(|_| vec![1.0, 0.0]).collect(),
        ));
        assert_eq!(index.retrieve(&[1.0, 0.0], 4).len(), 4);
    }
}
