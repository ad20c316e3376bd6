pub mod similarity;
pub mod store;

pub use similarity::cosine_similarity;
pub use store::{Chunk, Document, DocumentIndex, IndexStats, ScoredChunk};
