pub mod chunker;
pub mod parser;
pub mod service;

pub use chunker::{TextChunk, TextChunker};
pub use parser::{DocumentParser, ParsedDocument, SUPPORTED_EXTENSIONS};
pub use service::DocumentService;
