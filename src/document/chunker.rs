use anyhow::Result;

#[derive(Debug, Clone)]
pub struct TextChunk {
    pub content: String,
    pub start_pos: usize,
    pub end_pos: usize,
}

/// Fixed-size sliding-window chunker with character overlap.
/// Chunk boundaries are measured in characters, not bytes, so multi-byte
/// text never splits inside a code point.
pub struct TextChunker {
    chunk_size: usize,
    overlap: usize,
}

impl TextChunker {
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        // Overlap must leave forward progress per window.
        let overlap = overlap.min(chunk_size.saturating_sub(1));
        Self {
            chunk_size: chunk_size.max(1),
            overlap,
        }
    }

    pub fn chunk(&self, text: &str) -> Result<Vec<TextChunk>> {
        let chars: Vec<char> = text.chars().collect();
        let total_len = chars.len();
        let mut chunks = Vec::new();

        if total_len == 0 {
            return Ok(chunks);
        }

        let mut start = 0;
        while start < total_len {
            let end = std::cmp::min(start + self.chunk_size, total_len);
            let content: String = chars[start..end].iter().collect();

            let trimmed = content.trim();
            if !trimmed.is_empty() {
                chunks.push(TextChunk {
                    content: trimmed.to_string(),
                    start_pos: start,
                    end_pos: end,
                });
            }

            if end >= total_len {
                break;
            }
            start += self.chunk_size - self.overlap;
        }

        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_yields_no_chunks() {
        let chunker = TextChunker::new(100, 20);
        assert!(chunker.chunk("").unwrap().is_empty());
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let chunker = TextChunker::new(100, 20);
        let chunks = chunker.chunk("short text").unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "short text");
    }

    #[test]
    fn long_text_overlaps() {
        let chunker = TextChunker::new(10, 3);
        let text = "abcdefghijklmnopqrstuvwxyz";
        let chunks = chunker.chunk(text).unwrap();
        assert!(chunks.len() > 1);
        // Window advances by chunk_size - overlap
        assert_eq!(chunks[0].content, "abcdefghij");
        assert_eq!(chunks[1].start_pos, 7);
        assert!(chunks[1].content.starts_with("hij"));
    }

    #[test]
    fn excessive_overlap_still_terminates() {
        let chunker = TextChunker::new(5, 50);
        let chunks = chunker.chunk("abcdefghij").unwrap();
        assert!(chunks.len() >= 2);
    }

    #[test]
    fn multibyte_text_does_not_panic() {
        let chunker = TextChunker::new(4, 1);
        let chunks = chunker.chunk("undang-undang perseroan — pasal ①②③").unwrap();
        assert!(!chunks.is_empty());
    }
}
