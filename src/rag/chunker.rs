use crate::types::{AppError, Result};
use text_splitter::{ChunkConfig, TextSplitter};

/// Character-based text chunker with overlap.
///
/// Splits on natural boundaries (paragraphs, sentences, words) while
/// keeping every chunk within `chunk_size` characters.
pub struct TextChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextChunker {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    pub fn chunk(&self, text: &str) -> Result<Vec<String>> {
        let config = ChunkConfig::new(self.chunk_size)
            .with_overlap(self.chunk_overlap)
            .map_err(|e| AppError::InvalidInput(format!("Invalid chunking parameters: {}", e)))?;
        let splitter = TextSplitter::new(config);

        Ok(splitter.chunks(text).map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_yields_no_chunks() {
        let chunker = TextChunker::new(1000, 200);
        assert!(chunker.chunk("").unwrap().is_empty());
    }

    #[test]
    fn test_short_text_is_one_chunk() {
        let chunker = TextChunker::new(1000, 200);
        let chunks = chunker.chunk("A short paragraph.").unwrap();

        assert_eq!(chunks, vec!["A short paragraph.".to_string()]);
    }

    #[test]
    fn test_chunks_respect_size_limit() {
        let chunker = TextChunker::new(100, 20);
        let text = "Lorem ipsum dolor sit amet. ".repeat(50);
        let chunks = chunker.chunk(&text).unwrap();

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 100);
        }
    }

    #[test]
    fn test_every_chunk_comes_from_the_text() {
        let chunker = TextChunker::new(80, 16);
        let text = "One sentence here. Another sentence there. ".repeat(20);
        let chunks = chunker.chunk(&text).unwrap();

        for chunk in &chunks {
            assert!(text.contains(chunk.as_str()));
        }
    }

    #[test]
    fn test_overlap_larger_than_size_is_rejected() {
        let chunker = TextChunker::new(10, 50);
        assert!(chunker.chunk("some text").is_err());
    }
}
