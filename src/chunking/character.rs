//! Delimiter-based text splitting.
//!
//! Splits text on a literal separator and greedily merges the pieces back
//! together up to a maximum chunk length. Pieces are never cut, so a single
//! sentence longer than the limit becomes its own oversized chunk.

use super::Chunk;
use crate::error::{FaqbotError, Result};
use tracing::{debug, warn};

/// Splits text into non-overlapping chunks.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    separator: String,
}

impl TextSplitter {
    /// Create a splitter with a maximum chunk length (in characters) and a
    /// separator. An empty separator splits into single characters.
    pub fn new(chunk_size: usize, separator: impl Into<String>) -> Result<Self> {
        if chunk_size == 0 {
            return Err(FaqbotError::InvalidInput(
                "chunk_size must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            chunk_size,
            separator: separator.into(),
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Split `text` into chunks in document order.
    pub fn split(&self, text: &str, source: &str) -> Vec<Chunk> {
        let pieces = self.pieces(text);

        let mut chunks = Vec::new();
        // Byte range in `text` of the chunk being merged, plus its char length.
        let mut current: Option<(usize, usize)> = None;
        let mut current_len = 0usize;

        for (offset, piece) in pieces {
            let piece_end = offset + piece.len();

            if let Some((start, end)) = current {
                // Separators between the pieces (including any dropped empty
                // piece) stay in the merged chunk.
                let merged_len = current_len + text[end..piece_end].chars().count();
                if merged_len <= self.chunk_size {
                    current = Some((start, piece_end));
                    current_len = merged_len;
                    continue;
                }
                self.emit(&mut chunks, text, start, end, current_len, source);
            }

            current = Some((offset, piece_end));
            current_len = piece.chars().count();
        }

        if let Some((start, end)) = current {
            self.emit(&mut chunks, text, start, end, current_len, source);
        }

        debug!("Split {} bytes into {} chunks", text.len(), chunks.len());
        chunks
    }

    fn emit(
        &self,
        chunks: &mut Vec<Chunk>,
        text: &str,
        start: usize,
        end: usize,
        len: usize,
        source: &str,
    ) {
        if len > self.chunk_size {
            warn!(
                "Created a chunk of size {}, which is longer than the specified {}",
                len, self.chunk_size
            );
        }
        chunks.push(Chunk::new(&text[start..end], start, chunks.len(), source));
    }

    /// Non-empty pieces between separators, with their byte offsets.
    fn pieces<'a>(&self, text: &'a str) -> Vec<(usize, &'a str)> {
        if self.separator.is_empty() {
            return text
                .char_indices()
                .map(|(i, c)| (i, &text[i..i + c.len_utf8()]))
                .collect();
        }

        let mut pieces = Vec::new();
        let mut offset = 0;
        for piece in text.split(self.separator.as_str()) {
            if !piece.is_empty() {
                pieces.push((offset, piece));
            }
            offset += piece.len() + self.separator.len();
        }
        pieces
    }
}
