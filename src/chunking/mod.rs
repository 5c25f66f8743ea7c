//! Loading the FAQ document and splitting it into retrieval chunks.

mod character;

pub use character::TextSplitter;

use crate::error::{FaqbotError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// A contiguous piece of the source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Text content of this chunk.
    pub content: String,
    /// Byte offset of the chunk in the source text.
    pub offset: usize,
    /// Position of this chunk in the document.
    pub order: usize,
    /// Path of the document this chunk came from.
    pub source: String,
}

impl Chunk {
    /// Create a new chunk.
    pub fn new(content: &str, offset: usize, order: usize, source: &str) -> Self {
        Self {
            content: content.to_string(),
            offset,
            order,
            source: source.to_string(),
        }
    }

    /// Length of the content in characters.
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}

/// Read a UTF-8 document from disk.
pub async fn load_document(path: &Path) -> Result<String> {
    debug!("Loading document {}", path.display());
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| FaqbotError::Document {
            path: path.display().to_string(),
            source,
        })
}

/// Load a document and split it in one step.
pub async fn load_and_split(path: &Path, splitter: &TextSplitter) -> Result<Vec<Chunk>> {
    let text = load_document(path).await?;
    Ok(splitter.split(&text, &path.display().to_string()))
}
