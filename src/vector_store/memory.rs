//! In-memory vector store implementation.
//!
//! Brute-force scan over every entry; meant for a handful of FAQ chunks.

use super::{cosine_similarity, IndexedChunk, SearchResult, VectorStore};
use crate::error::{FaqbotError, Result};
use async_trait::async_trait;
use std::sync::RwLock;

/// In-memory vector store.
pub struct MemoryVectorStore {
    entries: RwLock<Vec<IndexedChunk>>,
}

impl MemoryVectorStore {
    /// Create a new in-memory vector store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }
}

impl Default for MemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: T) -> FaqbotError {
    FaqbotError::VectorStore("lock poisoned".to_string())
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn upsert_batch(&self, entries: Vec<IndexedChunk>) -> Result<usize> {
        let count = entries.len();
        let mut store = self.entries.write().map_err(poisoned)?;
        for entry in entries {
            // Chunks are keyed by (source, order).
            match store
                .iter_mut()
                .find(|e| e.chunk.order == entry.chunk.order && e.chunk.source == entry.chunk.source)
            {
                Some(existing) => *existing = entry,
                None => store.push(entry),
            }
        }
        Ok(count)
    }

    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>> {
        self.search_with_threshold(query_embedding, limit, f32::NEG_INFINITY)
            .await
    }

    async fn search_with_threshold(
        &self,
        query_embedding: &[f32],
        limit: usize,
        min_score: f32,
    ) -> Result<Vec<SearchResult>> {
        let entries = self.entries.read().map_err(poisoned)?;

        let mut results: Vec<SearchResult> = entries
            .iter()
            .map(|entry| SearchResult {
                score: cosine_similarity(query_embedding, &entry.embedding),
                entry: entry.clone(),
            })
            .filter(|r| r.score >= min_score)
            .collect();

        // Ties fall back to document order so rankings are reproducible.
        results.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.entry.chunk.order.cmp(&b.entry.chunk.order))
        });
        results.truncate(limit);

        Ok(results)
    }

    async fn document_count(&self) -> Result<usize> {
        Ok(self.entries.read().map_err(poisoned)?.len())
    }
}
