//! Deterministic providers for tests.

use crate::embedding::Embedder;
use crate::error::{FaqbotError, Result};
use crate::llm::ChatModel;
use crate::rag::Prompt;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Embeds text as keyword counts over a fixed vocabulary. A token counts
/// for a keyword when it starts with it ("returns" counts as "return").
pub struct KeywordEmbedder {
    vocabulary: Vec<&'static str>,
    calls: AtomicUsize,
}

impl KeywordEmbedder {
    pub fn new() -> Self {
        Self {
            vocabulary: vec!["return", "policy", "shipping", "free", "days", "refund"],
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .collect();

        self.vocabulary
            .iter()
            .map(|word| tokens.iter().filter(|t| t.starts_with(word)).count() as f32)
            .collect()
    }
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.vectorize(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| self.vectorize(t)).collect())
    }

    fn model(&self) -> &str {
        "keyword-test"
    }
}

/// Embedder whose every call fails.
#[derive(Default)]
pub struct FailingEmbedder {
    calls: AtomicUsize,
}

impl FailingEmbedder {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(FaqbotError::Embedding("embedding service unavailable".to_string()))
    }

    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(FaqbotError::Embedding("embedding service unavailable".to_string()))
    }

    fn model(&self) -> &str {
        "failing-test"
    }
}

/// Chat model that always answers with the same text and records prompts.
pub struct CannedChat {
    answer: String,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<Prompt>>,
}

impl CannedChat {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<Prompt> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for CannedChat {
    async fn complete(&self, prompt: &Prompt) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.clone());
        Ok(self.answer.clone())
    }

    fn model(&self) -> &str {
        "canned-test"
    }
}

/// Chat model whose every call fails.
#[derive(Default)]
pub struct FailingChat {
    calls: AtomicUsize,
}

impl FailingChat {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatModel for FailingChat {
    async fn complete(&self, _prompt: &Prompt) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(FaqbotError::Llm("rate limit exceeded".to_string()))
    }

    fn model(&self) -> &str {
        "failing-test"
    }
}
