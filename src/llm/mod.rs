//! Chat-completion providers.

mod openai;

pub use openai::OpenAiCompatibleChat;

use crate::error::Result;
use crate::rag::Prompt;
use async_trait::async_trait;

/// A language model that turns a prompt into text.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Run one non-streaming completion.
    async fn complete(&self, prompt: &Prompt) -> Result<String>;

    /// Model identifier, for logging.
    fn model(&self) -> &str;
}
