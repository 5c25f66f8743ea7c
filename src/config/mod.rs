//! Configuration module for faqbot.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{PromptTemplate, Prompts};
pub use settings::{
    DocumentSettings, EmbeddingProvider, EmbeddingSettings, GeneralSettings, IndexMode,
    LlmSettings, PromptSettings, RetrievalSettings, ServerSettings, Settings,
};
