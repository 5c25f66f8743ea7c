//! RAG (Retrieval-Augmented Generation) for answering support questions.
//!
//! Retrieves the FAQ chunks closest to a question and hands them, together
//! with the question, to a chat model.

pub mod index;
mod pipeline;
pub mod prompt;

pub use index::RetrievalIndex;
pub use pipeline::{QueryPipeline, RagResponse, Stage};
pub use prompt::{format_context, Prompt, PromptMessage, Role};
