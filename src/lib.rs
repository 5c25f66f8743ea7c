//! faqbot - Retrieval-Augmented Customer Support
//!
//! A small HTTP service that answers customer questions from a single FAQ
//! document.
//!
//! # Overview
//!
//! For every question faqbot:
//! - Loads the FAQ document and splits it into short sentence-aligned chunks
//! - Embeds the chunks and keeps them in an in-memory retrieval index
//! - Finds the chunks most similar to the question
//! - Asks a hosted chat model to answer using those chunks as context
//!
//! # Architecture
//!
//! - `config` - Settings and prompt templates
//! - `chunking` - Document loading and character splitting
//! - `embedding` - Embedding providers
//! - `vector_store` - In-memory similarity search
//! - `llm` - Chat-completion providers
//! - `rag` - Retrieval index, prompt assembly and the query pipeline
//! - `server` - HTTP API
//!
//! # Example
//!
//! ```rust,no_run
//! use faqbot::config::Settings;
//! use faqbot::rag::QueryPipeline;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let pipeline = QueryPipeline::from_settings(&settings)?;
//!
//!     let response = pipeline.query("What is the return policy?").await?;
//!     println!("{}", response.answer);
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod llm;
pub mod openai;
pub mod rag;
pub mod server;
pub mod vector_store;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{FaqbotError, Result};
