//! CLI module for faqbot.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use crate::config::{EmbeddingProvider, IndexMode};
use clap::{Parser, Subcommand};

/// faqbot - a retrieval-augmented customer support bot
///
/// Answers questions from a single FAQ document using embedding search and
/// a hosted chat model.
#[derive(Parser, Debug)]
#[command(name = "faqbot")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "FAQBOT_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Host to bind to (defaults to server.host from the config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (defaults to server.port from the config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Index lifecycle: cached or per-request
        #[arg(long)]
        index_mode: Option<IndexMode>,

        /// Embedding backend: huggingface or openai
        #[arg(long)]
        embedding_provider: Option<EmbeddingProvider>,
    },

    /// Ask a single question from the command line
    Ask {
        /// The question to ask
        question: String,

        /// Number of FAQ chunks to use as context
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Show how the FAQ document is split into chunks
    Chunks,

    /// Check the FAQ document and API credentials
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write the current configuration to the config file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}
