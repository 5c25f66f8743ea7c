//! Pre-flight checks before running the pipeline from the command line.
//!
//! The server skips these. There, missing credentials surface
//! on the first provider call.

use crate::config::Settings;
use crate::error::{FaqbotError, Result};
use crate::openai::api_key_from_env;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Asking questions requires both API keys and the document.
    Ask,
    /// Showing chunks only requires the document.
    Chunks,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    check_document(settings)?;
    match operation {
        Operation::Ask => {
            check_api_key(settings.embedding.key_env())?;
            check_api_key(&settings.llm.api_key_env)?;
        }
        Operation::Chunks => {}
    }
    Ok(())
}

/// Check that an API key variable is set and not empty.
pub fn check_api_key(var: &str) -> Result<()> {
    match api_key_from_env(var) {
        Some(_) => Ok(()),
        None => Err(FaqbotError::MissingCredentials(var.to_string())),
    }
}

/// Check that the FAQ document exists.
pub fn check_document(settings: &Settings) -> Result<()> {
    let path = settings.document_path();
    if path.is_file() {
        Ok(())
    } else {
        Err(FaqbotError::Config(format!(
            "FAQ document not found at {}. Set document.path in the config.",
            path.display()
        )))
    }
}
