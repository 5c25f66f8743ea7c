//! Chunks command: print how the FAQ document splits.

use crate::chunking::{load_and_split, TextSplitter};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the chunks command.
pub async fn run_chunks(settings: Settings) -> Result<()> {
    preflight::check(Operation::Chunks, &settings)?;

    let splitter = TextSplitter::new(
        settings.document.chunk_size,
        settings.document.separator.clone(),
    )?;
    let path = settings.document_path();
    let chunks = load_and_split(&path, &splitter).await?;

    Output::header(&format!("{} ({} chunks)", path.display(), chunks.len()));
    Output::kv("Chunk size", &splitter.chunk_size().to_string());
    Output::kv("Separator", &format!("{:?}", splitter.separator()));
    println!();

    for chunk in &chunks {
        Output::chunk(chunk.order, chunk.offset, chunk.char_len(), &chunk.content);
    }

    let oversized = chunks
        .iter()
        .filter(|c| c.char_len() > splitter.chunk_size())
        .count();
    if oversized > 0 {
        println!();
        Output::warning(&format!(
            "{} chunk(s) exceed the chunk size because a single sentence is longer than it.",
            oversized
        ));
    }

    Ok(())
}
