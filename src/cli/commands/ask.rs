//! Ask command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::rag::QueryPipeline;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(question: &str, top_k: Option<usize>, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Ask, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'faqbot doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let mut pipeline = QueryPipeline::from_settings(&settings)?;
    if let Some(k) = top_k {
        pipeline = pipeline.with_top_k(k);
    }

    let spinner = Output::spinner("Searching the FAQ...");

    match pipeline.query(question).await {
        Ok(response) => {
            spinner.finish_and_clear();

            println!("\n{}\n", response.answer);

            if !response.sources.is_empty() {
                Output::header("Sources");
                for (rank, source) in response.sources.iter().enumerate() {
                    Output::source(rank + 1, source.score, source.content());
                }
            }
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to generate answer: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
