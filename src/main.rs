//! faqbot CLI entry point.

use anyhow::Result;
use clap::Parser;
use faqbot::cli::{commands, Cli, Commands};
use faqbot::config::Settings;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Credentials may live in a local .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config_path = cli.config.as_ref().map(PathBuf::from);

    // Load configuration
    let settings = Settings::load_from(config_path.as_ref())?;

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| {
            format!("faqbot={level},tower_http={level}", level = log_level)
        })))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Execute command
    match &cli.command {
        Commands::Serve { host, port, index_mode, embedding_provider } => {
            commands::run_serve(host.clone(), *port, *index_mode, *embedding_provider, settings)
                .await?;
        }

        Commands::Ask { question, top_k } => {
            commands::run_ask(question, *top_k, settings).await?;
        }

        Commands::Chunks => {
            commands::run_chunks(settings).await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings)?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings, config_path)?;
        }
    }

    Ok(())
}
