use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use transcript_scraper::cli::{Cli, Commands};
use transcript_scraper::config::Config;
use transcript_scraper::{output, server, TranscriptPipeline};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) if path.exists() => Config::load_from(path)?,
        Some(_) => Config::default(),
        None => Config::load()?,
    };

    // Initialize tracing
    let default_filter = if cli.verbose {
        "transcript_scraper=debug".to_string()
    } else {
        config.logging.filter.clone()
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Transcribe {
            url,
            output,
            format,
            language,
            timestamps,
        } => {
            let pipeline = TranscriptPipeline::new(&config.scraper)?;
            let language = language.or_else(|| config.scraper.preferred_language.clone());

            let spinner = if cli.quiet {
                ProgressBar::hidden()
            } else {
                let spinner = ProgressBar::new_spinner();
                spinner.set_style(
                    ProgressStyle::default_spinner()
                        .template("{spinner:.green} {msg}")
                        .context("Invalid spinner template")?,
                );
                spinner.enable_steady_tick(Duration::from_millis(100));
                spinner
            };
            spinner.set_message(format!("Fetching transcript for {}", url));

            let result = pipeline.fetch_transcript_in(&url, language.as_deref()).await;
            spinner.finish_and_clear();
            let result = result?;

            match output {
                Some(path) => {
                    output::save_to_file(&result, &path, &format, timestamps)?;
                    println!("Transcript saved to: {}", path.display());
                }
                None => {
                    output::print_to_console(&result, &format, timestamps)?;
                }
            }
        }
        Commands::Serve { bind } => {
            let addr = match bind {
                Some(bind) => bind
                    .parse::<SocketAddr>()
                    .with_context(|| format!("Invalid bind address: {}", bind))?,
                None => config.bind_address()?,
            };

            let pipeline = Arc::new(TranscriptPipeline::new(&config.scraper)?);
            server::serve(pipeline, addr).await?;
        }
        Commands::Config { show, init } => {
            if init {
                let path = match &cli.config {
                    Some(path) => {
                        config.save_to(path)?;
                        path.clone()
                    }
                    None => config.save()?,
                };
                println!("Configuration written to: {}", path.display());
            }
            if show || !init {
                config.display();
            }
        }
    }

    Ok(())
}
