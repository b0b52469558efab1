mod progress;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use txt2mp3_core::{
    load_config, load_default_config, select_jobs, validate_config, Config, JobOrchestrator,
    JobsConfig,
};

/// Buffer size for the job event channel
const EVENT_BUFFER_SIZE: usize = 64;

const USAGE: &str = "Please specify input text file or wildcard pattern.
Examples:
  txt2mp3 book.txt
  txt2mp3 *.txt
  txt2mp3 chapters/part-??.txt";

/// Convert text files to MP3 through balcon and ffmpeg.
#[derive(Parser, Debug)]
#[command(name = "txt2mp3", version, about, long_about = None)]
struct Cli {
    /// Text file, wildcard pattern, or path ending in a wildcard pattern
    pattern: Option<String>,

    /// TOML configuration file
    #[arg(long, env = "TXT2MP3_CONFIG")]
    config: Option<PathBuf>,

    /// Exit right after the last job instead of pausing
    #[arg(long)]
    no_pause: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    std::process::exit(run(cli).await);
}

async fn run(cli: Cli) -> i32 {
    let Some(pattern) = cli.pattern.as_deref() else {
        println!("{USAGE}");
        return 0;
    };

    let config = match load(&cli) {
        Ok(config) => config,
        Err(e) => return fatal(&e, JobsConfig::default().fatal_pause_secs).await,
    };

    if let Err(e) = convert(pattern, &config).await {
        return fatal(&e, config.jobs.fatal_pause_secs).await;
    }

    if !cli.no_pause && config.jobs.exit_pause_secs > 0 {
        pause("Pausing", config.jobs.exit_pause_secs).await;
    }
    0
}

fn load(cli: &Cli) -> Result<Config> {
    let config = match &cli.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            load_config(path).with_context(|| format!("Failed to load config from {:?}", path))?
        }
        None => load_default_config().context("Failed to load configuration")?,
    };
    validate_config(&config).context("Configuration validation failed")?;
    Ok(config)
}

async fn convert(pattern: &str, config: &Config) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let selection =
        select_jobs(pattern, &cwd).with_context(|| format!("Failed to select {pattern:?}"))?;

    if selection.is_empty() {
        info!(pattern, "No files matched");
        return Ok(());
    }
    info!(
        jobs = selection.len(),
        source_dir = %selection.source_dir.display(),
        "Starting batch"
    );

    let orchestrator = JobOrchestrator::from_config(config);
    let (tx, rx) = mpsc::channel(EVENT_BUFFER_SIZE);
    let renderer = tokio::spawn(progress::render_events(rx));

    let batch = orchestrator.run_batch(&selection, Some(tx)).await;
    // The sender is gone once run_batch returns, so the renderer drains and stops.
    if let Err(e) = renderer.await {
        error!("Progress renderer failed: {}", e);
    }

    info!(completed = batch.completed.len(), "Batch finished");
    match batch.failure {
        Some(failure) => Err(anyhow::Error::new(failure.error)
            .context(format!("Failed to convert {}", failure.input_file))),
        None => Ok(()),
    }
}

async fn fatal(e: &anyhow::Error, pause_secs: u64) -> i32 {
    error!("Fatal error: {:#}", e);
    println!();
    println!("Error: {e:#}");
    pause("Exiting", pause_secs).await;
    1
}

async fn pause(what: &str, secs: u64) {
    println!("{what} in {secs} seconds...");
    tokio::time::sleep(Duration::from_secs(secs)).await;
}
