//! quill - durable whole-file saves from the command line
//!
//! Usage:
//!   quill save --dir ./data --file hello.txt [--strategy atomic|in-place] [--config quill.json] "Hello, World!"
//!   quill sweep --dir ./data --file hello.txt [--min-age-secs 60] [--config quill.json]
//!   quill demo [--dir ./cmd/files]

use std::env;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use quill_core::app::{
    AsyncSaver, BlockingSaver, OrphanSweeper, SaverBuilder, Strategy, WriterConfig,
};
use quill_core::impls::{AtomicReplaceWriter, InPlaceWriter};

#[derive(Parser)]
#[command(name = "quill", version, about = "Durable whole-file saves")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Save a payload to <dir>/<file>
    Save {
        #[arg(long)]
        dir: PathBuf,
        #[arg(long)]
        file: String,
        /// in-place or atomic (overrides the config file)
        #[arg(long)]
        strategy: Option<Strategy>,
        /// JSON writer config
        #[arg(long)]
        config: Option<PathBuf>,
        payload: String,
    },
    /// Remove temp files left behind by interrupted saves
    Sweep {
        #[arg(long)]
        dir: PathBuf,
        #[arg(long)]
        file: String,
        /// Only remove temp files at least this old
        #[arg(long, default_value = "60")]
        min_age_secs: u64,
        /// JSON writer config (temp marker and suffix kind of the saves to clean up)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Save "Hello, World!" in place, then "Bye, World!" atomically
    Demo {
        #[arg(long, default_value = "./cmd/files/")]
        dir: PathBuf,
    },
}

#[derive(Serialize)]
struct SaveSummary<'a> {
    path: PathBuf,
    strategy: &'a str,
    bytes: usize,
}

fn init_logging() {
    let filter = match env::var("QUILL_LOG") {
        Ok(level) if !level.trim().is_empty() => EnvFilter::new(level),
        _ => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

async fn save(
    dir: PathBuf,
    file: String,
    strategy: Option<Strategy>,
    config: Option<PathBuf>,
    payload: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match config {
        Some(path) => WriterConfig::from_json_file(&path)?,
        None => WriterConfig::default(),
    };
    if let Some(strategy) = strategy {
        config.strategy = strategy;
    }

    let saver = BlockingSaver::new(SaverBuilder::from_config(config).build()?);
    let strategy = saver.inner().strategy_name();
    let bytes = payload.len();
    let path = dir.join(&file);
    saver.save(dir, file, payload.into_bytes()).await?;

    let summary = SaveSummary {
        path,
        strategy,
        bytes,
    };
    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}

fn sweep(
    dir: PathBuf,
    file: String,
    min_age_secs: u64,
    config: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = match config {
        Some(path) => WriterConfig::from_json_file(&path)?,
        None => WriterConfig::default(),
    };
    let sweeper = OrphanSweeper::from_config(&config)?;
    let report = sweeper.sweep(&dir, &file, Duration::from_secs(min_age_secs))?;
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}

async fn demo(dir: PathBuf) {
    let file = "hello_world.txt";

    let in_place = BlockingSaver::new(InPlaceWriter::new());
    if let Err(e) = in_place
        .save(dir.clone(), file.to_string(), b"Hello, World!".to_vec())
        .await
    {
        tracing::error!("NOT CREATED! {e}");
    }

    // atomic に更新する
    let atomic = BlockingSaver::new(AtomicReplaceWriter::new());
    if let Err(e) = atomic
        .save(dir, file.to_string(), b"Bye, World!".to_vec())
        .await
    {
        tracing::error!("NOT EDITED! {e}");
    }
}

#[tokio::main]
async fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Save {
            dir,
            file,
            strategy,
            config,
            payload,
        } => save(dir, file, strategy, config, payload).await,
        Command::Sweep {
            dir,
            file,
            min_age_secs,
            config,
        } => sweep(dir, file, min_age_secs, config),
        Command::Demo { dir } => {
            demo(dir).await;
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
