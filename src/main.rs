mod batch;
mod config;
mod error;
mod input;
mod parser;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::Settings;

#[derive(Parser)]
#[command(name = "chorus_ingest", about = "Turn saved lyric/tab pages into {title, chorus} JSONL")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse local HTML files into JSONL records
    Ingest {
        /// Directory or glob of HTML files (e.g. "html/*.html")
        #[arg(short, long)]
        input: String,
        /// Output JSONL path
        #[arg(short, long)]
        output: PathBuf,
        /// Max files to process (default: all)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Print records from a JSONL file in the generator's prompt layout
    Preview {
        /// JSONL file written by `ingest`
        #[arg(short, long)]
        data: PathBuf,
        /// Max records to show
        #[arg(short = 'n', long, default_value = "5")]
        limit: usize,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();
    let settings = Settings::load();
    info!(?settings, "settings loaded");

    let t0 = Instant::now();

    match cli.command {
        Commands::Ingest {
            input,
            output,
            limit,
        } => {
            let files = input::resolve(&input, limit)?;
            if files.is_empty() {
                println!("No HTML files matched {input:?}.");
            } else {
                println!("Processing {} files...", files.len());
            }
            let counts = batch::run(&files, &output, &settings)?;
            counts.print(&output);
        }
        Commands::Preview { data, limit } => {
            let records = batch::read_records(&data)?;
            for (i, record) in records.iter().take(limit).enumerate() {
                println!("=== [{}] ===\n{}", i + 1, record.training_text());
            }
            println!("{} records in {}", records.len(), data.display());
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }
    Ok(())
}
