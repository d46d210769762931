//! PagePilot CLI host
//!
//! `serve` attaches the engine to a page fixture and speaks the message
//! surface over stdio, one JSON request per line; `inspect` runs a single
//! extraction and prints the inventory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use dom_host::PageFixture;
use pagepilot_cli::{handle_line, Engine, EngineConfig};

#[derive(Parser)]
#[command(name = "pagepilot", version, about = "In-page interaction engine for planning agents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Speak the engine protocol over stdin/stdout against a page fixture
    Serve {
        /// Page fixture (YAML or JSON)
        #[arg(long)]
        page: PathBuf,

        /// Optional engine config overrides (YAML)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Extract the feature inventory once and print it
    Inspect {
        /// Page fixture (YAML or JSON)
        #[arg(long)]
        page: PathBuf,

        /// Optional engine config overrides (YAML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print compact JSON instead of pretty
        #[arg(long)]
        compact: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { page, config } => {
            let engine = build_engine(&page, config.as_deref())?;
            serve(engine).await
        }
        Command::Inspect {
            page,
            config,
            compact,
        } => {
            let engine = build_engine(&page, config.as_deref())?;
            let inventory = engine.get_features();
            let rendered = if compact {
                serde_json::to_string(&inventory)?
            } else {
                serde_json::to_string_pretty(&inventory)?
            };
            println!("{rendered}");
            Ok(())
        }
    }
}

fn init_tracing() {
    // Logs go to stderr; stdout carries only protocol responses.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn build_engine(page: &Path, config: Option<&Path>) -> Result<Engine> {
    let fixture = PageFixture::load(page)
        .with_context(|| format!("loading page fixture {}", page.display()))?;
    let config = match config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading engine config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    Ok(Engine::new(fixture.into_document(), config))
}

async fn serve(engine: Engine) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    info!(url = %engine.doc().url(), "engine ready, one JSON request per line");

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let response = handle_line(&engine, line).await;
        stdout
            .write_all(serde_json::to_string(&response)?.as_bytes())
            .await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }
    info!("input closed, shutting down");
    Ok(())
}
