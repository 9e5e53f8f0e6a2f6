use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use folio::config::Config;
use folio::error::Result;
use folio::index::IndexEngine;

mod ingest;
mod search;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Index PDF and DOCX documents and search their text")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output as JSON")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Extract and index documents")]
    Ingest {
        #[arg(required = true, help = "PDF or DOCX files to index")]
        files: Vec<PathBuf>,

        #[arg(long, help = "Process each file inline instead of through the work queue")]
        sync: bool,
    },

    #[command(about = "Search indexed documents")]
    Search {
        #[arg(help = "Search query", default_value = "")]
        query: String,

        #[arg(long = "type", help = "Restrict to a document type: PDF or DOCX")]
        doc_type: Option<String>,

        #[arg(long, help = "Maximum results to return")]
        limit: Option<usize>,
    },
}

pub async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    folio::logging::init(config.log_filter());

    match cli.command {
        Commands::Ingest { files, sync } => ingest::run(&config, files, sync, cli.json).await,
        Commands::Search {
            query,
            doc_type,
            limit,
        } => search::run(&config, &query, doc_type.as_deref(), limit, cli.json).await,
    }
}

fn open_index(config: &Config) -> Result<Arc<IndexEngine>> {
    let engine = if config.index.in_memory {
        IndexEngine::in_memory(config.index.writer_memory)?
    } else {
        IndexEngine::open_in_dir(&config.index.resolved_path(), config.index.writer_memory)?
    };
    Ok(Arc::new(engine))
}

/// Cancels the returned token on Ctrl-C.
fn shutdown_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, shutting down");
            trigger.cancel();
        }
    });
    token
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
