//! Command-line driver for docbot.
//!
//! Wires concrete providers and the persistent index once at startup from
//! environment-derived configuration, then exposes `index`, `ask`, and
//! `chat` commands over the library.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use docbot::openai::{OpenAiCompletionProvider, OpenAiEmbeddingProvider};
use docbot::{DiskIndex, DocbotConfig, IndexReport, IndexingPipeline, QaEngine};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "docbot", version, about = "Index internal documents and ask questions about them")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rebuild the vector index from a corpus CSV.
    Index {
        /// Path to the corpus CSV (columns: id, source_link, content).
        #[arg(long, default_value = "./data/kb.csv")]
        corpus: PathBuf,
    },
    /// Ask a single question and print the cited answer.
    Ask {
        /// The question to answer.
        question: String,
    },
    /// Interactive question loop.
    Chat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = DocbotConfig::from_env().context("invalid configuration")?;

    let embedder =
        Arc::new(OpenAiEmbeddingProvider::new(&config.embedding, config.request_timeout)?);
    let index = Arc::new(DiskIndex::open(&config.index_dir).await?);

    match cli.command {
        Command::Index { corpus } => {
            let pipeline = IndexingPipeline::builder()
                .config(config.clone())
                .embedder(embedder)
                .index(index)
                .build()?;
            let report = pipeline.run(&corpus).await?;
            print_report(&report);
        }
        Command::Ask { question } => {
            let engine = build_engine(&config, embedder, index)?;
            println!("{}", engine.query(&question).await?);
        }
        Command::Chat => {
            let engine = build_engine(&config, embedder, index)?;
            chat_loop(&engine).await?;
        }
    }

    Ok(())
}

fn build_engine(
    config: &DocbotConfig,
    embedder: Arc<OpenAiEmbeddingProvider>,
    index: Arc<DiskIndex>,
) -> anyhow::Result<QaEngine> {
    let completer =
        Arc::new(OpenAiCompletionProvider::new(&config.completion, config.request_timeout)?);
    Ok(QaEngine::new(config, embedder, completer, index))
}

fn print_report(report: &IndexReport) {
    println!("Indexing run complete");
    println!("  rows accepted:      {}", report.rows_accepted);
    println!("  rows rejected:      {}", report.rows_rejected);
    println!("  documents embedded: {}", report.documents_embedded);
    println!("  documents indexed:  {}", report.documents_indexed);
    if report.documents_pruned > 0 {
        println!("  documents pruned:   {}", report.documents_pruned);
    }
    for batch in &report.failed_batches {
        println!("  FAILED batch ({}): ids {}", batch.error, batch.ids.join(", "));
    }
}

async fn chat_loop(engine: &QaEngine) -> anyhow::Result<()> {
    let mut editor = DefaultEditor::new()?;
    println!("Ask questions about the indexed documents. Ctrl-D to exit.");

    loop {
        match editor.readline("docbot> ") {
            Ok(line) => {
                let question = line.trim();
                if question.is_empty() {
                    continue;
                }
                editor.add_history_entry(question)?;
                match engine.query(question).await {
                    Ok(answer) => println!("\n{answer}\n"),
                    Err(e) => eprintln!("query failed: {e}"),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
