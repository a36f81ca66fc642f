//! CLI module for the document ingestion tool.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

use crate::models::OutputFormat;

/// Split documents into chunks and embed them for retrieval pipelines.
#[derive(Debug, Parser)]
#[command(name = "docingest")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[arg(
        long,
        short = 'f',
        global = true,
        help = "Output format: text, json, or markdown"
    )]
    pub format: Option<OutputFormat>,

    #[arg(long, short = 'v', global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Load and split a single file, printing its chunks
    Chunk(commands::ChunkArgs),

    /// Load, split, embed and store a file or directory
    Ingest(commands::IngestArgs),

    /// Embed a query string
    Embed(commands::EmbedArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::ConfigCommand),
}

// FromStr is implemented in models::output
