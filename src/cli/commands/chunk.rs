//! Chunk command: split one file and print the result.

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::output::get_formatter;
use crate::models::{Config, OutputFormat};
use crate::services::DocumentProcessor;
use crate::utils::file_name;

#[derive(Debug, Args)]
pub struct ChunkArgs {
    /// File to split (.txt, .pdf or .csv)
    #[arg(required = true)]
    pub path: PathBuf,

    /// Maximum chunk length in characters
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Characters shared between adjacent chunks
    #[arg(long)]
    pub chunk_overlap: Option<usize>,

    /// Stream the file through the upload path, stamping its file name as the source
    #[arg(long)]
    pub upload: bool,
}

pub async fn handle_chunk(args: ChunkArgs, format: OutputFormat, verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let formatter = get_formatter(format);

    let processor =
        DocumentProcessor::with_overrides(&config.processing, args.chunk_size, args.chunk_overlap)
            .context("invalid chunking configuration")?;

    if verbose {
        eprintln!(
            "Splitting {} (chunk_size={}, chunk_overlap={})",
            args.path.display(),
            processor.config().chunk_size,
            processor.config().chunk_overlap
        );
    }

    let (source, chunks) = if args.upload {
        let filename = file_name(&args.path);
        let file = File::open(&args.path)
            .with_context(|| format!("failed to open {}", args.path.display()))?;
        let chunks = processor.process_upload(file, &filename)?;
        (filename, chunks)
    } else {
        let chunks = processor.process_file(&args.path)?;
        (args.path.to_string_lossy().to_string(), chunks)
    };

    print!("{}", formatter.format_chunks(&source, &chunks));
    Ok(())
}
