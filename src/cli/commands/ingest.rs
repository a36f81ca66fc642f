//! Ingest command implementation.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;
use walkdir::WalkDir;

use crate::cli::output::{IngestStats, get_formatter};
use crate::models::{Config, OutputFormat};
use crate::services::{
    DocumentFormat, DocumentProcessor, EmbeddingService, JsonlVectorStore, ProviderCache,
    process_batch,
};

#[derive(Debug, Args)]
pub struct IngestArgs {
    /// File or directory to ingest
    #[arg(required = true)]
    pub path: PathBuf,

    /// File patterns to exclude (can be specified multiple times)
    #[arg(long, short = 'e')]
    pub exclude: Vec<String>,

    /// JSONL file receiving embedded chunks (defaults to store.path)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Show what would be ingested without embedding or storing anything
    #[arg(long)]
    pub dry_run: bool,
}

pub async fn handle_ingest(args: IngestArgs, format: OutputFormat, verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let formatter = get_formatter(format);
    let start_time = Instant::now();

    let path = args.path.canonicalize().context("invalid path")?;
    let files = collect_files(&path, &args.exclude, &config.processing.exclude_patterns)?;

    if files.is_empty() {
        println!("{}", formatter.format_message("No files found to ingest."));
        return Ok(());
    }

    let (supported, unsupported): (Vec<PathBuf>, Vec<PathBuf>) = files
        .into_iter()
        .partition(|p| DocumentFormat::detect(p).is_ok());

    if verbose {
        eprintln!(
            "Found {} supported files ({} unsupported)",
            supported.len(),
            unsupported.len()
        );
    }

    if args.dry_run {
        println!(
            "{}",
            formatter.format_message(&format!(
                "Dry run: Would ingest {} files",
                supported.len()
            ))
        );
        for file in &supported {
            println!("  {}", file.display());
        }
        return Ok(());
    }

    let processor = DocumentProcessor::new(config.processing.clone())
        .context("invalid chunking configuration")?;
    let cache = ProviderCache::default();
    let embedding_service = EmbeddingService::new(&cache, &config.embedding)
        .await
        .context("failed to initialize embedding provider")?;
    let store = JsonlVectorStore::new(args.output.unwrap_or_else(|| config.store.path.clone()));

    let pb = ProgressBar::new(supported.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )
            .context("invalid progress template")?
            .progress_chars("#>-"),
    );

    let mut stats = IngestStats {
        files_scanned: (supported.len() + unsupported.len()) as u64,
        files_skipped: unsupported.len() as u64,
        ..Default::default()
    };

    let batch_size = config.embedding.batch_size;
    let mut pending_chunks = Vec::new();

    for file_path in &supported {
        pb.inc(1);

        let chunks = match processor.process_file(file_path) {
            Ok(chunks) => chunks,
            Err(e) => {
                warn!("Failed to ingest {}: {}", file_path.display(), e);
                if verbose {
                    pb.println(format!("Skipping {}: {}", file_path.display(), e));
                }
                stats.files_failed += 1;
                continue;
            }
        };

        stats.files_ingested += 1;
        stats.chunks_created += chunks.len() as u64;
        pending_chunks.extend(chunks);

        if pending_chunks.len() >= batch_size {
            let ids = process_batch(&embedding_service, &store, &mut pending_chunks).await?;
            stats.chunks_stored += ids.len() as u64;
        }
    }

    if !pending_chunks.is_empty() {
        let ids = process_batch(&embedding_service, &store, &mut pending_chunks).await?;
        stats.chunks_stored += ids.len() as u64;
    }

    pb.finish_and_clear();
    stats.duration_ms = start_time.elapsed().as_millis() as u64;
    print!("{}", formatter.format_ingest_stats(&stats));

    Ok(())
}

fn collect_files(path: &Path, exclude: &[String], default_exclude: &[String]) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let patterns: Vec<glob::Pattern> = exclude
        .iter()
        .chain(default_exclude.iter())
        .map(|p| glob::Pattern::new(p).with_context(|| format!("invalid exclude pattern: {}", p)))
        .collect::<Result<_>>()?;

    let mut files = Vec::new();
    for entry in WalkDir::new(path).follow_links(false).sort_by_file_name() {
        let entry = entry.context("failed to read directory entry")?;
        let entry_path = entry.path();

        if !entry.file_type().is_file() {
            continue;
        }

        let path_str = entry_path.to_string_lossy();
        if patterns.iter().any(|p| p.matches(&path_str)) {
            continue;
        }

        files.push(entry_path.to_path_buf());
    }

    Ok(files)
}
