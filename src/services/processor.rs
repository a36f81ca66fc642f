//! Document processor: extension validation, upload staging, loading and splitting.

use std::io::{self, Read, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{ConfigError, IngestError};
use crate::models::{Chunk, ProcessorConfig, RawDocument};
use crate::services::chunker::TextSplitter;
use crate::services::loader::DocumentFormat;

const UPLOAD_PREFIX: &str = "docingest-upload-";

/// Turns files and uploaded byte streams into chunk batches.
#[derive(Debug, Clone)]
pub struct DocumentProcessor {
    config: ProcessorConfig,
    splitter: TextSplitter,
}

impl DocumentProcessor {
    pub fn new(config: ProcessorConfig) -> Result<Self, ConfigError> {
        info!("Initializing DocumentProcessor...");
        let splitter = TextSplitter::new(&config)?;
        info!(
            "DocumentProcessor initialized with chunk_size={}, chunk_overlap={}",
            config.chunk_size, config.chunk_overlap
        );
        Ok(Self { config, splitter })
    }

    /// Build from process-wide defaults, with optional explicit chunk settings.
    pub fn with_overrides(
        defaults: &ProcessorConfig,
        chunk_size: Option<usize>,
        chunk_overlap: Option<usize>,
    ) -> Result<Self, ConfigError> {
        Self::new(defaults.with_overrides(chunk_size, chunk_overlap))
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Load raw units from `path` after checking its extension.
    pub fn load_file(&self, path: &Path) -> Result<Vec<RawDocument>, IngestError> {
        let format = DocumentFormat::detect(path)?;
        format.load(path)
    }

    pub fn split_documents(&self, documents: &[RawDocument]) -> Vec<Chunk> {
        self.splitter.split_documents(documents)
    }

    /// Load and split a file into chunks.
    pub fn process_file(&self, path: &Path) -> Result<Vec<Chunk>, IngestError> {
        let documents = self.load_file(path)?;
        Ok(self.split_documents(&documents))
    }

    /// Stage an uploaded stream on disk and load it, stamping `filename` as the source.
    ///
    /// The staged file keeps the upload's extension and is removed before this
    /// call returns. On success a failed removal is reported as a `Resource`
    /// error; on failure the load error wins and removal is best effort.
    pub fn load_upload<R: Read>(
        &self,
        mut reader: R,
        filename: &str,
    ) -> Result<Vec<RawDocument>, IngestError> {
        let format = DocumentFormat::detect(Path::new(filename))?;

        let suffix = format!(".{}", format.extension());
        let mut builder = tempfile::Builder::new();
        builder.prefix(UPLOAD_PREFIX).suffix(&suffix);
        let mut staged = match &self.config.upload_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(|e| IngestError::Resource(format!("failed to create temporary file: {}", e)))?;

        let written = std::io::copy(&mut reader, &mut staged)?;
        staged.flush()?;
        debug!(
            "Staged upload {} ({} bytes) at {}",
            filename,
            written,
            staged.path().display()
        );

        let mut documents = self.load_file(staged.path())?;
        release(staged)?;
        for document in &mut documents {
            document.set_source(filename);
        }

        Ok(documents)
    }

    /// Stage, load and split an uploaded stream.
    pub fn process_upload<R: Read>(
        &self,
        reader: R,
        filename: &str,
    ) -> Result<Vec<Chunk>, IngestError> {
        let documents = self.load_upload(reader, filename)?;
        Ok(self.split_documents(&documents))
    }
}

/// Remove a staged upload. A file already gone counts as removed.
fn release(staged: NamedTempFile) -> Result<(), IngestError> {
    match staged.close() {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(IngestError::Resource(format!(
            "failed to remove temporary file: {}",
            e
        ))),
    }
}
