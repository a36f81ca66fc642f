//! Vector store sink for embedded chunk batches.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tracing::info;
use uuid::Uuid;

use crate::error::VectorStoreError;
use crate::models::{Chunk, EmbeddingVector, Metadata};
use crate::utils::calculate_checksum;

/// Destination for chunks and their vectors.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Store `chunks` with their positionally aligned `vectors`, returning one id per chunk.
    async fn add_chunks(
        &self,
        chunks: &[Chunk],
        vectors: &[EmbeddingVector],
    ) -> Result<Vec<String>, VectorStoreError>;
}

/// One stored line of a [`JsonlVectorStore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredChunk {
    pub id: String,
    pub text: String,
    pub metadata: Metadata,
    pub vector: EmbeddingVector,
    pub created_at: String,
}

impl StoredChunk {
    /// Content-addressed id: the same text with the same metadata (source, page,
    /// row) maps to the same id no matter which batch carries it.
    pub fn generate_id(chunk: &Chunk) -> Result<String, VectorStoreError> {
        let name = format!(
            "{}:{}",
            serde_json::to_string(&chunk.metadata)?,
            calculate_checksum(&chunk.text)
        );
        Ok(Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()).to_string())
    }
}

/// Appends one JSON object per chunk to a file.
#[derive(Debug, Clone)]
pub struct JsonlVectorStore {
    path: PathBuf,
}

impl JsonlVectorStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every stored record back.
    pub async fn read_all(&self) -> Result<Vec<StoredChunk>, VectorStoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(VectorStoreError::from))
            .collect()
    }
}

#[async_trait]
impl VectorStore for JsonlVectorStore {
    async fn add_chunks(
        &self,
        chunks: &[Chunk],
        vectors: &[EmbeddingVector],
    ) -> Result<Vec<String>, VectorStoreError> {
        if chunks.len() != vectors.len() {
            return Err(VectorStoreError::CountMismatch {
                chunks: chunks.len(),
                vectors: vectors.len(),
            });
        }
        if chunks.is_empty() {
            return Ok(Vec::new());
        }

        let now = chrono::Utc::now().to_rfc3339();
        let mut buffer = String::new();
        let mut ids = Vec::with_capacity(chunks.len());

        for (chunk, vector) in chunks.iter().zip(vectors) {
            let record = StoredChunk {
                id: StoredChunk::generate_id(chunk)?,
                text: chunk.text.clone(),
                metadata: chunk.metadata.clone(),
                vector: vector.clone(),
                created_at: now.clone(),
            };
            buffer.push_str(&serde_json::to_string(&record)?);
            buffer.push('\n');
            ids.push(record.id);
        }

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(buffer.as_bytes()).await?;
        file.flush().await?;

        info!("Stored {} chunks in {}", ids.len(), self.path.display());
        Ok(ids)
    }
}
