use anyhow::{Context, Result};

use crate::models::Chunk;
use crate::services::{EmbeddingService, VectorStore};

/// Embed a pending chunk batch and hand it to the store, draining `chunks`.
pub async fn process_batch(
    embedding_service: &EmbeddingService,
    store: &dyn VectorStore,
    chunks: &mut Vec<Chunk>,
) -> Result<Vec<String>> {
    if chunks.is_empty() {
        return Ok(Vec::new());
    }

    let batch = std::mem::take(chunks);
    let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();

    let embeddings = embedding_service
        .embed_documents(&texts)
        .await
        .context("failed to generate embeddings")?;

    store
        .add_chunks(&batch, &embeddings)
        .await
        .context("failed to store chunks")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EmbeddingError;
    use crate::models::{EmbeddingVector, RawDocument};
    use crate::services::{EmbeddingProvider, JsonlVectorStore};
    use async_trait::async_trait;
    use std::sync::Arc;
    use tempfile::TempDir;

    struct UnitProvider;

    #[async_trait]
    impl EmbeddingProvider for UnitProvider {
        async fn embed_query(&self, _text: &str) -> Result<EmbeddingVector, EmbeddingError> {
            Ok(vec![1.0, 0.0])
        }

        async fn embed_documents(
            &self,
            texts: &[String],
        ) -> Result<Vec<EmbeddingVector>, EmbeddingError> {
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        }

        fn dimension(&self) -> Option<usize> {
            Some(2)
        }

        fn name(&self) -> &str {
            "unit"
        }
    }

    #[tokio::test]
    async fn test_process_batch_drains_and_stores() {
        let dir = TempDir::new().unwrap();
        let store = JsonlVectorStore::new(dir.path().join("chunks.jsonl"));
        let service = EmbeddingService::from_provider(Arc::new(UnitProvider));

        let parent = RawDocument::new("", "a.txt");
        let mut pending = vec![
            Chunk::from_parent(&parent, "one".to_string()),
            Chunk::from_parent(&parent, "two".to_string()),
        ];

        let ids = process_batch(&service, &store, &mut pending).await.unwrap();

        assert_eq!(ids.len(), 2);
        assert!(pending.is_empty());
        assert_eq!(store.read_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_process_batch_empty_is_noop() {
        let dir = TempDir::new().unwrap();
        let store = JsonlVectorStore::new(dir.path().join("chunks.jsonl"));
        let service = EmbeddingService::from_provider(Arc::new(UnitProvider));

        let ids = process_batch(&service, &store, &mut Vec::new()).await.unwrap();
        assert!(ids.is_empty());
        assert!(!store.path().exists());
    }
}
