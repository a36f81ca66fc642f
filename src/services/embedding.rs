//! Query and document embedding over a cached provider.

use tracing::{debug, info};

use crate::error::EmbeddingError;
use crate::models::{EmbeddingConfig, EmbeddingVector};
use crate::services::provider_cache::{ProviderCache, SharedProvider};

/// Embeds user queries and chunk batches.
#[derive(Clone)]
pub struct EmbeddingService {
    provider: SharedProvider,
    expected_dimension: Option<usize>,
}

impl EmbeddingService {
    /// Resolve the provider for `config` through `cache`.
    pub async fn new(
        cache: &ProviderCache,
        config: &EmbeddingConfig,
    ) -> Result<Self, EmbeddingError> {
        let provider = cache.get_provider(config).await?;
        Ok(Self {
            provider,
            expected_dimension: config.dimension,
        })
    }

    pub fn from_provider(provider: SharedProvider) -> Self {
        let expected_dimension = provider.dimension();
        Self {
            provider,
            expected_dimension,
        }
    }

    pub fn model(&self) -> &str {
        self.provider.name()
    }

    pub async fn embed_query(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        debug!("Embedding query ({} chars)", text.chars().count());
        let vector = self.provider.embed_query(text).await?;
        self.check_dimension(&vector)?;
        Ok(vector)
    }

    /// Embed `texts` in one provider call; the result lines up with the input by position.
    pub async fn embed_documents(
        &self,
        texts: &[String],
    ) -> Result<Vec<EmbeddingVector>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let vectors = self.provider.embed_documents(texts).await?;
        if vectors.len() != texts.len() {
            return Err(EmbeddingError::InvalidResponse(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                vectors.len()
            )));
        }
        for vector in &vectors {
            self.check_dimension(vector)?;
        }

        info!(
            "Embedded {} documents with {}",
            vectors.len(),
            self.provider.name()
        );
        Ok(vectors)
    }

    fn check_dimension(&self, vector: &EmbeddingVector) -> Result<(), EmbeddingError> {
        match self.expected_dimension {
            Some(expected) if vector.len() != expected => Err(EmbeddingError::DimensionMismatch {
                expected,
                actual: vector.len(),
            }),
            _ => Ok(()),
        }
    }
}

impl std::fmt::Debug for EmbeddingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingService")
            .field("model", &self.provider.name())
            .field("expected_dimension", &self.expected_dimension)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::provider::EmbeddingProvider;
    use async_trait::async_trait;
    use std::sync::Arc;

    /// Deterministic provider: vector i encodes the input's char count.
    struct FakeProvider {
        dimension: usize,
        drop_last: bool,
    }

    impl FakeProvider {
        fn vector_for(&self, text: &str) -> EmbeddingVector {
            let mut vector = vec![0.0; self.dimension];
            vector[0] = text.chars().count() as f32;
            vector
        }
    }

    #[async_trait]
    impl EmbeddingProvider for FakeProvider {
        async fn embed_query(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
            Ok(self.vector_for(text))
        }

        async fn embed_documents(
            &self,
            texts: &[String],
        ) -> Result<Vec<EmbeddingVector>, EmbeddingError> {
            let mut vectors: Vec<_> = texts.iter().map(|t| self.vector_for(t)).collect();
            if self.drop_last {
                vectors.pop();
            }
            Ok(vectors)
        }

        fn dimension(&self) -> Option<usize> {
            Some(self.dimension)
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl EmbeddingProvider for FailingProvider {
        async fn embed_query(&self, _text: &str) -> Result<EmbeddingVector, EmbeddingError> {
            Err(EmbeddingError::RateLimited("quota exceeded".to_string()))
        }

        async fn embed_documents(
            &self,
            _texts: &[String],
        ) -> Result<Vec<EmbeddingVector>, EmbeddingError> {
            Err(EmbeddingError::Authentication("invalid key".to_string()))
        }

        fn dimension(&self) -> Option<usize> {
            None
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn fake_service(dimension: usize) -> EmbeddingService {
        EmbeddingService::from_provider(Arc::new(FakeProvider {
            dimension,
            drop_last: false,
        }))
    }

    #[tokio::test]
    async fn test_embed_documents_positional() {
        let service = fake_service(8);
        let texts = vec!["a".to_string(), "bb".to_string(), "ccc".to_string()];

        let vectors = service.embed_documents(&texts).await.unwrap();

        assert_eq!(vectors.len(), 3);
        assert!(vectors.iter().all(|v| v.len() == 8));
        assert_eq!(
            vectors.iter().map(|v| v[0]).collect::<Vec<_>>(),
            vec![1.0, 2.0, 3.0]
        );
    }

    #[tokio::test]
    async fn test_embed_query() {
        let service = fake_service(4);
        let vector = service.embed_query("hello").await.unwrap();
        assert_eq!(vector, vec![5.0, 0.0, 0.0, 0.0]);
        assert_eq!(service.model(), "fake");
    }

    #[tokio::test]
    async fn test_embed_documents_empty() {
        let service = fake_service(4);
        assert!(service.embed_documents(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_count_mismatch_is_invalid_response() {
        let service = EmbeddingService::from_provider(Arc::new(FakeProvider {
            dimension: 4,
            drop_last: true,
        }));
        let texts = vec!["a".to_string(), "b".to_string()];
        let err = service.embed_documents(&texts).await.unwrap_err();
        assert!(matches!(err, EmbeddingError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_configured_dimension_is_enforced() {
        let cache = ProviderCache::new(|_| {
            Ok(Arc::new(FakeProvider {
                dimension: 4,
                drop_last: false,
            }) as SharedProvider)
        });
        let config = EmbeddingConfig {
            dimension: Some(1536),
            ..Default::default()
        };
        let service = EmbeddingService::new(&cache, &config).await.unwrap();

        let err = service.embed_query("hello").await.unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::DimensionMismatch {
                expected: 1536,
                actual: 4
            }
        ));
    }

    #[tokio::test]
    async fn test_provider_errors_propagate() {
        let service = EmbeddingService::from_provider(Arc::new(FailingProvider));

        let err = service.embed_query("q").await.unwrap_err();
        assert!(matches!(err, EmbeddingError::RateLimited(_)));

        let err = service
            .embed_documents(&["x".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, EmbeddingError::Authentication(_)));
    }

    #[tokio::test]
    async fn test_services_share_cached_provider() {
        let cache = ProviderCache::new(|_| {
            Ok(Arc::new(FakeProvider {
                dimension: 4,
                drop_last: false,
            }) as SharedProvider)
        });
        let config = EmbeddingConfig::default();

        let first = EmbeddingService::new(&cache, &config).await.unwrap();
        let second = EmbeddingService::new(&cache, &config).await.unwrap();

        assert!(Arc::ptr_eq(&first.provider, &second.provider));
        assert_eq!(cache.len(), 1);
    }
}
