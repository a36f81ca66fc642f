//! Process-wide memoization of embedding providers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use sha2::{Digest, Sha256};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::error::EmbeddingError;
use crate::models::EmbeddingConfig;
use crate::services::provider::{EmbeddingProvider, OpenAiEmbeddings};

pub type SharedProvider = Arc<dyn EmbeddingProvider>;

type ProviderFactory =
    Box<dyn Fn(&EmbeddingConfig) -> Result<SharedProvider, EmbeddingError> + Send + Sync>;

/// Identity of a provider: every setting the factory reads, with the
/// credential reduced to a digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ProviderKey {
    model: String,
    credential: Option<String>,
    base_url: String,
    dimension: Option<usize>,
    timeout_secs: u64,
    batch_size: usize,
}

impl ProviderKey {
    fn from_config(config: &EmbeddingConfig) -> Self {
        Self {
            model: config.model.clone(),
            credential: config
                .api_key
                .as_deref()
                .map(|key| hex::encode(Sha256::digest(key.as_bytes()))),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            dimension: config.dimension,
            timeout_secs: config.timeout_secs,
            batch_size: config.batch_size,
        }
    }
}

/// Lazily builds one provider per configuration and hands out shared handles.
///
/// Concurrent first use for the same key runs the factory exactly once; every
/// caller gets the same `Arc`. A failed construction leaves the slot empty so a
/// later call can try again.
pub struct ProviderCache {
    factory: ProviderFactory,
    slots: Mutex<HashMap<ProviderKey, Arc<OnceCell<SharedProvider>>>>,
}

impl ProviderCache {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(&EmbeddingConfig) -> Result<SharedProvider, EmbeddingError> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Cache backed by the OpenAI-compatible HTTP provider.
    pub fn openai() -> Self {
        Self::new(|config| Ok(Arc::new(OpenAiEmbeddings::new(config)?) as SharedProvider))
    }

    pub async fn get_provider(
        &self,
        config: &EmbeddingConfig,
    ) -> Result<SharedProvider, EmbeddingError> {
        let key = ProviderKey::from_config(config);
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
            slots.entry(key).or_default().clone()
        };

        let provider = slot
            .get_or_try_init(|| async {
                info!("Constructing embedding provider for model {}", config.model);
                (self.factory)(config)
            })
            .await?;

        debug!("Using embedding provider {}", provider.name());
        Ok(Arc::clone(provider))
    }

    /// Number of constructed providers.
    pub fn len(&self) -> usize {
        let slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.values().filter(|slot| slot.initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ProviderCache {
    fn default() -> Self {
        Self::openai()
    }
}

impl std::fmt::Debug for ProviderCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderCache")
            .field("providers", &self.len())
            .finish()
    }
}
