mod batch;
mod chunker;
mod embedding;
mod loader;
mod processor;
mod provider;
mod provider_cache;
mod vector_store;

pub use batch::process_batch;
pub use chunker::{DEFAULT_SEPARATORS, TextSplitter};
pub use embedding::EmbeddingService;
pub use loader::DocumentFormat;
pub use processor::DocumentProcessor;
pub use provider::{EmbeddingProvider, OpenAiEmbeddings};
pub use provider_cache::{ProviderCache, SharedProvider};
pub use vector_store::{JsonlVectorStore, StoredChunk, VectorStore};
