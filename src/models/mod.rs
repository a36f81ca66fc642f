mod config;
mod document;
mod output;

pub use config::{
    Config, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DEFAULT_EMBEDDING_BASE_URL,
    DEFAULT_EMBEDDING_MODEL, DEFAULT_STORE_PATH, EmbeddingConfig, ProcessorConfig, StoreConfig,
};
pub use document::{
    Chunk, EmbeddingVector, Metadata, PAGE_KEY, ROW_KEY, RawDocument, SOURCE_KEY, TOTAL_PAGES_KEY,
};
pub use output::OutputFormat;
