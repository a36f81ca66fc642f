pub mod cli;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use cli::{Cli, Commands};
pub use error::{EmbeddingError, ErrorKind, IngestError};
pub use models::{Chunk, Config, EmbeddingVector, OutputFormat, ProcessorConfig, RawDocument};
pub use services::{DocumentProcessor, EmbeddingService, ProviderCache};
