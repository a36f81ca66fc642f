mod chunk;
mod config;
mod embed;
mod ingest;

pub use chunk::ChunkArgs;
pub use config::ConfigCommand;
pub use embed::EmbedArgs;
pub use ingest::IngestArgs;

pub use chunk::handle_chunk;
pub use config::handle_config;
pub use embed::handle_embed;
pub use ingest::handle_ingest;
