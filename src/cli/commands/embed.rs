use anyhow::{Context, Result};
use clap::Args;

use crate::cli::output::{EmbeddingInfo, get_formatter};
use crate::models::{Config, OutputFormat};
use crate::services::{EmbeddingService, ProviderCache};

#[derive(Debug, Args)]
pub struct EmbedArgs {
    /// Query text to embed
    #[arg(required = true)]
    pub text: String,
}

pub async fn handle_embed(args: EmbedArgs, format: OutputFormat, _verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let formatter = get_formatter(format);

    let cache = ProviderCache::default();
    let service = EmbeddingService::new(&cache, &config.embedding)
        .await
        .context("failed to initialize embedding provider")?;

    let vector = service
        .embed_query(&args.text)
        .await
        .context("failed to embed query")?;

    let info = EmbeddingInfo {
        model: service.model().to_string(),
        text: args.text,
        vector,
    };
    print!("{}", formatter.format_embedding(&info));

    Ok(())
}
