//! Embed a sentence against the server at `TEI_HOST`.
//!
//! `cargo run --example embed -- "some text"`

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tei_client::{ClientConfig, EmbedRequest, EmbeddingService, TeiClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "embed=info,tei_client=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = ClientConfig::from_env()?;
    info!("Using server at {}", config.base_url);

    let client = TeiClient::new(config)?;

    if !client.health().await? {
        anyhow::bail!("server is not healthy");
    }

    let info = client.info().await?;
    info!("Model: {} ({}, v{})", info.model_id, info.model_dtype, info.version);

    let text = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Hello world!".to_string());
    let embeddings = client
        .embed(EmbedRequest::new(text).truncate(true))
        .await
        .context("embed request failed")?;

    let embedding = embeddings.first().context("server returned no embedding")?;
    info!("Dimension: {}", embedding.len());
    info!("Head: {:?}", &embedding[..embedding.len().min(8)]);

    Ok(())
}
