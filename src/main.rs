use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use arxiv_digest::ai::Enricher;
use arxiv_digest::api::{self, AppContext};
use arxiv_digest::config::Config;
use arxiv_digest::db::Repository;
use arxiv_digest::error::Result;
use arxiv_digest::feed::FeedIngestor;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load()?;

    let repo = Repository::open(&config.db_path).await?;
    repo.init().await?;

    let feed_client = Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .user_agent("arxiv-digest/1.0")
        .build()?;

    let llm_client = Client::builder()
        .timeout(Duration::from_secs(60))
        .build()?;

    let api_key = config.mistral_api_key.clone().unwrap_or_default();
    if api_key.is_empty() {
        tracing::warn!(
            "No Mistral API key configured; enrichment requests will persist empty results"
        );
    }

    let ctx = AppContext {
        repo: Arc::new(repo),
        ingestor: Arc::new(FeedIngestor::new(feed_client)),
        enricher: Arc::new(
            Enricher::new(llm_client, api_key).with_base_url(config.mistral_api_url.clone()),
        ),
        feed_urls: Arc::new(config.feed_urls.clone()),
        fetch_limit: config.fetch_limit,
    };

    api::run(ctx, &config.listen_addr).await
}
