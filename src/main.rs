use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use tidings::aggregator::Aggregator;
use tidings::cli;
use tidings::config::Config;
use tidings::feed::HttpFeedParser;
use tidings::storage::{ArticleStore, FeedStore};

/// Get the default config file path (~/.config/tidings/config.toml)
fn default_config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("tidings")
        .join("config.toml"))
}

#[derive(Parser, Debug)]
#[command(name = "tidings", about = "Terminal RSS aggregator with deduplicating fetch")]
struct Args {
    /// Path to the config file (default: ~/.config/tidings/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .user_agent(&config.user_agent)
        .build()
        .context("failed to build HTTP client")?;
    let parser = HttpFeedParser::new(client, config.max_body_bytes);

    let aggregator = Aggregator::new(FeedStore::new(), ArticleStore::new(), parser);

    cli::run(&aggregator, config.refresh_concurrency).await?;

    println!("Goodbye!");
    Ok(())
}
