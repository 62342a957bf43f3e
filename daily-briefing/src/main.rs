use anyhow::Context;
use clap::Parser;
use daily_briefing::{BriefingConfig, BriefingService, Category};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Print the ranked news digest for a category as JSON.
#[derive(Debug, Parser)]
#[command(name = "daily-briefing", version)]
struct Cli {
    /// Digest category: `world` or `legal-tech`
    category: String,

    /// Per-feed fetch timeout, overrides BRIEFING_FETCH_TIMEOUT_SECS
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Digest cache lifetime, overrides BRIEFING_CACHE_TTL_SECS
    #[arg(long)]
    cache_ttl_secs: Option<u64>,

    /// Request the digest this many times against one service instance
    #[arg(long, default_value_t = 1)]
    repeat: u32,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let category: Category = cli.category.parse()?;

    let mut config = BriefingConfig::from_env().context("loading configuration")?;
    if let Some(timeout) = cli.timeout_secs {
        config.fetch.timeout_seconds = timeout;
    }
    if let Some(ttl) = cli.cache_ttl_secs {
        config.cache_ttl_secs = ttl;
    }

    info!(
        "Starting daily briefing for {} (timeout {}s, cache {}s)",
        category, config.fetch.timeout_seconds, config.cache_ttl_secs
    );

    let service = BriefingService::from_config(&config).context("building briefing service")?;

    for _ in 0..cli.repeat.max(1) {
        let response = match service.get_news(category).await {
            Ok(response) => response,
            Err(e) => {
                error!("Failed to fetch news: {}", e);
                return Err(e.into());
            }
        };

        println!("{}", response.to_json(cli.pretty)?);
    }

    Ok(())
}
