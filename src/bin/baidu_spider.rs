//! Command-line host for the baidu-search scraper.
//!
//! Runs one search and prints the records. All tracing output goes to
//! stderr so that stdout carries results only (and stays valid JSON with
//! `--json`).

use anyhow::Context;
use baidu_search::{BaiduScraper, RetryPolicy, ScraperConfig, TerminationPolicy};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Scrape Baidu result pages for a keyword query.
#[derive(Parser)]
#[command(name = "baidu-spider", version, about)]
struct Cli {
    /// Search keywords (joined with spaces).
    #[arg(required = true)]
    keywords: Vec<String>,

    /// Number of result pages to walk.
    #[arg(short, long, default_value_t = 1)]
    pages: i64,

    /// Print at most this many records (all when omitted).
    #[arg(short, long)]
    limit: Option<usize>,

    /// Emit records as a JSON array.
    #[arg(long)]
    json: bool,

    /// Search engine landing page.
    #[arg(long, default_value = "https://www.baidu.com")]
    base_url: String,

    /// Retries per page on transient failures.
    #[arg(long, default_value_t = 0)]
    retries: u32,

    /// Count raw result containers, not net-new records, when deciding
    /// whether a page was the last one.
    #[arg(long)]
    raw_termination: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("baidu_search=info,baidu_spider=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = ScraperConfig {
        base_url: cli.base_url.clone(),
        retry: RetryPolicy {
            max_attempts: cli.retries,
            ..Default::default()
        },
        termination: if cli.raw_termination {
            TerminationPolicy::RawContainers
        } else {
            TerminationPolicy::NetNew
        },
        ..Default::default()
    };

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling search");
            on_ctrl_c.cancel();
        }
    });

    let keywords = cli.keywords.join(" ");
    let mut scraper = BaiduScraper::new(config).context("invalid scraper configuration")?;
    let outcome = scraper
        .search_with_cancel(&keywords, cli.pages, &cancel)
        .await;
    scraper.close();
    let records = outcome.context("search failed")?;

    let shown = &records[..cli.limit.unwrap_or(records.len()).min(records.len())];
    if cli.json {
        println!("{}", serde_json::to_string_pretty(shown)?);
        return Ok(());
    }

    println!("{} results", records.len());
    for (i, record) in shown.iter().enumerate() {
        println!();
        println!("[{}] {}", i + 1, record.title);
        println!("    source:  {}", record.source);
        println!("    url:     {}", record.url);
        if !record.content.is_empty() {
            println!("    content: {}", record.content);
        }
    }
    Ok(())
}
