// Operational entry point for the harvesting pipeline

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use harvest::fetch::FirecrawlRenderer;
use harvest::types::FetchConfig;
use harvest::{HarvestConfig, Pipeline, ProviderPool, SqliteStore};

#[derive(Parser, Debug)]
#[command(name = "harvest", about = "Run one batch of the research-harvesting pipeline")]
struct Args {
    /// Maximum number of pending links to process this run
    #[arg(long, default_value_t = 50)]
    limit: usize,

    /// Only claim links at or below this priority (focused runs)
    #[arg(long)]
    max_priority: Option<i32>,

    /// SQLite database path
    #[arg(long, default_value = "data/harvest.db")]
    db: PathBuf,

    /// Directory for downloaded documents
    #[arg(long, default_value = "data/documents")]
    cache_dir: PathBuf,

    /// Seed URL to offer the frontier before the run (repeatable)
    #[arg(long = "seed")]
    seeds: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,harvest=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let pool = ProviderPool::from_env();
    if pool.is_empty() {
        bail!(
            "no reasoning providers configured; set at least one of \
             ANTHROPIC_API_KEY, GROQ_API_KEY, OPENAI_API_KEY"
        );
    }
    tracing::info!(providers = pool.len(), "provider pool ready");

    let renderer = FirecrawlRenderer::from_env().context("Failed to configure page renderer")?;

    let store = SqliteStore::new(&format!("sqlite:{}?mode=rwc", args.db.display()))
        .await
        .context("Failed to open harvest database")?;

    let mut config = HarvestConfig::new()
        .with_batch_limit(args.limit)
        .with_fetch(FetchConfig::new().with_cache_dir(args.cache_dir));
    if let Some(ceiling) = args.max_priority {
        config = config.with_priority_ceiling(ceiling);
    }

    let pipeline = Pipeline::new(store, renderer, pool, config)
        .context("Failed to build pipeline")?;

    if !args.seeds.is_empty() {
        let admitted = pipeline
            .seed(&args.seeds)
            .await
            .context("Failed to seed frontier")?;
        tracing::info!(offered = args.seeds.len(), admitted, "frontier seeded");
    }

    // Ctrl-C finishes the in-flight link, then stops the run
    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, finishing current link");
            signal_cancel.cancel();
        }
    });

    let summary = pipeline.run(cancel).await.context("Harvest run failed")?;

    println!();
    println!("Harvest run complete");
    println!("  scraped:            {}", summary.scraped);
    println!("  failed:             {}", summary.failed);
    println!("  entities inserted:  {}", summary.entities_inserted);
    println!("  entities linked:    {}", summary.entities_linked);
    println!("  documents recorded: {}", summary.documents_recorded);
    println!("  links discovered:   {}", summary.links_discovered);
    println!("  still pending:      {}", summary.remaining_pending);

    Ok(())
}
