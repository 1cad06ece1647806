use anyhow::Result;
use std::path::Path;
use tracing::info;

use goldpulse::config::Config;
use goldpulse::db::SocialCache;
use goldpulse::orchestrator::{
    NewsOrchestrator, SnapshotOrchestrator, SocialOrchestrator, SummaryOrchestrator,
};

/// Rebuild daily snapshots and the monthly indicators artifact
pub fn snapshots(config: Config) -> Result<()> {
    let result = SnapshotOrchestrator::new(config).run()?;
    result.display_summary();
    Ok(())
}

/// Convert the snapshot folder into text summaries
pub fn summaries(config: Config) -> Result<()> {
    let result = SummaryOrchestrator::new(config).run()?;
    result.display_summary();
    if result.errors > 0 {
        info!(errors = result.errors, "Some snapshots could not be converted");
    }
    Ok(())
}

pub fn news(config: Config, input: &Path) -> Result<()> {
    let (layer, path) = NewsOrchestrator::new(config).run(input)?;

    println!("\n=== NEWS SENTIMENT LAYER ===");
    for block in [&layer.d30, &layer.d7, &layer.h24] {
        println!(
            "{}: {} articles, {} contradictions",
            block.timeframe,
            block.total_articles,
            block.contradictions.len()
        );
    }
    println!("Saved to {}", path.display());
    Ok(())
}

pub async fn social(config: Config, input: &Path) -> Result<()> {
    let cache = SocialCache::connect(&config.cache.url).await?;
    let result = SocialOrchestrator::new(config).run(input, &cache).await;
    cache.close().await;

    result?.display_summary();
    Ok(())
}
