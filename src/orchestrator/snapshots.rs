//! Snapshot run: collector JSON -> per-day timeline -> rolling snapshot folder

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::{
    config::Config,
    data::SourceBundle,
    snapshot::{PruneReport, SnapshotPruner},
    timeline::{MonthlyIndicators, TimelineBuilder},
};

#[derive(Debug, Clone)]
pub struct SnapshotRunResult {
    pub days_with_data: usize,
    pub skipped_sources: Vec<String>,
    pub report: PruneReport,
    pub monthly_artifact: Option<PathBuf>,
}

impl SnapshotRunResult {
    pub fn display_summary(&self) {
        println!("\n=== DAILY SNAPSHOTS ===");
        println!("Days with data:      {}", self.days_with_data);
        println!("Snapshots generated: {}", self.report.generated);
        println!("Stale files deleted: {}", self.report.deleted);
        match &self.monthly_artifact {
            Some(path) => println!("Monthly indicators:  {}", path.display()),
            None => println!("Monthly indicators:  none available"),
        }
        if !self.skipped_sources.is_empty() {
            println!("Skipped sources:     {}", self.skipped_sources.join(", "));
        }
    }
}

pub struct SnapshotOrchestrator {
    config: Config,
}

impl SnapshotOrchestrator {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn run(&self) -> Result<SnapshotRunResult> {
        let today = self.config.get_effective_date();
        let generated_at = self.config.get_effective_datetime();
        let input_dir = &self.config.paths.input_dir;

        info!(input = %input_dir.display(), %today, "Building daily snapshots");

        let bundle = SourceBundle::load(input_dir);
        let timeline = TimelineBuilder::from_sources(&bundle);
        if timeline.is_empty() {
            warn!(input = %input_dir.display(), "No dated records found; nothing to snapshot");
        }

        let pruner = SnapshotPruner::new(&self.config.paths.snapshot_dir, self.config.retention_days);
        let report = pruner
            .run(&timeline, today, generated_at)
            .context("Failed to refresh snapshot window")?;

        let monthly_artifact = match bundle
            .fundamentals
            .as_ref()
            .and_then(|data| MonthlyIndicators::extract(data, generated_at))
        {
            Some(monthly) => Some(
                pruner
                    .write_monthly(&monthly)
                    .context("Failed to write monthly indicators")?,
            ),
            None => {
                info!("No monthly indicators in fundamentals source");
                None
            }
        };

        Ok(SnapshotRunResult {
            days_with_data: timeline.len(),
            skipped_sources: bundle.skipped,
            report,
            monthly_artifact,
        })
    }
}
