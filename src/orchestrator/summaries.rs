//! Summary run: snapshot folder -> plain-text daily summaries

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::{
    config::Config,
    data::{sources::read_json, DataResult},
    narrative::{render_monthly_document, render_snapshot},
    snapshot::{
        artifact_date, prune_dated_artifacts, retention_cutoff, SNAPSHOT_EXTENSION, SNAPSHOT_PREFIX,
    },
    timeline::monthly::MONTHLY_ARTIFACT_FILE,
};

pub const SUMMARY_PREFIX: &str = "summary_";
pub const SUMMARY_EXTENSION: &str = "txt";
pub const MONTHLY_SUMMARY_FILE: &str = "summary_monthly_indicators.txt";

#[derive(Debug, Clone, Default)]
pub struct SummaryRunResult {
    pub converted: usize,
    pub errors: usize,
    pub deleted: usize,
    pub written: Vec<PathBuf>,
}

impl SummaryRunResult {
    pub fn display_summary(&self) {
        println!("\n=== DAILY SUMMARIES ===");
        println!("{} converted, {} errors", self.converted, self.errors);
        if self.deleted > 0 {
            println!("Stale summaries deleted: {}", self.deleted);
        }
    }
}

pub struct SummaryOrchestrator {
    config: Config,
}

impl SummaryOrchestrator {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn run(&self) -> Result<SummaryRunResult> {
        let snapshot_dir = &self.config.paths.snapshot_dir;
        let summary_dir = &self.config.paths.summary_dir;

        if !snapshot_dir.exists() {
            bail!("Snapshot folder {} not found", snapshot_dir.display());
        }
        std::fs::create_dir_all(summary_dir)
            .with_context(|| format!("Failed to create {}", summary_dir.display()))?;

        let cutoff = retention_cutoff(self.config.get_effective_date(), self.config.retention_days);
        let mut result = SummaryRunResult {
            deleted: prune_dated_artifacts(summary_dir, SUMMARY_PREFIX, SUMMARY_EXTENSION, cutoff)
                .context("Failed to prune stale summaries")?,
            ..Default::default()
        };

        let inputs = self.collect_inputs(snapshot_dir, cutoff)?;
        if inputs.is_empty() {
            info!(dir = %snapshot_dir.display(), "No snapshot files to convert");
        }

        for input in inputs {
            match self.convert(&input, summary_dir) {
                Ok(path) => {
                    info!(input = %input.display(), output = %path.display(), "Summary written");
                    result.converted += 1;
                    result.written.push(path);
                }
                Err(e) => {
                    error!(input = %input.display(), error = %e, "Failed to convert snapshot");
                    result.errors += 1;
                }
            }
        }

        info!(converted = result.converted, errors = result.errors, "Summary conversion finished");
        Ok(result)
    }

    /// Monthly artifact first, then daily snapshots inside the window in date order
    fn collect_inputs(&self, dir: &Path, cutoff: NaiveDate) -> Result<Vec<PathBuf>> {
        let mut inputs = Vec::new();

        let monthly = dir.join(MONTHLY_ARTIFACT_FILE);
        if monthly.exists() {
            inputs.push(monthly);
        }

        let mut daily: Vec<PathBuf> = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to list {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
                name.starts_with(SNAPSHOT_PREFIX)
                    && path.extension().and_then(|e| e.to_str()) == Some(SNAPSHOT_EXTENSION)
            })
            .filter(|path| match artifact_date(path, SNAPSHOT_PREFIX) {
                Some(date) if date < cutoff => {
                    debug!(path = %path.display(), "Skipping snapshot outside the retention window");
                    false
                }
                _ => true,
            })
            .collect();
        daily.sort();
        inputs.extend(daily);

        Ok(inputs)
    }

    fn convert(&self, input: &Path, summary_dir: &Path) -> DataResult<PathBuf> {
        let name = input.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        let document = read_json(input, name)?;
        let footer = self.config.get_effective_datetime();

        let (file_name, text) = if name == MONTHLY_ARTIFACT_FILE {
            (MONTHLY_SUMMARY_FILE.to_string(), render_monthly_document(&document, footer))
        } else {
            let date = match document.get("date") {
                Some(Value::String(date)) => date.clone(),
                _ => "unknown".to_string(),
            };
            (
                format!("{}{}.{}", SUMMARY_PREFIX, date, SUMMARY_EXTENSION),
                render_snapshot(&document, footer),
            )
        };

        let output = summary_dir.join(file_name);
        std::fs::write(&output, text)?;
        Ok(output)
    }
}
