//! Rolling snapshot window on disk
//!
//! Each run deletes dated artifacts older than the retention horizon and then
//! rewrites one `snapshot_YYYY-MM-DD.json` per day with data inside the window.
//! This is the only writer of the snapshot folder; concurrent runs must be
//! serialized by the caller.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::data::DataResult;
use crate::timeline::monthly::MONTHLY_ARTIFACT_FILE;
use crate::timeline::{MonthlyIndicators, PerDateRecord, Timeline};

pub const SNAPSHOT_PREFIX: &str = "snapshot_";
pub const SNAPSHOT_EXTENSION: &str = "json";

/// Persisted per-date artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub date: NaiveDate,
    pub snapshot_generated_at: NaiveDateTime,
    pub data: PerDateRecord,
}

impl Snapshot {
    pub fn file_name(date: NaiveDate) -> String {
        format!("{}{}.{}", SNAPSHOT_PREFIX, date.format("%Y-%m-%d"), SNAPSHOT_EXTENSION)
    }
}

/// Outcome of one prune + regenerate pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PruneReport {
    pub deleted: usize,
    pub generated: usize,
}

pub struct SnapshotPruner {
    dir: PathBuf,
    retention_days: i64,
}

impl SnapshotPruner {
    pub fn new<P: Into<PathBuf>>(dir: P, retention_days: i64) -> Self {
        Self {
            dir: dir.into(),
            retention_days,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Oldest date still retained
    pub fn cutoff(&self, today: NaiveDate) -> NaiveDate {
        retention_cutoff(today, self.retention_days)
    }

    /// Delete stale snapshots, then regenerate the active window from `timeline`
    pub fn run(
        &self,
        timeline: &Timeline,
        today: NaiveDate,
        generated_at: NaiveDateTime,
    ) -> DataResult<PruneReport> {
        std::fs::create_dir_all(&self.dir)?;

        let cutoff = self.cutoff(today);
        let deleted = prune_dated_artifacts(&self.dir, SNAPSHOT_PREFIX, SNAPSHOT_EXTENSION, cutoff)?;
        let generated = self.regenerate(timeline, cutoff, generated_at)?;

        info!(deleted, generated, %cutoff, "Snapshot window refreshed");
        Ok(PruneReport { deleted, generated })
    }

    /// Write one snapshot per day in `[max(cutoff, oldest), newest]` that has data
    fn regenerate(
        &self,
        timeline: &Timeline,
        cutoff: NaiveDate,
        generated_at: NaiveDateTime,
    ) -> DataResult<usize> {
        let (Some(oldest), Some(newest)) = (timeline.oldest(), timeline.newest()) else {
            return Ok(0);
        };

        let mut generated = 0;
        let start = cutoff.max(oldest);
        for (date, record) in timeline.iter() {
            if *date < start || *date > newest || record.is_empty() {
                continue;
            }

            let snapshot = Snapshot {
                date: *date,
                snapshot_generated_at: generated_at,
                data: record.clone(),
            };
            let path = self.dir.join(Snapshot::file_name(*date));
            if let Err(e) = write_snapshot(&path, &snapshot) {
                warn!(path = %path.display(), error = %e, "Failed to write snapshot, skipping day");
                continue;
            }
            debug!(path = %path.display(), "Snapshot written");
            generated += 1;
        }

        Ok(generated)
    }

    /// Persist the monthly indicators artifact alongside the snapshots
    pub fn write_monthly(&self, monthly: &MonthlyIndicators) -> DataResult<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(MONTHLY_ARTIFACT_FILE);
        std::fs::write(&path, serde_json::to_string_pretty(monthly)?)?;
        info!(path = %path.display(), indicators = monthly.indicators.len(), "Monthly indicators written");
        Ok(path)
    }
}

fn write_snapshot(path: &Path, snapshot: &Snapshot) -> DataResult<()> {
    std::fs::write(path, serde_json::to_string_pretty(snapshot)?)?;
    Ok(())
}

/// `today - retention_days`, saturating at the earliest representable date
pub fn retention_cutoff(today: NaiveDate, retention_days: i64) -> NaiveDate {
    Duration::try_days(retention_days)
        .and_then(|horizon| today.checked_sub_signed(horizon))
        .unwrap_or(NaiveDate::MIN)
}

/// Date embedded in an artifact file name such as `snapshot_2024-06-01.json`
pub fn artifact_date(path: &Path, prefix: &str) -> Option<NaiveDate> {
    let stem = path.file_stem()?.to_str()?;
    let raw = stem.strip_prefix(prefix)?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Delete `{prefix}YYYY-MM-DD.{extension}` files strictly older than `cutoff`.
///
/// Files without a parseable embedded date are left alone. A file that can't
/// be removed is logged and skipped.
pub fn prune_dated_artifacts(
    dir: &Path,
    prefix: &str,
    extension: &str,
    cutoff: NaiveDate,
) -> DataResult<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let mut deleted = 0;
    for entry in std::fs::read_dir(dir)? {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "Unreadable directory entry");
                continue;
            }
        };
        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        let Some(date) = artifact_date(&path, prefix) else {
            continue;
        };
        if date < cutoff {
            if let Err(e) = std::fs::remove_file(&path) {
                warn!(path = %path.display(), error = %e, "Failed to delete stale artifact");
                continue;
            }
            info!(path = %path.display(), "Deleted stale artifact");
            deleted += 1;
        }
    }

    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::NewsHeadline;
    use crate::timeline::TimelineBuilder;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    fn headline(time: &str, title: &str) -> NewsHeadline {
        NewsHeadline {
            time: Some(time.to_string()),
            category: Some("gold".to_string()),
            title: Some(title.to_string()),
            ticker: Some("GLD".to_string()),
        }
    }

    fn timeline() -> Timeline {
        let headlines = vec![
            headline("2024-04-20T09:00:00", "Old news"),
            headline("2024-05-15T09:00:00", "Mid-May news"),
            headline("2024-06-01T09:00:00", "Fresh news"),
        ];
        let mut builder = TimelineBuilder::new();
        builder.add_headlines(&headlines);
        builder.build()
    }

    fn listing(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .expect("read dir")
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_artifact_date_parsing() {
        assert_eq!(
            artifact_date(Path::new("snapshot_2024-06-01.json"), SNAPSHOT_PREFIX),
            Some(ymd(2024, 6, 1))
        );
        assert_eq!(artifact_date(Path::new("snapshot_latest.json"), SNAPSHOT_PREFIX), None);
        assert_eq!(artifact_date(Path::new("inflation_data.json"), SNAPSHOT_PREFIX), None);
        assert_eq!(
            artifact_date(Path::new("summary_2024-06-01.txt"), "summary_"),
            Some(ymd(2024, 6, 1))
        );
    }

    #[test]
    fn test_run_deletes_stale_and_writes_window() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("snapshot_2024-04-01.json"), "{}").expect("stale");
        std::fs::write(dir.path().join("snapshot_2024-05-02.json"), "{}").expect("edge");
        std::fs::write(dir.path().join("notes.json"), "{}").expect("unrelated");

        let pruner = SnapshotPruner::new(dir.path(), 30);
        let today = ymd(2024, 6, 1);
        let generated_at = today.and_hms_opt(6, 0, 0).expect("time");
        let report = pruner.run(&timeline(), today, generated_at).expect("run");

        assert_eq!(report, PruneReport { deleted: 1, generated: 2 });
        assert_eq!(
            listing(dir.path()),
            vec![
                "notes.json",
                "snapshot_2024-05-02.json",
                "snapshot_2024-05-15.json",
                "snapshot_2024-06-01.json"
            ]
        );

        let written = std::fs::read_to_string(dir.path().join("snapshot_2024-06-01.json")).expect("read");
        let snapshot: Snapshot = serde_json::from_str(&written).expect("valid snapshot");
        assert_eq!(snapshot.date, today);
        assert_eq!(snapshot.data.news.len(), 1);
    }

    #[test]
    fn test_run_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let pruner = SnapshotPruner::new(dir.path(), 30);
        let today = ymd(2024, 6, 1);
        let generated_at = today.and_hms_opt(6, 0, 0).expect("time");

        pruner.run(&timeline(), today, generated_at).expect("first run");
        let first = listing(dir.path());
        let first_body = std::fs::read_to_string(dir.path().join("snapshot_2024-05-15.json")).expect("read");

        let report = pruner.run(&timeline(), today, generated_at).expect("second run");
        assert_eq!(report.deleted, 0);
        assert_eq!(listing(dir.path()), first);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("snapshot_2024-05-15.json")).expect("read"),
            first_body
        );
    }

    #[test]
    fn test_bad_artifacts_do_not_stop_the_run() {
        let dir = tempfile::tempdir().expect("tempdir");
        // Directories with artifact names can be neither removed nor overwritten as files
        std::fs::create_dir(dir.path().join("snapshot_2024-01-01.json")).expect("stale dir");
        std::fs::create_dir(dir.path().join("snapshot_2024-05-15.json")).expect("blocking dir");
        std::fs::write(dir.path().join("snapshot_2024-04-01.json"), "{}").expect("stale");

        let pruner = SnapshotPruner::new(dir.path(), 30);
        let today = ymd(2024, 6, 1);
        let report = pruner
            .run(&timeline(), today, today.and_hms_opt(6, 0, 0).expect("time"))
            .expect("run survives bad artifacts");

        assert_eq!(report, PruneReport { deleted: 1, generated: 1 });
        assert!(dir.path().join("snapshot_2024-06-01.json").is_file());
        assert!(!dir.path().join("snapshot_2024-04-01.json").exists());
    }

    #[test]
    fn test_cutoff_saturates_for_huge_retention() {
        let today = ymd(2024, 6, 1);
        assert_eq!(SnapshotPruner::new("unused", 30).cutoff(today), ymd(2024, 5, 2));
        assert_eq!(SnapshotPruner::new("unused", 100_000_000).cutoff(today), NaiveDate::MIN);
        assert_eq!(retention_cutoff(today, i64::MAX), NaiveDate::MIN);
        assert_eq!(retention_cutoff(today, 0), today);
    }

    #[test]
    fn test_empty_timeline_generates_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let pruner = SnapshotPruner::new(dir.path().join("nested"), 30);
        let today = ymd(2024, 6, 1);
        let report = pruner
            .run(&Timeline::default(), today, today.and_hms_opt(0, 0, 0).expect("time"))
            .expect("run");
        assert_eq!(report, PruneReport::default());
        assert!(pruner.dir().exists());
    }
}
