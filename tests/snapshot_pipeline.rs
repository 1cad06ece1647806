use anyhow::Result;
use chrono::NaiveDate;
use serde_json::json;
use std::path::Path;

use goldpulse::config::Config;
use goldpulse::narrative::render_snapshot;
use goldpulse::orchestrator::{SnapshotOrchestrator, SummaryOrchestrator};

fn write_json(dir: &Path, name: &str, value: serde_json::Value) {
    std::fs::write(dir.join(name), serde_json::to_string_pretty(&value).expect("serialize"))
        .expect("write fixture");
}

fn config(root: &Path) -> Config {
    let mut config = Config::default();
    config.paths.input_dir = root.join("jsons");
    config.paths.snapshot_dir = root.join("snapshots");
    config.paths.summary_dir = root.join("summaries");
    config.as_of_date = NaiveDate::from_ymd_opt(2024, 6, 1);
    config
}

fn seed_inputs(dir: &Path) {
    std::fs::create_dir_all(dir).expect("mkdir");
    write_json(
        dir,
        "xauusd_30d.json",
        json!([
            {"time": "2024-06-01T00:00:00", "open": 2300, "high": 2320, "low": 2290, "close": 2315},
            {"time": "2024-04-01T00:00:00", "open": 2200, "high": 2210, "low": 2190, "close": 2205}
        ]),
    );
    write_json(
        dir,
        "fundamentals_data.json",
        json!({
            "TREASURY_10Y": [{"date": "2024-05-31", "value": 4.51}],
            "CPI": [{"date": "2024-03-01", "value": 312.2}, {"date": "2024-04-01", "value": 313.0}],
            "CPI_END_DATE": "2024-05-15"
        }),
    );
    write_json(
        dir,
        "news_30days.json",
        json!({"headlines": [
            {"time": "2024-05-31T14:00:00", "category": "gold", "title": "Gold steadies before payrolls", "ticker": "GLD"}
        ]}),
    );
    write_json(dir, "economic_calendar.json", json!({"events": "not a list"}));
}

#[test]
fn test_gold_price_section_from_snapshot() {
    let snapshot = json!({"date": "2024-06-01", "data": {"xauusd": {"open": 2300, "high": 2320, "low": 2290, "close": 2315}}});
    let footer = NaiveDate::from_ymd_opt(2024, 6, 1)
        .and_then(|d| d.and_hms_opt(8, 0, 0))
        .expect("valid footer");

    let text = render_snapshot(&snapshot, footer);
    assert!(text.contains("GOLD PRICE ACTION:"));
    assert!(text.contains("opened at $2,300.00"));
    assert!(text.contains("daily gain of +15.00 (+0.65%)"));
}

#[test]
fn test_end_to_end_snapshots_and_summaries() -> Result<()> {
    let root = tempfile::tempdir()?;
    let config = config(root.path());
    seed_inputs(&config.paths.input_dir);

    std::fs::create_dir_all(&config.paths.snapshot_dir)?;
    std::fs::write(config.paths.snapshot_dir.join("snapshot_2024-03-01.json"), "{}")?;

    let snapshots = SnapshotOrchestrator::new(config.clone()).run()?;
    assert_eq!(snapshots.report.deleted, 1);
    // 2024-05-15 (CPI), 2024-05-31 (yield + news), 2024-06-01 (price); April is outside the window
    assert_eq!(snapshots.report.generated, 3);
    assert!(snapshots.monthly_artifact.is_some());
    assert!(!config.paths.snapshot_dir.join("snapshot_2024-04-01.json").exists());

    let cpi_day: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(
        config.paths.snapshot_dir.join("snapshot_2024-05-15.json"),
    )?)?;
    assert_eq!(cpi_day["data"]["fundamentals"]["CPI"][1]["value"], 313.0);

    let summaries = SummaryOrchestrator::new(config.clone()).run()?;
    assert_eq!(summaries.errors, 0);
    assert_eq!(summaries.converted, 4);

    let june_first = std::fs::read_to_string(config.paths.summary_dir.join("summary_2024-06-01.txt"))?;
    assert!(june_first.starts_with("June 01, 2024\n\nGOLD PRICE ACTION:\n"));
    assert!(june_first.contains("opened at $2,300.00"));
    assert!(june_first.contains("+15.00"));
    assert!(june_first.contains("+0.65%"));

    let may_last = std::fs::read_to_string(config.paths.summary_dir.join("summary_2024-05-31.txt"))?;
    assert!(may_last.contains("FUNDAMENTALS:\n10-Year Treasury yield: 4.51%."));
    assert!(may_last.contains("  • Gold steadies before payrolls [GLD]"));

    let monthly = std::fs::read_to_string(config.paths.summary_dir.join("summary_monthly_indicators.txt"))?;
    assert!(monthly.contains("Consumer Price Index (CPI) stood at 313.00 in April 2024."));
    Ok(())
}

#[test]
fn test_snapshot_run_is_idempotent() -> Result<()> {
    let root = tempfile::tempdir()?;
    let config = config(root.path());
    seed_inputs(&config.paths.input_dir);

    SnapshotOrchestrator::new(config.clone()).run()?;
    let first = std::fs::read_to_string(config.paths.snapshot_dir.join("snapshot_2024-06-01.json"))?;

    let second_run = SnapshotOrchestrator::new(config.clone()).run()?;
    assert_eq!(second_run.report.deleted, 0);
    let second = std::fs::read_to_string(config.paths.snapshot_dir.join("snapshot_2024-06-01.json"))?;
    assert_eq!(first, second);
    Ok(())
}
