use anyhow::Result;
use goldpulse::config::Config;

// Env-driven config checks share process state, so they live in one test
#[test]
fn test_config_env_parsing() -> Result<()> {
    std::env::set_var("RETENTION_DAYS", "fourteen");
    let err = Config::load().expect_err("non-numeric retention must fail");
    assert!(err.to_string().contains("RETENTION_DAYS"));

    std::env::set_var("RETENTION_DAYS", "14");
    std::env::set_var("MIN_POST_LENGTH", "20");
    std::env::set_var("GOLDPULSE_SNAPSHOT_DIR", "/tmp/goldpulse-snapshots");
    let config = Config::load()?;
    assert_eq!(config.retention_days, 14);
    assert_eq!(config.noise.thresholds().min_post_length, 20);
    assert_eq!(config.paths.snapshot_dir.to_string_lossy(), "/tmp/goldpulse-snapshots");

    std::env::set_var("RETENTION_DAYS", "-1");
    assert!(Config::load().is_err());

    for key in ["RETENTION_DAYS", "MIN_POST_LENGTH", "GOLDPULSE_SNAPSHOT_DIR"] {
        std::env::remove_var(key);
    }
    Ok(())
}

#[test]
fn test_config_defaults() {
    let config = Config::default();
    assert_eq!(config.retention_days, 30);
    assert_eq!(config.paths.input_dir.to_string_lossy(), "Fetchers/jsons");
    assert_eq!(config.cache.url, "sqlite://data/social_cache.db");
    assert_eq!(config.noise.reddit_min_score, 5);
}
