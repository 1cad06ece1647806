use anyhow::Result;
use chrono::NaiveDate;
use serde_json::json;

use goldpulse::config::Config;
use goldpulse::data::{RawSocialPost, SocialPost};
use goldpulse::db::SocialCache;
use goldpulse::orchestrator::SocialOrchestrator;

fn post(source: &str, id: &str) -> SocialPost {
    SocialPost::from_raw(RawSocialPost {
        id: id.into(),
        source: source.into(),
        title: "Gold holds above 2300 into the close".into(),
        timestamp: "2024-06-01T10:00:00Z".into(),
        score: 12,
        ..Default::default()
    })
    .expect("valid post")
}

#[tokio::test]
async fn test_insert_or_ignore_by_source_and_id() -> Result<()> {
    let cache = SocialCache::connect("sqlite::memory:").await?;
    let fetched = NaiveDate::from_ymd_opt(2024, 6, 1)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .expect("valid time");

    assert!(cache.insert_post(&post("reddit", "abc"), fetched).await?);
    assert!(!cache.insert_post(&post("reddit", "abc"), fetched).await?);
    // Same id from another source is a different post
    assert!(cache.insert_post(&post("stocktwits", "abc"), fetched).await?);
    assert_eq!(cache.count().await?, 2);

    cache.close().await;
    Ok(())
}

#[tokio::test]
async fn test_social_layer_end_to_end() -> Result<()> {
    let root = tempfile::tempdir()?;
    let input = root.path().join("social_posts.json");
    std::fs::write(
        &input,
        serde_json::to_string(&json!({"posts": [
            {"id": "r1", "source": "reddit", "ticker": "GLD", "title": "Gold breakout looks strong after CPI",
             "timestamp": "2024-06-20T09:15:00", "score": 250, "num_comments": 40},
            {"id": "r2", "source": "reddit", "ticker": "GLD", "title": "Low effort gold post here",
             "timestamp": "2024-06-20T09:30:00", "score": 1},
            {"id": "s1", "source": "stocktwits", "ticker": "GLD", "title": "$GLD weak close, expecting a drop",
             "timestamp": "2024-06-17T15:00:00", "score": 4, "stocktwits_sentiment": "Bearish"},
            {"id": "t1", "source": "twitter", "ticker": "SPY", "title": "click here for free gold signals now",
             "timestamp": "2024-06-20T08:00:00"},
            {"id": "t2", "source": "twitter", "title": "no timestamp at all", "timestamp": "whenever"}
        ]}))?,
    )?;

    let mut config = Config::default();
    config.paths.layer_dir = root.path().join("layers");
    config.as_of_time = NaiveDate::from_ymd_opt(2024, 6, 20).and_then(|d| d.and_hms_opt(12, 0, 0));

    let cache = SocialCache::connect("sqlite::memory:").await?;
    let result = SocialOrchestrator::new(config).run(&input, &cache).await?;

    assert_eq!(result.raw_posts, 5);
    assert_eq!(result.accepted_posts, 2);
    assert_eq!(result.newly_cached, 2);
    assert_eq!(cache.count().await?, 2);

    let layer = &result.layer;
    assert_eq!(layer.h24.total_posts, 1);
    assert_eq!(layer.d7.total_posts, 1);
    assert_eq!(layer.d7.by_source.get("stocktwits"), Some(&1));
    // -1.0 from the lexicon, pulled to -0.75 by the Bearish label; 12.5 rounds to even
    assert_eq!(layer.d7.fear_greed_index.fear, 88);

    let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&result.output)?)?;
    assert_eq!(written["sources"], json!(["reddit", "stocktwits", "twitter"]));
    assert_eq!(written["24H"]["high_influence_posts"][0]["influence_score"], 0.96);
    assert_eq!(written["24H"]["momentum"]["momentum_scores"]["GLD"], 1.0);

    // Re-running against the same cache adds nothing new
    let again = SocialOrchestrator::new({
        let mut config = Config::default();
        config.paths.layer_dir = root.path().join("layers");
        config.as_of_time = NaiveDate::from_ymd_opt(2024, 6, 20).and_then(|d| d.and_hms_opt(12, 0, 0));
        config
    })
    .run(&input, &cache)
    .await?;
    assert_eq!(again.newly_cached, 0);

    cache.close().await;
    Ok(())
}
