//! Social layer: collected posts -> noise filter -> scoring -> cache -> timeframe blocks

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::news::{list_payload, write_layer};
use crate::{
    config::Config,
    data::{sources::decode_list, sources::read_json, RawSocialPost, SocialPost},
    db::SocialCache,
    dedup::{deduplicate, DedupReport, Timeframe, TimeframeBuckets},
    sentiment::{
        fear_greed, influence_score, momentum, post_sentiment, text::extract_social_events,
        FearGreed, LexiconScorer, MomentumReport, NoiseFilter, SentimentRegime, SentimentScorer,
    },
};

pub const SOCIAL_LAYER_FILE: &str = "social_sentiment_layer.json";
const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const SOURCES: [&str; 3] = ["reddit", "stocktwits", "twitter"];
const HIGH_INFLUENCE_THRESHOLD: f64 = 0.7;
const HIGHLIGHT_LIMIT: usize = 10;

fn source_weights() -> BTreeMap<&'static str, f64> {
    BTreeMap::from([("reddit", 0.4), ("stocktwits", 0.4), ("twitter", 0.2)])
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostView {
    pub source: String,
    pub title: String,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfluentialPost {
    pub source: String,
    pub title: String,
    pub time: String,
    pub influence_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventPost {
    pub source: String,
    pub title: String,
    pub time: String,
    pub events: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SocialTimeframeBlock {
    pub timeframe: &'static str,
    pub total_posts: usize,
    pub by_source: BTreeMap<String, usize>,
    pub fear_greed_index: FearGreed,
    pub sentiment_regime: SentimentRegime,
    pub momentum: MomentumReport,
    pub posts: Vec<PostView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_influence_posts: Option<Vec<InfluentialPost>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_driven_posts: Option<Vec<EventPost>>,
}

fn time_of(post: &SocialPost) -> String {
    post.timestamp.format(TIME_FORMAT).to_string()
}

impl SocialTimeframeBlock {
    fn from_posts(timeframe: Timeframe, posts: &[SocialPost], now: NaiveDateTime) -> Self {
        let momentum = momentum(posts, timeframe.momentum_hours(), now);
        let sentiment_regime = SentimentRegime::for_posts(posts, &momentum);
        let sentiments: Vec<f64> = posts.iter().filter_map(|p| p.sentiment_score).collect();

        let mut by_source = BTreeMap::new();
        for post in posts {
            *by_source.entry(post.source.clone()).or_insert(0) += 1;
        }

        let views = posts
            .iter()
            .map(|p| PostView {
                source: p.source.clone(),
                title: p.cleaned_title.clone(),
                time: time_of(p),
            })
            .collect();

        let (high_influence_posts, event_driven_posts) = if timeframe == Timeframe::H24 {
            let influential = posts
                .iter()
                .filter_map(|p| {
                    let score = p.influence_score.filter(|s| *s > HIGH_INFLUENCE_THRESHOLD)?;
                    Some(InfluentialPost {
                        source: p.source.clone(),
                        title: p.cleaned_title.clone(),
                        time: time_of(p),
                        influence_score: score,
                    })
                })
                .take(HIGHLIGHT_LIMIT)
                .collect();
            let eventful = posts
                .iter()
                .filter(|p| !p.events.is_empty())
                .take(HIGHLIGHT_LIMIT)
                .map(|p| EventPost {
                    source: p.source.clone(),
                    title: p.cleaned_title.clone(),
                    time: time_of(p),
                    events: p.events.clone(),
                })
                .collect();
            (Some(influential), Some(eventful))
        } else {
            (None, None)
        };

        Self {
            timeframe: timeframe.label(),
            total_posts: posts.len(),
            by_source,
            fear_greed_index: fear_greed(&sentiments),
            sentiment_regime,
            momentum,
            posts: views,
            high_influence_posts,
            event_driven_posts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SocialLayer {
    pub fetch_time: String,
    pub sources: [&'static str; 3],
    pub source_weights: BTreeMap<&'static str, f64>,
    pub dedup: DedupReport,
    #[serde(rename = "30D")]
    pub d30: SocialTimeframeBlock,
    #[serde(rename = "7D")]
    pub d7: SocialTimeframeBlock,
    #[serde(rename = "24H")]
    pub h24: SocialTimeframeBlock,
}

impl SocialLayer {
    pub fn block(&self, timeframe: Timeframe) -> &SocialTimeframeBlock {
        match timeframe {
            Timeframe::D30 => &self.d30,
            Timeframe::D7 => &self.d7,
            Timeframe::H24 => &self.h24,
        }
    }
}

/// Score accepted posts: sentiment, event tags and influence
pub fn annotate_posts<S: SentimentScorer + ?Sized>(scorer: &S, posts: &mut [SocialPost]) {
    for post in posts.iter_mut() {
        post.sentiment_score = Some(post_sentiment(scorer, post));
        post.events = extract_social_events(&post.cleaned_title);
        post.influence_score = Some(influence_score(post));
    }
}

pub fn build_social_layer(posts: &[SocialPost], now: NaiveDateTime) -> SocialLayer {
    let mut buckets = TimeframeBuckets::split(posts, now);
    let dedup = deduplicate(&mut buckets);

    SocialLayer {
        fetch_time: now.format(TIME_FORMAT).to_string(),
        sources: SOURCES,
        source_weights: source_weights(),
        dedup,
        d30: SocialTimeframeBlock::from_posts(Timeframe::D30, &buckets.d30, now),
        d7: SocialTimeframeBlock::from_posts(Timeframe::D7, &buckets.d7, now),
        h24: SocialTimeframeBlock::from_posts(Timeframe::H24, &buckets.h24, now),
    }
}

#[derive(Debug, Clone)]
pub struct SocialRunResult {
    pub raw_posts: usize,
    pub accepted_posts: usize,
    pub newly_cached: usize,
    pub layer: SocialLayer,
    pub output: PathBuf,
}

impl SocialRunResult {
    pub fn display_summary(&self) {
        println!("\n=== SOCIAL SENTIMENT LAYER ===");
        println!(
            "Posts: {} raw, {} after filtering, {} new in cache",
            self.raw_posts, self.accepted_posts, self.newly_cached
        );
        for timeframe in Timeframe::ALL {
            let block = self.layer.block(timeframe);
            println!(
                "{}: {} posts, Fear: {}% / Greed: {}%, regime: {}",
                timeframe,
                block.total_posts,
                block.fear_greed_index.fear,
                block.fear_greed_index.greed,
                block.sentiment_regime
            );
        }
        println!("Saved to {}", self.output.display());
    }
}

pub struct SocialOrchestrator {
    config: Config,
    scorer: Box<dyn SentimentScorer + Send + Sync>,
}

impl SocialOrchestrator {
    pub fn new(config: Config) -> Self {
        Self::with_scorer(config, Box::new(LexiconScorer))
    }

    pub fn with_scorer(config: Config, scorer: Box<dyn SentimentScorer + Send + Sync>) -> Self {
        Self { config, scorer }
    }

    pub async fn run(&self, input: &Path, cache: &SocialCache) -> Result<SocialRunResult> {
        let now = self.config.get_effective_datetime();

        let name = input.file_name().and_then(|n| n.to_str()).unwrap_or("social");
        let document = read_json(input, name).with_context(|| format!("Failed to read {}", input.display()))?;
        let raw: Vec<RawSocialPost> = decode_list(name, list_payload(&document, "posts"));
        let raw_posts = raw.len();

        let parsed: Vec<SocialPost> = raw.into_iter().filter_map(SocialPost::from_raw).collect();
        if parsed.len() < raw_posts {
            debug!(dropped = raw_posts - parsed.len(), "Dropped posts with unparseable timestamps");
        }

        let mut filter = NoiseFilter::new(self.config.noise.thresholds());
        let mut posts = filter.filter(parsed);
        info!(raw = raw_posts, accepted = posts.len(), "Noise filter applied");

        annotate_posts(self.scorer.as_ref(), &mut posts);

        let mut newly_cached = 0;
        for post in &posts {
            match cache.insert_post(post, now).await {
                Ok(true) => newly_cached += 1,
                Ok(false) => {}
                Err(e) => warn!(key = %post.cache_key(), error = %e, "Failed to cache post"),
            }
        }
        info!(newly_cached, "Social cache updated");

        let layer = build_social_layer(&posts, now);
        for timeframe in Timeframe::ALL {
            let block = layer.block(timeframe);
            info!(
                timeframe = %timeframe,
                posts = block.total_posts,
                fear = block.fear_greed_index.fear,
                greed = block.fear_greed_index.greed,
                regime = %block.sentiment_regime,
                "Social timeframe aggregated"
            );
        }

        let output = write_layer(&self.config.paths.layer_dir, SOCIAL_LAYER_FILE, &layer)?;
        info!(path = %output.display(), "Social layer saved");

        Ok(SocialRunResult {
            raw_posts,
            accepted_posts: posts.len(),
            newly_cached,
            layer,
            output,
        })
    }
}
