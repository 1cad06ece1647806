//! Aggregation helpers for the news and social layers: fear/greed index,
//! mention momentum, regime labels, contradictions and frequency tables.
//!
//! Everything here is a pure function over explicit inputs.

pub mod scoring;
pub mod text;

pub use scoring::{influence_score, post_sentiment, LexiconScorer, SentimentScorer};
pub use text::{NoiseFilter, QualityThresholds};

use chrono::{Duration, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::data::{EntityMap, NewsItem, SocialPost};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FearGreed {
    pub fear: u8,
    pub greed: u8,
}

/// Map the average sentiment linearly onto 0-100 greed; fear is the complement.
/// Halves round to even, so an average of -0.75 gives greed 12.
pub fn fear_greed(sentiments: &[f64]) -> FearGreed {
    if sentiments.is_empty() {
        return FearGreed { fear: 50, greed: 50 };
    }
    let avg = sentiments.iter().sum::<f64>() / sentiments.len() as f64;
    let greed = (((avg + 1.0) / 2.0) * 100.0).round_ties_even().clamp(0.0, 100.0) as u8;
    FearGreed {
        fear: 100 - greed,
        greed,
    }
}

/// Per-ticker mention counts and latest-hour momentum ratios
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MomentumReport {
    pub ticker_mentions: BTreeMap<String, usize>,
    pub momentum_scores: BTreeMap<String, f64>,
}

impl MomentumReport {
    pub fn average_momentum(&self) -> Option<f64> {
        if self.momentum_scores.is_empty() {
            return None;
        }
        Some(self.momentum_scores.values().sum::<f64>() / self.momentum_scores.len() as f64)
    }
}

/// Mentions in the last `window_hours`, bucketed by hour per ticker.
///
/// Ratio is latest bucket / (mean bucket + 1), rounded to 2 places; a
/// ticker seen in a single hour gets 1.0. Posts without a ticker are ignored.
pub fn momentum(posts: &[SocialPost], window_hours: i64, now: NaiveDateTime) -> MomentumReport {
    let cutoff = now - Duration::hours(window_hours);
    let mut hourly: BTreeMap<String, BTreeMap<NaiveDateTime, usize>> = BTreeMap::new();

    for post in posts.iter().filter(|p| p.timestamp >= cutoff) {
        let Some(ticker) = post.ticker.as_deref().filter(|t| !t.is_empty()) else {
            continue;
        };
        let bucket = post
            .timestamp
            .date()
            .and_hms_opt(post.timestamp.hour(), 0, 0)
            .unwrap_or(post.timestamp);
        *hourly.entry(ticker.to_string()).or_default().entry(bucket).or_default() += 1;
    }

    let mut report = MomentumReport::default();
    for (ticker, buckets) in hourly {
        let mentions: usize = buckets.values().sum();
        let ratio = match buckets.values().last() {
            Some(latest) if buckets.len() > 1 => {
                let avg = mentions as f64 / buckets.len() as f64;
                (*latest as f64 / (avg + 1.0) * 100.0).round() / 100.0
            }
            _ => 1.0,
        };
        report.ticker_mentions.insert(ticker.clone(), mentions);
        report.momentum_scores.insert(ticker, ratio);
    }
    report
}

/// Coarse label for aggregate sentiment and momentum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentRegime {
    #[serde(rename = "Elevated Fear")]
    ElevatedFear,
    Euphoria,
    Disagreement,
    #[serde(rename = "Volatility Warning")]
    VolatilityWarning,
    #[serde(rename = "Hype Cycle")]
    HypeCycle,
    Normal,
}

impl SentimentRegime {
    /// First matching rule wins
    pub fn classify(avg_sentiment: f64, avg_momentum: f64) -> Self {
        if avg_sentiment < -0.3 && avg_momentum > 2.0 {
            SentimentRegime::ElevatedFear
        } else if avg_sentiment > 0.4 && avg_momentum > 3.0 {
            SentimentRegime::Euphoria
        } else if avg_sentiment.abs() < 0.1 {
            SentimentRegime::Disagreement
        } else if avg_momentum > 5.0 {
            SentimentRegime::VolatilityWarning
        } else if avg_sentiment > 0.5 {
            SentimentRegime::HypeCycle
        } else {
            SentimentRegime::Normal
        }
    }

    /// Classify a post set. No posts is `Normal`; missing momentum counts as 1.0.
    pub fn for_posts(posts: &[SocialPost], momentum: &MomentumReport) -> Self {
        if posts.is_empty() {
            return SentimentRegime::Normal;
        }
        let scores: Vec<f64> = posts.iter().filter_map(|p| p.sentiment_score).collect();
        let avg_sentiment = if scores.is_empty() {
            0.0
        } else {
            scores.iter().sum::<f64>() / scores.len() as f64
        };
        Self::classify(avg_sentiment, momentum.average_momentum().unwrap_or(1.0))
    }

    pub fn label(&self) -> &'static str {
        match self {
            SentimentRegime::ElevatedFear => "Elevated Fear",
            SentimentRegime::Euphoria => "Euphoria",
            SentimentRegime::Disagreement => "Disagreement",
            SentimentRegime::VolatilityWarning => "Volatility Warning",
            SentimentRegime::HypeCycle => "Hype Cycle",
            SentimentRegime::Normal => "Normal",
        }
    }
}

impl std::fmt::Display for SentimentRegime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

const RISK_ON: &[&str] = &["risk-on", "risk on", "rally", "bullish sentiment"];
const RISK_OFF: &[&str] = &["risk-off", "risk off", "safe haven", "flight to safety"];
const FED_DOVISH: &[&str] = &["dovish", "rate cut", "easing", "stimulus"];
const FED_HAWKISH: &[&str] = &["hawkish", "rate hike", "tightening", "restrictive"];

const CONTRADICTION_SAMPLES: usize = 2;

/// Opposing narratives present in the same headline set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Contradiction {
    RiskSentiment {
        risk_on_count: usize,
        risk_off_count: usize,
        risk_on_samples: Vec<String>,
        risk_off_samples: Vec<String>,
    },
    FedStance {
        dovish_count: usize,
        hawkish_count: usize,
        dovish_samples: Vec<String>,
        hawkish_samples: Vec<String>,
    },
}

fn matching_titles<'a>(items: &'a [NewsItem], words: &[&str]) -> Vec<&'a str> {
    items
        .iter()
        .filter(|item| {
            let lower = item.title.to_lowercase();
            words.iter().any(|w| lower.contains(w))
        })
        .map(|item| item.title.as_str())
        .collect()
}

fn samples(titles: &[&str]) -> Vec<String> {
    titles.iter().take(CONTRADICTION_SAMPLES).map(|t| t.to_string()).collect()
}

pub fn detect_contradictions(items: &[NewsItem]) -> Vec<Contradiction> {
    let mut found = Vec::new();

    let risk_on = matching_titles(items, RISK_ON);
    let risk_off = matching_titles(items, RISK_OFF);
    if !risk_on.is_empty() && !risk_off.is_empty() {
        found.push(Contradiction::RiskSentiment {
            risk_on_count: risk_on.len(),
            risk_off_count: risk_off.len(),
            risk_on_samples: samples(&risk_on),
            risk_off_samples: samples(&risk_off),
        });
    }

    let dovish = matching_titles(items, FED_DOVISH);
    let hawkish = matching_titles(items, FED_HAWKISH);
    if !dovish.is_empty() && !hawkish.is_empty() {
        found.push(Contradiction::FedStance {
            dovish_count: dovish.len(),
            hawkish_count: hawkish.len(),
            dovish_samples: samples(&dovish),
            hawkish_samples: samples(&hawkish),
        });
    }

    found
}

/// Count per key, most frequent first; ties in key order
fn ranked(counts: BTreeMap<String, usize>) -> Vec<(String, usize)> {
    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

/// Entity mentions per label across a set of annotations
pub fn entity_frequency<'a, I>(entity_maps: I) -> BTreeMap<String, Vec<(String, usize)>>
where
    I: IntoIterator<Item = &'a EntityMap>,
{
    let mut counts: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
    for entities in entity_maps {
        for (label, mentions) in entities {
            let per_label = counts.entry(label.clone()).or_default();
            for mention in mentions {
                *per_label.entry(mention.clone()).or_default() += 1;
            }
        }
    }
    counts.into_iter().map(|(label, c)| (label, ranked(c))).collect()
}

pub fn event_frequency<'a, I>(event_lists: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a Vec<String>>,
{
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for events in event_lists {
        for event in events {
            *counts.entry(event.clone()).or_default() += 1;
        }
    }
    ranked(counts)
}
