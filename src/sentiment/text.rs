//! Text cleaning, keyword event tagging and the social noise filter

use chrono::{Duration, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{BTreeSet, HashMap};

use crate::data::SocialPost;

lazy_static! {
    static ref URL_PATTERN: Regex =
        Regex::new(r"https?://\S+").expect("Failed to compile URL_PATTERN regex - this is a bug in the hardcoded pattern");
    static ref URL_SCHEME: Regex =
        Regex::new(r"https?://").expect("Failed to compile URL_SCHEME regex - this is a bug in the hardcoded pattern");
    static ref HTML_TAG: Regex =
        Regex::new(r"<[^>]+>").expect("Failed to compile HTML_TAG regex - this is a bug in the hardcoded pattern");
    static ref HASHTAG: Regex =
        Regex::new(r"#\w+").expect("Failed to compile HASHTAG regex - this is a bug in the hardcoded pattern");
    static ref MENTION: Regex =
        Regex::new(r"@\w+").expect("Failed to compile MENTION regex - this is a bug in the hardcoded pattern");
    static ref EMOJI: Regex = Regex::new(
        r"[\x{1F600}-\x{1F64F}\x{1F300}-\x{1F5FF}\x{1F680}-\x{1F6FF}\x{1F1E0}-\x{1F1FF}]+"
    )
    .expect("Failed to compile EMOJI regex - this is a bug in the hardcoded pattern");
}

/// Headline keyword groups; matching reports the keyword itself
pub const NEWS_EVENT_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "meeting",
        &["FOMC", "Fed meeting", "Fed decision", "central bank meeting", "Powell speech", "ECB meeting"],
    ),
    (
        "policy",
        &["rate cut", "rate hike", "interest rate", "QE", "QT", "quantitative", "dovish", "hawkish"],
    ),
    (
        "geopolitical",
        &["tariff", "trade war", "sanctions", "conflict", "war", "election", "crisis"],
    ),
    (
        "market_event",
        &["crash", "rally", "correction", "ATH", "all-time high", "selloff", "breakout", "earnings"],
    ),
];

/// Social event tags; matching reports the tag
pub const SOCIAL_EVENT_TAGS: &[(&str, &[&str])] = &[
    ("fed_meeting", &["fomc", "fed meeting", "powell"]),
    ("rate_decision", &["rate cut", "rate hike", "interest rate"]),
    ("earnings", &["earnings", "eps", "quarterly"]),
    ("geopolitical", &["war", "tariff", "sanctions", "election"]),
    ("market_crash", &["crash", "selloff", "panic", "collapse"]),
    ("rally", &["rally", "moon", "breakout", "ath"]),
];

const SPAM_KEYWORDS: &[&str] = &["click here", "buy now", "limited offer", "dm me", "check bio"];

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip URLs, HTML tags and hashtags from a headline
pub fn clean_headline(text: &str) -> String {
    let text = URL_PATTERN.replace_all(text, "");
    let text = HTML_TAG.replace_all(&text, "");
    let text = HASHTAG.replace_all(&text, "");
    collapse_whitespace(&text)
}

/// Strip URLs, hashtags, mentions and emoji from a social post
pub fn clean_social_text(text: &str) -> String {
    let text = URL_PATTERN.replace_all(text, "");
    let text = HASHTAG.replace_all(&text, "");
    let text = MENTION.replace_all(&text, "");
    let text = EMOJI.replace_all(&text, "");
    collapse_whitespace(&text)
}

/// Case-insensitive substring match; each keyword reported once, sorted
pub fn extract_news_events(title: &str) -> Vec<String> {
    let lower = title.to_lowercase();
    let found: BTreeSet<&str> = NEWS_EVENT_KEYWORDS
        .iter()
        .flat_map(|(_, keywords)| keywords.iter())
        .filter(|keyword| lower.contains(&keyword.to_lowercase()))
        .copied()
        .collect();
    found.into_iter().map(str::to_string).collect()
}

pub fn extract_social_events(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    SOCIAL_EVENT_TAGS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|kw| lower.contains(kw)))
        .map(|(tag, _)| tag.to_string())
        .collect()
}

pub fn is_question(title: &str) -> bool {
    title.contains('?')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityThresholds {
    pub reddit_min_score: i64,
    pub stocktwits_min_likes: i64,
    pub min_post_length: usize,
    pub max_post_length: usize,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            reddit_min_score: 5,
            stocktwits_min_likes: 1,
            min_post_length: 15,
            max_post_length: 2000,
        }
    }
}

/// Why a post was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    LowQuality,
    Spam,
    Duplicate,
    TooShort,
}

/// Quality, spam and repeat-title filter for social posts.
///
/// Carries the first-seen time of every raw title; a repeat within three days
/// of that time is rejected.
#[derive(Debug, Clone, Default)]
pub struct NoiseFilter {
    thresholds: QualityThresholds,
    seen: HashMap<String, NaiveDateTime>,
}

impl NoiseFilter {
    const DUPLICATE_WINDOW_DAYS: i64 = 3;

    pub fn new(thresholds: QualityThresholds) -> Self {
        Self {
            thresholds,
            seen: HashMap::new(),
        }
    }

    /// Keep the posts that pass every check, filling in `cleaned_title`
    pub fn filter(&mut self, posts: Vec<SocialPost>) -> Vec<SocialPost> {
        posts
            .into_iter()
            .filter_map(|mut post| match self.check(&post) {
                Ok(cleaned) => {
                    post.cleaned_title = cleaned;
                    Some(post)
                }
                Err(_) => None,
            })
            .collect()
    }

    /// Cleaned title for an accepted post, or the rejection reason
    pub fn check(&mut self, post: &SocialPost) -> Result<String, Rejection> {
        if !self.passes_quality(post) {
            return Err(Rejection::LowQuality);
        }
        if is_spam(&post.title) {
            return Err(Rejection::Spam);
        }
        if self.is_duplicate(post) {
            return Err(Rejection::Duplicate);
        }

        let cleaned = clean_social_text(&post.title);
        if cleaned.chars().count() < self.thresholds.min_post_length {
            return Err(Rejection::TooShort);
        }
        Ok(cleaned)
    }

    fn passes_quality(&self, post: &SocialPost) -> bool {
        match post.source.as_str() {
            "reddit" if post.score < self.thresholds.reddit_min_score => return false,
            "stocktwits" if post.score < self.thresholds.stocktwits_min_likes => return false,
            _ => {}
        }
        post.title.chars().count() <= self.thresholds.max_post_length
    }

    fn is_duplicate(&mut self, post: &SocialPost) -> bool {
        if let Some(first_seen) = self.seen.get(&post.title) {
            if post.timestamp - *first_seen < Duration::days(Self::DUPLICATE_WINDOW_DAYS) {
                return true;
            }
        }
        self.seen.insert(post.title.clone(), post.timestamp);
        false
    }
}

fn is_spam(title: &str) -> bool {
    let lower = title.to_lowercase();
    if SPAM_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return true;
    }
    if URL_SCHEME.find_iter(&lower).count() > 2 {
        return true;
    }
    lower.split_whitespace().count() < 3
}
