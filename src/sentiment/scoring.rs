use crate::data::SocialPost;

/// Lexicon-based sentiment keywords (simple approach)
const BULLISH_WORDS: &[&str] = &[
    "bullish", "bull", "calls", "moon", "rocket", "pump", "rally", "breakout",
    "buy", "long", "support", "green", "gains", "profit", "strong",
];

const BEARISH_WORDS: &[&str] = &[
    "bearish", "bear", "puts", "crash", "dump", "sell", "short", "resistance",
    "red", "loss", "weak", "drop", "fall", "decline", "correction",
];

/// Polarity of a piece of text in `[-1, 1]`
pub trait SentimentScorer {
    fn score(&self, text: &str) -> f64;
}

/// Word-list scorer used when no model-backed scorer is plugged in
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconScorer;

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> f64 {
        let mut bullish_count = 0;
        let mut bearish_count = 0;

        for word in text.split_whitespace() {
            let word_lower = word.to_lowercase();
            if BULLISH_WORDS.iter().any(|&w| word_lower.contains(w)) {
                bullish_count += 1;
            }
            if BEARISH_WORDS.iter().any(|&w| word_lower.contains(w)) {
                bearish_count += 1;
            }
        }

        let total = bullish_count + bearish_count;
        if total == 0 {
            return 0.0;
        }
        (bullish_count as f64 - bearish_count as f64) / total as f64
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Score a post's cleaned title; StockTwits self-labels pull the score halfway
/// toward +/-0.5. Rounded to 4 places.
pub fn post_sentiment<S: SentimentScorer + ?Sized>(scorer: &S, post: &SocialPost) -> f64 {
    let mut score = scorer.score(&post.cleaned_title);
    if post.source == "stocktwits" {
        match post.stocktwits_sentiment.as_deref() {
            Some("Bullish") => score = (score + 0.5) / 2.0,
            Some("Bearish") => score = (score - 0.5) / 2.0,
            _ => {}
        }
    }
    round_to(score, 4)
}

/// Reach estimate in `[0.5, 1.0]` from source engagement, rounded to 2 places
pub fn influence_score(post: &SocialPost) -> f64 {
    let mut score = 0.5;
    match post.source.as_str() {
        "reddit" => {
            score += (post.score as f64 / 100.0).min(1.0) * 0.3;
            score += (post.num_comments as f64 / 50.0).min(1.0) * 0.2;
        }
        "stocktwits" => score += (post.score as f64 / 20.0).min(1.0) * 0.4,
        "twitter" => score += 0.2,
        _ => {}
    }
    round_to(score.min(1.0), 2)
}
