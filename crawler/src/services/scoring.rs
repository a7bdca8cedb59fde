use crate::models::VideoRecord;
use crate::utils::{compare_with_order_float, parse_iso8601_timestamp, SortOrder};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

pub const DEFAULT_AI_KEYWORDS: &[&str] = &[
    "artificial intelligence",
    "AI news",
    "machine learning",
    "deep learning",
    "neural networks",
    "OpenAI",
    "ChatGPT",
    "GPT",
    "LLM",
    "large language model",
    "AI breakthrough",
    "AI development",
    "AI research",
    "generative AI",
    "computer vision",
    "natural language processing",
    "NLP",
    "AI ethics",
    "AI regulation",
    "AI startup",
    "AI company",
    "AI technology",
];

// Channels whose uploads get a flat reputation bonus
pub const DEFAULT_AI_CHANNELS: &[&str] = &[
    "Two Minute Papers",
    "Yannic Kilcher",
    "AI Explained",
    "Machine Learning Street Talk",
    "Lex Fridman",
    "The AI Advantage",
    "AI Coffee Break",
    "DeepMind",
    "OpenAI",
    "Artificial Intelligence News",
];

const VIEW_SCALE: f64 = 10_000.0;
const VIEW_CAP: f64 = 10.0;
const LIKE_RATIO_SCALE: f64 = 100.0;
const CHANNEL_BONUS: f64 = 5.0;
const KEYWORD_POINTS: f64 = 2.0;

/// Allow-lists the scorer matches titles and channels against.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringProfile {
    pub keywords: Vec<String>,
    pub channels: Vec<String>,
}

impl Default for ScoringProfile {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_AI_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            channels: DEFAULT_AI_CHANNELS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Score a video against the current wall-clock time.
pub fn relevance_score(video: &VideoRecord, profile: &ScoringProfile) -> f64 {
    relevance_score_at(video, profile, Utc::now())
}

/// Score a video relative to `now`. Expects statistics to be populated already.
pub fn relevance_score_at(video: &VideoRecord, profile: &ScoringProfile, now: DateTime<Utc>) -> f64 {
    view_points(video)
        + like_ratio_points(video)
        + channel_points(video, profile)
        + keyword_points(&video.title, profile)
        + recency_points(&video.published_at, now)
}

fn view_points(video: &VideoRecord) -> f64 {
    if video.view_count == 0 {
        return 0.0;
    }
    (video.view_count as f64 / VIEW_SCALE).min(VIEW_CAP)
}

// Not clamped: stale statistics can report more likes than views.
fn like_ratio_points(video: &VideoRecord) -> f64 {
    if video.view_count == 0 || video.like_count == 0 {
        return 0.0;
    }
    video.like_count as f64 / video.view_count as f64 * LIKE_RATIO_SCALE
}

fn channel_points(video: &VideoRecord, profile: &ScoringProfile) -> f64 {
    if profile.channels.iter().any(|c| *c == video.channel_name) {
        CHANNEL_BONUS
    } else {
        0.0
    }
}

fn keyword_points(title: &str, profile: &ScoringProfile) -> f64 {
    let title_lower = title.to_lowercase();
    let matches = profile
        .keywords
        .iter()
        .map(|k| k.to_lowercase())
        .collect::<HashSet<_>>()
        .into_iter()
        .filter(|k| title_lower.contains(k.as_str()))
        .count();

    matches as f64 * KEYWORD_POINTS
}

fn recency_points(published_at: &str, now: DateTime<Utc>) -> f64 {
    let Some(published) = parse_iso8601_timestamp(published_at) else {
        return 0.0;
    };

    let days_old = now
        .with_timezone(published.offset())
        .signed_duration_since(published)
        .num_days();

    if days_old <= 2 {
        3.0
    } else if days_old <= 7 {
        1.0
    } else {
        0.0
    }
}

/// Fill in `relevance_score` for every video.
pub fn score_videos(videos: &mut [VideoRecord], profile: &ScoringProfile, now: DateTime<Utc>) {
    for video in videos.iter_mut() {
        video.relevance_score = relevance_score_at(video, profile, now);
    }
}

/// Highest scores first; equal scores keep their input order.
pub fn filter_top_videos(mut videos: Vec<VideoRecord>, count: usize) -> Vec<VideoRecord> {
    videos.sort_by(|a, b| {
        compare_with_order_float(a.relevance_score, b.relevance_score, SortOrder::Desc)
    });
    videos.truncate(count);
    videos
}
