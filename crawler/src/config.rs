use crate::services::notifier::EmailPublisher;
use crate::services::scoring::ScoringProfile;
use crate::utils::split_csv;
use anyhow::{anyhow, Result};
use env_logger::Builder;
use log::{info, LevelFilter};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
const API_KEY_PLACEHOLDER: &str = "your_youtube_api_key_here";

pub const DEFAULT_SEARCH_QUERIES: &[&str] = &[
    "AI news this week",
    "artificial intelligence latest",
    "machine learning news",
    "AI breakthrough 2024",
    "ChatGPT GPT news",
    "AI development update",
];

pub fn init_logger() {
    Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();
    info!("Starting AI news crawler...");
}

pub fn load_environment() {
    dotenv::dotenv().ok();
}

#[derive(Debug, Clone)]
pub struct CrawlSettings {
    pub queries: Vec<String>,
    pub days_back: i64,
    pub max_results: u32,
    /// Pause after each search query.
    pub query_delay: Duration,
    /// Pause between statistics batches.
    pub batch_delay: Duration,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            queries: DEFAULT_SEARCH_QUERIES.iter().map(|q| q.to_string()).collect(),
            days_back: 7,
            max_results: 30,
            query_delay: Duration::from_secs(1),
            batch_delay: Duration::from_millis(100),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Cron expression: sec min hour day-of-month month day-of-week
    pub schedule: String,
    pub poll_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            schedule: "0 0 9 * * Mon".to_string(),
            poll_interval: Duration::from_secs(3600),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub youtube_api_key: String,
    pub api_base_url: String,
    pub email: EmailPublisher,
    pub recipients: Vec<String>,
    pub profile: ScoringProfile,
    pub crawl: CrawlSettings,
    pub top_count: usize,
    pub report_dir: PathBuf,
    pub scheduler: SchedulerConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let youtube_api_key = var("YOUTUBE_API_KEY")
            .filter(|key| key != API_KEY_PLACEHOLDER)
            .ok_or_else(|| {
                anyhow!(
                    "Please set your YouTube API key in the YOUTUBE_API_KEY environment variable"
                )
            })?;

        let email = EmailPublisher::new(
            Some(var("SMTP_SERVER").unwrap_or_else(|| "smtp.gmail.com".to_string())),
            parse_or(var("SMTP_PORT"), 587),
            var("EMAIL_USER"),
            var("EMAIL_PASSWORD"),
        );

        let mut profile = ScoringProfile::default();
        if let Some(keywords) = var("AI_KEYWORDS") {
            profile.keywords = split_csv(&keywords);
        }
        if let Some(channels) = var("AI_CHANNELS") {
            profile.channels = split_csv(&channels);
        }

        let defaults = CrawlSettings::default();
        let crawl = CrawlSettings {
            days_back: parse_or(var("CRAWL_DAYS_BACK"), defaults.days_back),
            max_results: parse_or(var("CRAWL_MAX_RESULTS"), defaults.max_results),
            ..defaults
        };

        let scheduler_defaults = SchedulerConfig::default();
        let scheduler = SchedulerConfig {
            schedule: var("DIGEST_SCHEDULE").unwrap_or(scheduler_defaults.schedule),
            poll_interval: var("SCHEDULER_POLL_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(scheduler_defaults.poll_interval),
        };

        Ok(Self {
            youtube_api_key,
            api_base_url: var("YOUTUBE_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            email,
            recipients: var("EMAIL_RECIPIENTS")
                .map(|v| split_csv(&v))
                .unwrap_or_default(),
            profile,
            crawl,
            top_count: parse_or(var("TOP_VIDEO_COUNT"), 15),
            report_dir: var("REPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            scheduler,
        })
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}
