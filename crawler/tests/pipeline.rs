use ai_news_crawler::config::AppConfig;
use ai_news_crawler::models::SearchRequest;
use ai_news_crawler::pipeline::run_digest;
use ai_news_crawler::services::youtube_api::VideoApi;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

struct StubApi {
    items: Vec<Value>,
    stats: Value,
    video_calls: Mutex<usize>,
}

#[async_trait]
impl VideoApi for StubApi {
    async fn search(&self, request: &SearchRequest) -> Result<Value> {
        if request.query == "broken" {
            return Err(anyhow!("HTTP status server error (503)"));
        }
        Ok(json!({ "items": self.items }))
    }

    async fn videos(&self, _video_ids: &[String]) -> Result<Value> {
        *self.video_calls.lock().unwrap() += 1;
        Ok(self.stats.clone())
    }
}

fn item(id: &str, title: &str, channel: &str, days_old: i64) -> Value {
    let published = (Utc::now() - ChronoDuration::days(days_old))
        .to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    json!({
        "id": { "videoId": id },
        "snippet": {
            "title": title,
            "channelTitle": channel,
            "channelId": format!("UC-{id}"),
            "publishedAt": published,
            "description": "",
            "thumbnails": { "high": { "url": format!("https://i.ytimg.com/vi/{id}/hqdefault.jpg") } }
        }
    })
}

fn stat(id: &str, views: u64, likes: u64) -> Value {
    json!({
        "id": id,
        "statistics": { "viewCount": views.to_string(), "likeCount": likes.to_string(), "commentCount": "3" },
        "contentDetails": { "duration": "PT12M5S" }
    })
}

fn test_config(report_dir: &Path, top_count: usize) -> AppConfig {
    let mut config = AppConfig::from_lookup(|key| match key {
        "YOUTUBE_API_KEY" => Some("test-key".to_string()),
        _ => None,
    })
    .unwrap();
    config.crawl.queries = vec!["AI news".to_string(), "broken".to_string(), "LLM".to_string()];
    config.crawl.query_delay = Duration::ZERO;
    config.crawl.batch_delay = Duration::ZERO;
    config.report_dir = report_dir.to_path_buf();
    config.top_count = top_count;
    config
}

#[tokio::test]
async fn digest_ranks_and_writes_report() {
    let api = StubApi {
        items: vec![
            item("low", "Gardening tips", "Garden Channel", 30),
            item("top", "OpenAI ships a new LLM", "Two Minute Papers", 1),
            item("mid", "Machine learning basics", "Some Teacher", 5),
        ],
        stats: json!({ "items": [
            stat("low", 500, 5),
            stat("top", 250_000, 10_000),
            stat("mid", 20_000, 400),
        ] }),
        video_calls: Mutex::new(0),
    };
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path(), 2);

    let outcome = run_digest(&api, &config).await.unwrap().expect("videos found");

    // the same three videos come back from both working queries
    assert_eq!(outcome.total_videos, 3);
    assert_eq!(*api.video_calls.lock().unwrap(), 1);

    let ranked: Vec<&str> = outcome.top_videos.iter().map(|v| v.video_id.as_str()).collect();
    assert_eq!(ranked, vec!["top", "mid"]);
    assert!(!outcome.email_sent);

    let html = fs::read_to_string(&outcome.report_path).unwrap();
    assert!(outcome.report_path.starts_with(dir.path()));
    assert!(html.contains("Top 2 AI videos from YouTube this week"));
    assert!(html.contains("OpenAI ships a new LLM"));
    assert!(html.contains("250,000 views"));
    assert!(html.contains("12m 5s"));
    assert!(!html.contains("Gardening tips"));
}

#[tokio::test]
async fn empty_crawl_writes_nothing() {
    let api = StubApi {
        items: Vec::new(),
        stats: json!({ "items": [] }),
        video_calls: Mutex::new(0),
    };
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path(), 15);

    assert!(run_digest(&api, &config).await.unwrap().is_none());
    assert_eq!(*api.video_calls.lock().unwrap(), 0);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn missing_statistics_keep_zeroed_metrics() {
    let api = StubApi {
        items: vec![item("a", "Cooking", "Chef", 20)],
        stats: json!({ "items": [] }),
        video_calls: Mutex::new(0),
    };
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path(), 15);

    let outcome = run_digest(&api, &config).await.unwrap().unwrap();
    let video = &outcome.top_videos[0];

    assert_eq!(video.view_count, 0);
    assert_eq!(video.duration, "");
    assert_eq!(video.relevance_score, 0.0);

    let html = fs::read_to_string(&outcome.report_path).unwrap();
    assert!(html.contains("⏱️ Unknown"));
}
