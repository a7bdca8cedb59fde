use crate::config::CrawlSettings;
use crate::models::{SearchRequest, VideoRecord, VideoStatistics};
use crate::services::scoring::{score_videos, ScoringProfile};
use crate::services::youtube_api::VideoApi;
use crate::utils::to_api_timestamp;
use anyhow::{anyhow, Result};
use chrono::{TimeDelta, Utc};
use log::{error, info, warn};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// Max ids per `videos` request accepted by the Data API.
pub const STATISTICS_BATCH_SIZE: usize = 50;

/// Search the past `days_back` days. Failures are logged and yield no videos.
pub async fn search_videos(
    api: &dyn VideoApi,
    query: &str,
    days_back: i64,
    max_results: u32,
) -> Vec<VideoRecord> {
    let end_date = Utc::now();
    let Some(start_date) =
        TimeDelta::try_days(days_back).and_then(|window| end_date.checked_sub_signed(window))
    else {
        error!("Search window of {days_back} days for '{query}' is out of range");
        return Vec::new();
    };

    let request = SearchRequest {
        query: query.to_string(),
        published_after: to_api_timestamp(&start_date),
        published_before: to_api_timestamp(&end_date),
        max_results,
    };

    let response = match api.search(&request).await {
        Ok(response) => response,
        Err(e) => {
            error!("Error searching videos for '{query}': {e:?}");
            return Vec::new();
        }
    };

    let items = response["items"].as_array().map(Vec::as_slice).unwrap_or_default();
    items
        .iter()
        .filter_map(|item| match parse_video_item(item) {
            Ok(video) => Some(video),
            Err(e) => {
                warn!("Error parsing video item: {e}");
                None
            }
        })
        .collect()
}

fn parse_video_item(item: &Value) -> Result<VideoRecord> {
    let snippet = &item["snippet"];
    let required = |value: &Value, field: &str| -> Result<String> {
        value
            .as_str()
            .map(String::from)
            .ok_or_else(|| anyhow!("missing field '{field}'"))
    };

    let video_id = required(&item["id"]["videoId"], "id.videoId")?;

    Ok(VideoRecord {
        url: VideoRecord::watch_url(&video_id),
        title: required(&snippet["title"], "snippet.title")?,
        channel_name: required(&snippet["channelTitle"], "snippet.channelTitle")?,
        channel_id: required(&snippet["channelId"], "snippet.channelId")?,
        published_at: required(&snippet["publishedAt"], "snippet.publishedAt")?,
        description: snippet["description"].as_str().unwrap_or("").to_string(),
        thumbnail_url: required(
            &snippet["thumbnails"]["high"]["url"],
            "snippet.thumbnails.high.url",
        )?,
        video_id,
        ..Default::default()
    })
}

/// Fetch statistics in batches of [`STATISTICS_BATCH_SIZE`]. A failed batch is logged
/// and its ids are left out of the result.
pub async fn get_video_statistics(
    api: &dyn VideoApi,
    video_ids: &[String],
    batch_delay: Duration,
) -> HashMap<String, VideoStatistics> {
    let mut video_stats = HashMap::new();
    let mut failed_batches = 0;

    for (index, batch) in video_ids.chunks(STATISTICS_BATCH_SIZE).enumerate() {
        if index > 0 {
            tokio::time::sleep(batch_delay).await;
        }

        match fetch_statistics_batch(api, batch).await {
            Ok(stats) => video_stats.extend(stats),
            Err(e) => {
                failed_batches += 1;
                error!("Error getting video statistics for {} videos: {e:?}", batch.len());
            }
        }
    }

    if failed_batches > 0 {
        warn!(
            "{failed_batches} statistics batches failed, {} of {} videos enriched",
            video_stats.len(),
            video_ids.len()
        );
    }

    video_stats
}

async fn fetch_statistics_batch(
    api: &dyn VideoApi,
    batch: &[String],
) -> Result<Vec<(String, VideoStatistics)>> {
    let response = api.videos(batch).await?;
    let items = response["items"]
        .as_array()
        .ok_or_else(|| anyhow!("Statistics response has no items"))?;

    Ok(items
        .iter()
        .filter_map(|item| {
            let video_id = item["id"].as_str()?.to_string();
            Some((video_id, parse_statistics(item)))
        })
        .collect())
}

fn parse_statistics(item: &Value) -> VideoStatistics {
    // Counts arrive as decimal strings
    let count = |field: &str| -> u64 {
        let value = &item["statistics"][field];
        value
            .as_str()
            .and_then(|s| s.parse().ok())
            .or_else(|| value.as_u64())
            .unwrap_or(0)
    };

    VideoStatistics {
        view_count: count("viewCount"),
        like_count: count("likeCount"),
        comment_count: count("commentCount"),
        duration: item["contentDetails"]["duration"]
            .as_str()
            .unwrap_or("PT0S")
            .to_string(),
    }
}

/// Merge search results, keeping the first record seen for each video id.
pub fn dedupe_videos<I>(lists: I) -> Vec<VideoRecord>
where
    I: IntoIterator<Item = Vec<VideoRecord>>,
{
    let mut seen = HashSet::new();
    lists
        .into_iter()
        .flatten()
        .filter(|video| seen.insert(video.video_id.clone()))
        .collect()
}

/// Run every configured query, merge, enrich and score the results.
pub async fn crawl_ai_news(
    api: &dyn VideoApi,
    settings: &CrawlSettings,
    profile: &ScoringProfile,
) -> Vec<VideoRecord> {
    info!(
        "Searching for AI videos from the past {} days...",
        settings.days_back
    );

    let mut results = Vec::with_capacity(settings.queries.len());
    for query in &settings.queries {
        info!("Searching for: {query}");
        let videos = search_videos(api, query, settings.days_back, settings.max_results).await;
        info!("Found {} videos for '{query}'", videos.len());
        results.push(videos);
        tokio::time::sleep(settings.query_delay).await;
    }

    let mut videos = dedupe_videos(results);
    info!("{} unique videos after merging queries", videos.len());

    let video_ids: Vec<String> = videos.iter().map(|v| v.video_id.clone()).collect();
    let stats = get_video_statistics(api, &video_ids, settings.batch_delay).await;

    for video in videos.iter_mut() {
        if let Some(stat) = stats.get(&video.video_id) {
            video.apply_statistics(stat);
        }
    }

    score_videos(&mut videos, profile, Utc::now());
    videos
}
