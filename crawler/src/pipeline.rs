use crate::config::AppConfig;
use crate::models::VideoRecord;
use crate::services::crawler::crawl_ai_news;
use crate::services::report::{generate_html_report, save_report};
use crate::services::scoring::filter_top_videos;
use crate::services::youtube_api::VideoApi;
use crate::utils::format_number;
use anyhow::Result;
use log::info;
use std::path::PathBuf;

const SUMMARY_COUNT: usize = 5;

#[derive(Debug)]
pub struct DigestOutcome {
    pub total_videos: usize,
    pub top_videos: Vec<VideoRecord>,
    pub report_path: PathBuf,
    pub email_sent: bool,
}

/// One full pass: crawl, rank, write the report and mail it when configured.
/// Returns `None` when the crawl found nothing.
pub async fn run_digest(api: &dyn VideoApi, config: &AppConfig) -> Result<Option<DigestOutcome>> {
    info!("Starting weekly AI news crawl...");

    let all_videos = crawl_ai_news(api, &config.crawl, &config.profile).await;
    if all_videos.is_empty() {
        info!("No videos found");
        return Ok(None);
    }

    let total_videos = all_videos.len();
    let top_videos = filter_top_videos(all_videos, config.top_count);
    info!(
        "Found {total_videos} videos, selected top {}",
        top_videos.len()
    );

    let html = generate_html_report(&top_videos);
    let report_path = save_report(&html, &config.report_dir, None)?;

    let email_sent = if !config.recipients.is_empty() && config.email.is_configured() {
        config
            .email
            .send_email_report(&top_videos, &config.recipients, None)
            .await
    } else {
        false
    };

    log_summary(&top_videos);

    Ok(Some(DigestOutcome {
        total_videos,
        top_videos,
        report_path,
        email_sent,
    }))
}

fn log_summary(videos: &[VideoRecord]) {
    info!("Top {} AI videos this week:", videos.len());
    for (i, video) in videos.iter().take(SUMMARY_COUNT).enumerate() {
        info!("{}. {}", i + 1, video.title);
        info!("   Channel: {}", video.channel_name);
        info!(
            "   Views: {} | Score: {:.1}",
            format_number(video.view_count),
            video.relevance_score
        );
        info!("   URL: {}", video.url);
    }
}
