use crate::models::VideoRecord;
use crate::utils::{format_date, format_duration, format_number};
use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeZone};
use log::info;
use std::fmt::Display;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

const REPORT_STYLE: &str = r#"
        body { font-family: Arial, sans-serif; max-width: 800px; margin: 0 auto; padding: 20px; }
        .header { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 20px; border-radius: 10px; }
        .video-item { border: 1px solid #ddd; margin: 20px 0; padding: 15px; border-radius: 8px; }
        .video-title { font-size: 18px; font-weight: bold; margin-bottom: 10px; }
        .video-meta { color: #666; font-size: 14px; margin-bottom: 10px; }
        .video-stats { background: #f5f5f5; padding: 10px; border-radius: 5px; }
        .thumbnail { float: left; margin-right: 15px; border-radius: 5px; }
        .clear { clear: both; }
        a { color: #1976d2; text-decoration: none; }
        a:hover { text-decoration: underline; }
"#;

pub fn generate_html_report(videos: &[VideoRecord]) -> String {
    render_report(videos, Local::now())
}

/// Render the digest. Titles and channel names are emitted as delivered by the API,
/// which already entity-encodes them.
pub fn render_report<Tz>(videos: &[VideoRecord], generated_at: DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Weekly AI News - YouTube Roundup</title>
    <style>{REPORT_STYLE}    </style>
</head>
<body>
    <div class="header">
        <h1>🤖 Weekly AI News Roundup</h1>
        <p>Top {count} AI videos from YouTube this week</p>
        <p>Generated on {generated}</p>
    </div>
"#,
        count = videos.len(),
        generated = generated_at.format("%B %d, %Y"),
    );

    for (i, video) in videos.iter().enumerate() {
        // writing into a String cannot fail
        let _ = write!(
            html,
            r#"
    <div class="video-item">
        <img src="{thumbnail}" alt="Thumbnail" class="thumbnail" width="120" height="90">
        <div class="video-title">
            {rank}. <a href="{url}" target="_blank">{title}</a>
        </div>
        <div class="video-meta">
            📺 {channel} | 📅 {published} | ⏱️ {duration}
        </div>
        <div class="video-stats">
            👀 {views} views |
            👍 {likes} likes |
            💬 {comments} comments |
            📊 Score: {score:.1}
        </div>
        <div class="clear"></div>
    </div>
"#,
            thumbnail = video.thumbnail_url,
            rank = i + 1,
            url = video.url,
            title = video.title,
            channel = video.channel_name,
            published = format_date(&video.published_at),
            duration = format_duration(&video.duration),
            views = format_number(video.view_count),
            likes = format_number(video.like_count),
            comments = format_number(video.comment_count),
            score = video.relevance_score,
        );
    }

    html.push_str(
        r#"
    <div style="margin-top: 30px; text-align: center; color: #666;">
        <p>This report was automatically generated by YouTube AI News Crawler</p>
    </div>
</body>
</html>
"#,
    );

    html
}

pub fn default_report_filename() -> String {
    format!("ai_news_weekly_{}.html", Local::now().format("%Y%m%d"))
}

/// Write the report into `report_dir`, replacing any previous file of the same name.
pub fn save_report(html: &str, report_dir: &Path, filename: Option<&str>) -> Result<PathBuf> {
    let filename = filename
        .map(String::from)
        .unwrap_or_else(default_report_filename);
    let path = report_dir.join(filename);

    fs::write(&path, html).with_context(|| format!("Failed to write report to {}", path.display()))?;

    info!("Report saved to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample(id: &str, title: &str, score: f64) -> VideoRecord {
        VideoRecord {
            video_id: id.to_string(),
            title: title.to_string(),
            channel_name: "AI Explained".to_string(),
            channel_id: "UC123".to_string(),
            published_at: "2024-01-15T10:00:00Z".to_string(),
            view_count: 1_234_567,
            like_count: 4_321,
            comment_count: 12,
            duration: "PT1H2M3S".to_string(),
            description: String::new(),
            url: VideoRecord::watch_url(id),
            thumbnail_url: format!("https://i.ytimg.com/vi/{id}/hqdefault.jpg"),
            relevance_score: score,
        }
    }

    #[test]
    fn header_has_count_and_generation_date() {
        let generated = Utc.with_ymd_and_hms(2024, 1, 22, 9, 0, 0).unwrap();
        let html = render_report(&[sample("a", "One", 1.0), sample("b", "Two", 2.0)], generated);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Top 2 AI videos from YouTube this week"));
        assert!(html.contains("Generated on January 22, 2024"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn video_block_shows_formatted_fields() {
        let generated = Utc.with_ymd_and_hms(2024, 1, 22, 9, 0, 0).unwrap();
        let html = render_report(&[sample("abc", "GPT news", 13.456)], generated);

        assert!(html.contains(r#"1. <a href="https://www.youtube.com/watch?v=abc" target="_blank">GPT news</a>"#));
        assert!(html.contains(r#"<img src="https://i.ytimg.com/vi/abc/hqdefault.jpg""#));
        assert!(html.contains("📺 AI Explained | 📅 Jan 15, 2024 | ⏱️ 1h 2m 3s"));
        assert!(html.contains("👀 1,234,567 views"));
        assert!(html.contains("👍 4,321 likes"));
        assert!(html.contains("💬 12 comments"));
        assert!(html.contains("📊 Score: 13.5"));
    }

    #[test]
    fn blocks_follow_input_order() {
        let generated = Utc.with_ymd_and_hms(2024, 1, 22, 9, 0, 0).unwrap();
        let html = render_report(&[sample("z", "Zulu", 1.0), sample("a", "Alpha", 9.0)], generated);

        let zulu = html.find("1. <a href=\"https://www.youtube.com/watch?v=z\"").unwrap();
        let alpha = html.find("2. <a href=\"https://www.youtube.com/watch?v=a\"").unwrap();
        assert!(zulu < alpha);
    }

    #[test]
    fn unknown_duration_and_raw_date() {
        let mut video = sample("a", "One", 0.0);
        video.duration = String::new();
        video.published_at = "sometime".to_string();
        let html = render_report(&[video], Utc::now());

        assert!(html.contains("📅 sometime | ⏱️ Unknown"));
        assert!(html.contains("📊 Score: 0.0"));
    }

    #[test]
    fn save_overwrites_existing_report() {
        let dir = tempfile::tempdir().unwrap();

        let first = save_report("<html>old and much longer</html>", dir.path(), Some("digest.html")).unwrap();
        let second = save_report("<html>new</html>", dir.path(), Some("digest.html")).unwrap();

        assert_eq!(first, second);
        assert_eq!(fs::read_to_string(&second).unwrap(), "<html>new</html>");
    }

    #[test]
    fn default_filename_is_date_stamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_report("<html></html>", dir.path(), None).unwrap();

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("ai_news_weekly_"));
        assert!(name.ends_with(".html"));
        assert_eq!(name.len(), "ai_news_weekly_YYYYMMDD.html".len());
    }
}
