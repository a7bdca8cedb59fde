#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoRecord {
    pub video_id: String,
    pub title: String,
    pub channel_name: String,
    pub channel_id: String,
    pub published_at: String, // ISO8601
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub duration: String, // ISO8601 period, e.g. PT4M13S
    pub description: String,
    pub url: String,
    pub thumbnail_url: String,
    pub relevance_score: f64,
}

impl VideoRecord {
    pub fn watch_url(video_id: &str) -> String {
        format!("https://www.youtube.com/watch?v={video_id}")
    }

    pub fn apply_statistics(&mut self, stats: &VideoStatistics) {
        self.view_count = stats.view_count;
        self.like_count = stats.like_count;
        self.comment_count = stats.comment_count;
        self.duration = stats.duration.clone();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoStatistics {
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub duration: String,
}

impl Default for VideoStatistics {
    fn default() -> Self {
        Self {
            view_count: 0,
            like_count: 0,
            comment_count: 0,
            duration: "PT0S".to_string(),
        }
    }
}

/// Parameters of a single `search` call against the Data API.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub published_after: String,
    pub published_before: String,
    pub max_results: u32,
}
