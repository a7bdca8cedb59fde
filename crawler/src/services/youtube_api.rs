use crate::models::SearchRequest;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use url::Url;

/// Access to the two Data API endpoints the crawler needs.
/// Responses are handed back as raw JSON, parsing happens in the crawler.
#[async_trait]
pub trait VideoApi: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<Value>;

    async fn videos(&self, video_ids: &[String]) -> Result<Value>;
}

pub struct YouTubeClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl YouTubeClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url> {
        let url = format!("{}/{path}", self.base_url);
        let mut params: Vec<(&str, &str)> = params.to_vec();
        params.push(("key", self.api_key.as_str()));

        Url::parse_with_params(&url, &params).with_context(|| format!("Invalid API URL: {url}"))
    }

    fn search_url(&self, request: &SearchRequest) -> Result<Url> {
        let max_results = request.max_results.to_string();
        self.endpoint(
            "search",
            &[
                ("part", "snippet"),
                ("q", request.query.as_str()),
                ("type", "video"),
                ("order", "relevance"),
                ("publishedAfter", request.published_after.as_str()),
                ("publishedBefore", request.published_before.as_str()),
                ("maxResults", max_results.as_str()),
            ],
        )
    }

    async fn get_json(&self, url: Url) -> Result<Value> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.json::<Value>().await?)
    }
}

#[async_trait]
impl VideoApi for YouTubeClient {
    // Documentation: https://developers.google.com/youtube/v3/docs/search/list
    async fn search(&self, request: &SearchRequest) -> Result<Value> {
        let url = self.search_url(request)?;

        self.get_json(url)
            .await
            .with_context(|| format!("Search request for '{}' failed", request.query))
    }

    // Documentation: https://developers.google.com/youtube/v3/docs/videos/list
    async fn videos(&self, video_ids: &[String]) -> Result<Value> {
        let ids = video_ids.join(",");
        let url = self.endpoint(
            "videos",
            &[("part", "statistics,contentDetails"), ("id", ids.as_str())],
        )?;

        self.get_json(url)
            .await
            .with_context(|| format!("Statistics request for {} videos failed", video_ids.len()))
    }
}
