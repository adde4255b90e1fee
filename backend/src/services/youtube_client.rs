use crate::error::ProviderError;
use crate::utils::decode_html_entities;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOrder {
    Date,
    Relevance,
    ViewCount,
}

impl SearchOrder {
    fn as_str(&self) -> &'static str {
        match self {
            SearchOrder::Date => "date",
            SearchOrder::Relevance => "relevance",
            SearchOrder::ViewCount => "viewCount",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub order: SearchOrder,
    pub max_results: u32,
    /// Ask for moderate content filtering.
    pub safe_search: bool,
}

impl SearchRequest {
    /// Search for the keyword as an exact (quoted) phrase.
    pub fn exact_phrase(keyword: &str, order: SearchOrder, max_results: u32) -> Self {
        Self {
            query: format!("\"{keyword}\""),
            order,
            max_results,
            safe_search: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchItem {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub channel_title: String,
    pub thumbnail_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VideoDetail {
    pub video_id: String,
    pub view_count: u64,
    pub tags: Vec<String>,
}

#[rocket::async_trait]
pub trait VideoPlatform: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchItem>, ProviderError>;

    async fn details(&self, video_ids: &[String]) -> Result<Vec<VideoDetail>, ProviderError>;
}

/// The Data API accepts at most 50 ids per `videos` call and 50 results per search page.
const MAX_PAGE_SIZE: u32 = 50;

pub struct YouTubeClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl YouTubeClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        resource: &str,
        params: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        // Documentation: https://developers.google.com/youtube/v3/docs
        let url = format!("{}/{}", self.base_url, resource);
        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[rocket::async_trait]
impl VideoPlatform for YouTubeClient {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchItem>, ProviderError> {
        let params = [
            ("part", "snippet".to_string()),
            ("type", "video".to_string()),
            ("q", request.query.clone()),
            ("order", request.order.as_str().to_string()),
            ("maxResults", request.max_results.min(MAX_PAGE_SIZE).to_string()),
            (
                "safeSearch",
                if request.safe_search { "moderate" } else { "none" }.to_string(),
            ),
        ];
        let response: SearchListResponse = self.get("search", &params).await?;

        let items: Vec<SearchItem> = response
            .items
            .into_iter()
            .filter_map(SearchResource::into_item)
            .collect();
        debug!("YouTube search {:?} returned {} videos", request.query, items.len());
        Ok(items)
    }

    async fn details(&self, video_ids: &[String]) -> Result<Vec<VideoDetail>, ProviderError> {
        let mut details = Vec::with_capacity(video_ids.len());

        for chunk in video_ids.chunks(MAX_PAGE_SIZE as usize) {
            let params = [
                ("part", "snippet,statistics".to_string()),
                ("id", chunk.join(",")),
                ("maxResults", MAX_PAGE_SIZE.to_string()),
            ];
            let response: VideoListResponse = self.get("videos", &params).await?;
            details.extend(response.items.into_iter().map(VideoResource::into_detail));
        }

        Ok(details)
    }
}

#[derive(Debug, Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchResource>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    video_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    default: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    high: Option<Thumbnail>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Snippet {
    title: String,
    description: String,
    channel_title: String,
    thumbnails: Thumbnails,
    tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResource {
    id: ResourceId,
    #[serde(default)]
    snippet: Snippet,
}

impl SearchResource {
    fn into_item(self) -> Option<SearchItem> {
        let video_id = self.id.video_id?;
        let thumbnails = self.snippet.thumbnails;
        let thumbnail_url = thumbnails
            .high
            .or(thumbnails.medium)
            .or(thumbnails.default)
            .map(|t| t.url)
            .unwrap_or_default();

        Some(SearchItem {
            video_id,
            title: decode_html_entities(&self.snippet.title),
            description: decode_html_entities(&self.snippet.description),
            channel_title: decode_html_entities(&self.snippet.channel_title),
            thumbnail_url,
        })
    }
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoResource>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Statistics {
    view_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoResource {
    id: String,
    #[serde(default)]
    snippet: Snippet,
    #[serde(default)]
    statistics: Statistics,
}

impl VideoResource {
    fn into_detail(self) -> VideoDetail {
        VideoDetail {
            video_id: self.id,
            // The API sends counts as strings and omits them when hidden.
            view_count: self
                .statistics
                .view_count
                .and_then(|count| count.parse().ok())
                .unwrap_or(0),
            tags: self.snippet.tags,
        }
    }
}
