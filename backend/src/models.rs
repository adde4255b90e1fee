use crate::services::normalizer::NormalizedResult;
use rocket::serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendResponse {
    pub interest_over_time: NormalizedResult,
    pub interest_by_region: NormalizedResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopVideo {
    pub title: String,
    pub views: u64,
    pub thumbnail: String,
    pub channel: String,
    #[serde(rename = "videoId")]
    pub video_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TopVideosResponse {
    pub videos: Vec<TopVideo>,
}

/// One value per sentiment class, keyed by the capitalized label on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentBreakdown<T> {
    #[serde(rename = "Negative")]
    pub negative: T,
    #[serde(rename = "Neutral")]
    pub neutral: T,
    #[serde(rename = "Positive")]
    pub positive: T,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResponse {
    pub sentiment_counts: SentimentBreakdown<u32>,
    pub sentiment_percentages: SentimentBreakdown<f64>,
    pub total_analyzed: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TrendingTagsResponse {
    pub tags: Vec<TagCount>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub detail: String,
}
