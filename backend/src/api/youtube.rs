use crate::error::ApiError;
use crate::models::{SentimentResponse, TopVideosResponse, TrendingTagsResponse};
use crate::services::video_service;
use crate::AppState;
use log::{error, info};
use rocket::serde::json::Json;
use rocket::{get, State};

#[get("/top-videos/<keyword>")]
pub async fn top_videos(
    keyword: &str,
    state: &State<AppState>,
) -> Result<Json<TopVideosResponse>, ApiError> {
    match video_service::top_videos(state.videos.as_ref(), keyword).await {
        Ok(videos) => {
            info!("Found {} top videos for {keyword:?}", videos.len());
            Ok(Json(TopVideosResponse { videos }))
        }
        Err(e) => {
            error!("Failed to fetch top videos for {keyword:?}: {e}");
            Err(e)
        }
    }
}

#[get("/sentiment/<keyword>")]
pub async fn sentiment(
    keyword: &str,
    state: &State<AppState>,
) -> Result<Json<SentimentResponse>, ApiError> {
    match video_service::sentiment_distribution(
        state.videos.as_ref(),
        state.language.as_ref(),
        state.sentiment.as_ref(),
        keyword,
    )
    .await
    {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            error!("Failed to analyze sentiment for {keyword:?}: {e}");
            Err(e)
        }
    }
}

#[get("/trending-tags/<keyword>")]
pub async fn trending_tags(
    keyword: &str,
    state: &State<AppState>,
) -> Result<Json<TrendingTagsResponse>, ApiError> {
    match video_service::trending_tags(state.videos.as_ref(), state.language.as_ref(), keyword)
        .await
    {
        Ok(tags) => Ok(Json(TrendingTagsResponse { tags })),
        Err(e) => {
            error!("Failed to fetch trending tags for {keyword:?}: {e}");
            Err(e)
        }
    }
}
