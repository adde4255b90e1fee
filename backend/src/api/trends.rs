use crate::error::ApiError;
use crate::models::TrendResponse;
use crate::services::categories::Timeframe;
use crate::services::trends_service::{self, DEFAULT_GEO};
use crate::AppState;
use log::error;
use rocket::serde::json::Json;
use rocket::{get, State};

#[get("/compare/<category>?<keywords>&<timeframe>&<geo>", rank = 1)]
pub async fn compare_trends(
    category: &str,
    keywords: Option<Vec<String>>,
    timeframe: Option<String>,
    geo: Option<String>,
    state: &State<AppState>,
) -> Result<Json<TrendResponse>, ApiError> {
    let keywords = keywords.unwrap_or_default();
    let timeframe = timeframe.unwrap_or_else(|| Timeframe::default().to_string());
    let geo = geo.unwrap_or_else(|| DEFAULT_GEO.to_string());

    trends_service::compare_trends(state.trends.as_ref(), category, &keywords, &timeframe, &geo)
        .await
        .map(Json)
        .inspect_err(|e| error!("Trend comparison for {category} {keywords:?} failed: {e}"))
}

#[get("/<category>/<keyword>?<timeframe>&<geo>", rank = 2)]
pub async fn single_trend(
    category: &str,
    keyword: &str,
    timeframe: Option<String>,
    geo: Option<String>,
    state: &State<AppState>,
) -> Result<Json<TrendResponse>, ApiError> {
    let timeframe = timeframe.unwrap_or_else(|| Timeframe::default().to_string());
    let geo = geo.unwrap_or_else(|| DEFAULT_GEO.to_string());

    trends_service::get_single_trend(state.trends.as_ref(), category, keyword, &timeframe, &geo)
        .await
        .map(Json)
        .inspect_err(|e| error!("Trend lookup for {category}/{keyword} failed: {e}"))
}
