use crate::error::ApiError;
use crate::models::TrendResponse;
use crate::services::categories::{category_names, find_category, Category, Timeframe};
use crate::services::normalizer::normalize;
use crate::services::trends_provider::{RawTable, Resolution, TrendQuery, TrendsProvider};
use log::{info, warn};

pub const DEFAULT_GEO: &str = "US";
pub const MAX_COMPARE_KEYWORDS: usize = 5;

/// Shared check for both trend operations.
pub fn validate_query(
    category: &str,
    timeframe: &str,
) -> Result<(&'static Category, Timeframe), ApiError> {
    let timeframe = timeframe.parse::<Timeframe>().map_err(|_| {
        ApiError::InvalidParameter(format!(
            "Invalid timeframe. Must be one of: {}",
            Timeframe::valid_values()
        ))
    })?;

    let category = find_category(category).ok_or_else(|| {
        ApiError::InvalidParameter(format!(
            "Invalid category. Must be one of: {}",
            category_names().join(", ")
        ))
    })?;

    Ok((category, timeframe))
}

pub async fn get_single_trend(
    provider: &dyn TrendsProvider,
    category: &str,
    keyword: &str,
    timeframe: &str,
    geo: &str,
) -> Result<TrendResponse, ApiError> {
    let (category, timeframe) = validate_query(category, timeframe)?;

    let query = TrendQuery {
        keywords: vec![keyword.to_string()],
        category_id: category.provider_category_id,
        timeframe,
        geo: geo.to_string(),
    };
    fetch_trend(provider, query, Resolution::Region).await
}

pub async fn compare_trends(
    provider: &dyn TrendsProvider,
    category: &str,
    keywords: &[String],
    timeframe: &str,
    geo: &str,
) -> Result<TrendResponse, ApiError> {
    let (category, timeframe) = validate_query(category, timeframe)?;

    if keywords.is_empty() || keywords.len() > MAX_COMPARE_KEYWORDS {
        return Err(ApiError::InvalidParameter(format!(
            "Must provide between 1 and {MAX_COMPARE_KEYWORDS} keywords"
        )));
    }

    let query = TrendQuery {
        keywords: keywords.to_vec(),
        category_id: category.provider_category_id,
        timeframe,
        geo: geo.to_string(),
    };
    fetch_trend(provider, query, Resolution::State).await
}

/// Either half may fail on its own; a failed half is reported as `{}`.
async fn fetch_trend(
    provider: &dyn TrendsProvider,
    query: TrendQuery,
    resolution: Resolution,
) -> Result<TrendResponse, ApiError> {
    let payload = provider.build_payload(&query).await.map_err(|e| {
        ApiError::InvalidParameter(format!("Error building trends payload: {e}"))
    })?;

    let (over_time, by_region) = tokio::join!(
        provider.interest_over_time(&payload),
        provider.interest_by_region(&payload, resolution)
    );

    let over_time = match over_time {
        Ok(table) => Some(RawTable::TimeSeries(table)),
        Err(e) => {
            warn!("Error fetching interest over time for {:?}: {e}", query.keywords);
            None
        }
    };
    let by_region = match by_region {
        Ok(table) => Some(RawTable::Regional(table)),
        Err(e) => {
            warn!("Error fetching regional data for {:?}: {e}", query.keywords);
            None
        }
    };

    let response = TrendResponse {
        interest_over_time: normalize(over_time.as_ref()),
        interest_by_region: normalize(by_region.as_ref()),
    };
    info!(
        "Trends for {:?}: time series {}, regional {}",
        query.keywords,
        if response.interest_over_time.is_empty() { "empty" } else { "present" },
        if response.interest_by_region.is_empty() { "empty" } else { "present" },
    );
    Ok(response)
}
