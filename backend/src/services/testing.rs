//! In-memory collaborators for service and route tests.

use crate::error::ProviderError;
use crate::services::text_analysis::{
    LanguageDetector, SentimentClassifier, SentimentScores, ENGLISH,
};
use crate::services::trends_provider::{
    RegionalTable, Resolution, TimeSeriesTable, TrendPayload, TrendQuery, TrendsProvider,
};
use crate::services::youtube_client::{SearchItem, SearchRequest, VideoDetail, VideoPlatform};
use std::collections::HashMap;
use std::sync::Mutex;

fn unavailable() -> ProviderError {
    ProviderError::Api {
        status: 503,
        message: "service unavailable".to_string(),
    }
}

pub struct FakeVideoPlatform {
    items: Vec<SearchItem>,
    details: Vec<VideoDetail>,
    fail: bool,
    searches: Mutex<Vec<SearchRequest>>,
    requested: Mutex<Vec<String>>,
}

impl FakeVideoPlatform {
    pub fn new(items: Vec<SearchItem>, details: Vec<VideoDetail>) -> Self {
        Self {
            items,
            details,
            fail: false,
            searches: Mutex::new(Vec::new()),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new(), Vec::new())
        }
    }

    pub fn last_search(&self) -> Option<SearchRequest> {
        self.searches.lock().unwrap().last().cloned()
    }

    pub fn requested_ids(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[rocket::async_trait]
impl VideoPlatform for FakeVideoPlatform {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchItem>, ProviderError> {
        self.searches.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(unavailable());
        }
        Ok(self
            .items
            .iter()
            .take(request.max_results as usize)
            .cloned()
            .collect())
    }

    async fn details(&self, video_ids: &[String]) -> Result<Vec<VideoDetail>, ProviderError> {
        self.requested.lock().unwrap().extend_from_slice(video_ids);
        if self.fail {
            return Err(unavailable());
        }
        Ok(self
            .details
            .iter()
            .filter(|detail| video_ids.contains(&detail.video_id))
            .cloned()
            .collect())
    }
}

/// Reports English for every title unless overridden.
pub struct FakeDetector {
    overrides: HashMap<String, Result<String, ()>>,
}

impl FakeDetector {
    pub fn english() -> Self {
        Self {
            overrides: HashMap::new(),
        }
    }

    pub fn with(mut self, title: &str, language: Result<&str, ()>) -> Self {
        self.overrides
            .insert(title.to_string(), language.map(str::to_string));
        self
    }
}

impl LanguageDetector for FakeDetector {
    fn detect(&self, text: &str) -> Result<String, ProviderError> {
        match self.overrides.get(text) {
            Some(Ok(language)) => Ok(language.clone()),
            Some(Err(())) => Err(ProviderError::Detection(text.to_string())),
            None => Ok(ENGLISH.to_string()),
        }
    }
}

/// Gives every text the same scores.
pub struct FixedClassifier(pub SentimentScores);

#[rocket::async_trait]
impl SentimentClassifier for FixedClassifier {
    async fn classify(&self, _text: &str) -> Result<SentimentScores, ProviderError> {
        Ok(self.0)
    }
}

#[derive(Default)]
pub struct FakeTrendsProvider {
    pub time_series: Option<TimeSeriesTable>,
    pub regional: Option<RegionalTable>,
    pub fail_payload: bool,
    pub queries: Mutex<Vec<TrendQuery>>,
    pub resolutions: Mutex<Vec<Resolution>>,
}

impl FakeTrendsProvider {
    pub fn recorded_queries(&self) -> Vec<TrendQuery> {
        self.queries.lock().unwrap().clone()
    }

    pub fn recorded_resolutions(&self) -> Vec<Resolution> {
        self.resolutions.lock().unwrap().clone()
    }
}

#[rocket::async_trait]
impl TrendsProvider for FakeTrendsProvider {
    async fn build_payload(&self, query: &TrendQuery) -> Result<TrendPayload, ProviderError> {
        self.queries.lock().unwrap().push(query.clone());
        if self.fail_payload {
            return Err(unavailable());
        }
        Ok(TrendPayload {
            keywords: query.keywords.clone(),
            timeline: None,
            geo_map: None,
        })
    }

    async fn interest_over_time(
        &self,
        _payload: &TrendPayload,
    ) -> Result<TimeSeriesTable, ProviderError> {
        self.time_series.clone().ok_or_else(unavailable)
    }

    async fn interest_by_region(
        &self,
        _payload: &TrendPayload,
        resolution: Resolution,
    ) -> Result<RegionalTable, ProviderError> {
        self.resolutions.lock().unwrap().push(resolution);
        self.regional.clone().ok_or_else(unavailable)
    }
}
