use crate::services::text_analysis::{
    InferenceClassifier, LexiconClassifier, SentimentClassifier, WhatlangDetector,
};
use crate::services::trends_provider::GoogleTrendsClient;
use crate::services::youtube_client::YouTubeClient;
use crate::AppState;
use anyhow::{Context, Result};
use env_logger::Builder;
use log::{info, LevelFilter};
use rocket::http::Method;
use rocket_cors::{AllowedHeaders, AllowedOrigins, CorsOptions};
use std::env;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

const DEFAULT_YOUTUBE_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
const DEFAULT_TRENDS_BASE_URL: &str = "https://trends.google.com";
const DEFAULT_SENTIMENT_API_URL: &str =
    "https://api-inference.huggingface.co/models/cardiffnlp/twitter-roberta-base-sentiment-latest";

#[derive(Debug, Clone)]
pub struct Config {
    pub youtube_api_key: String,
    pub youtube_api_base_url: String,
    pub trends_base_url: String,
    pub trends_host_language: String,
    pub trends_tz_offset: i32,
    pub sentiment_api_url: String,
    pub sentiment_api_token: Option<String>,
    pub upstream_timeout: Duration,
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let youtube_api_key = lookup("YOUTUBE_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .context("YOUTUBE_API_KEY environment variable must be set")?;

        let youtube_api_base_url = var("YOUTUBE_API_BASE_URL", DEFAULT_YOUTUBE_API_BASE_URL);
        let trends_base_url = var("TRENDS_BASE_URL", DEFAULT_TRENDS_BASE_URL);
        let sentiment_api_url = var("SENTIMENT_API_URL", DEFAULT_SENTIMENT_API_URL);
        for url in [&youtube_api_base_url, &trends_base_url, &sentiment_api_url] {
            Url::parse(url).with_context(|| format!("Invalid service URL: {url}"))?;
        }

        let trends_tz_offset = var("TRENDS_TZ", "360")
            .parse::<i32>()
            .context("TRENDS_TZ must be a whole number of minutes")?;
        let timeout_secs = var("UPSTREAM_TIMEOUT_SECS", "10")
            .parse::<u64>()
            .context("UPSTREAM_TIMEOUT_SECS must be a whole number of seconds")?;

        Ok(Self {
            youtube_api_key,
            youtube_api_base_url,
            trends_base_url,
            trends_host_language: var("TRENDS_HL", "en-US"),
            trends_tz_offset,
            sentiment_api_url,
            sentiment_api_token: lookup("SENTIMENT_API_TOKEN").filter(|t| !t.trim().is_empty()),
            upstream_timeout: Duration::from_secs(timeout_secs),
            cors_allowed_origins: var("CORS_ALLOWED_ORIGINS", "http://localhost:3000")
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
        })
    }
}

pub fn init_logger() {
    Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();
    info!("Starting CPG trends backend...");
}

pub fn load_environment() {
    dotenv::dotenv().ok();
}

pub fn create_app_state(config: &Config) -> Result<AppState> {
    let trends = GoogleTrendsClient::new(
        &config.trends_base_url,
        &config.trends_host_language,
        config.trends_tz_offset,
        config.upstream_timeout,
    )?;
    let videos = YouTubeClient::new(
        &config.youtube_api_base_url,
        &config.youtube_api_key,
        config.upstream_timeout,
    )?;
    info!("Using YouTube Data API at: {}", config.youtube_api_base_url);

    let sentiment: Arc<dyn SentimentClassifier> = match &config.sentiment_api_token {
        Some(token) => {
            info!("Classifying sentiment with {}", config.sentiment_api_url);
            Arc::new(InferenceClassifier::new(
                &config.sentiment_api_url,
                token,
                config.upstream_timeout,
            )?)
        }
        None => {
            info!("SENTIMENT_API_TOKEN not set, using the built-in lexicon classifier");
            Arc::new(LexiconClassifier)
        }
    };

    Ok(AppState {
        trends: Arc::new(trends),
        videos: Arc::new(videos),
        language: Arc::new(WhatlangDetector),
        sentiment,
    })
}

pub fn create_cors(config: &Config) -> Result<rocket_cors::Cors> {
    let cors = CorsOptions::default()
        .allowed_origins(AllowedOrigins::some_exact(&config.cors_allowed_origins))
        .allowed_methods(
            vec![Method::Get, Method::Options]
                .into_iter()
                .map(From::from)
                .collect(),
        )
        .allowed_headers(AllowedHeaders::some(&["Accept", "Content-Type"]))
        .allow_credentials(true)
        .to_cors()
        .map_err(|e| anyhow::anyhow!("Failed to create CORS options: {}", e))?;

    Ok(cors)
}
