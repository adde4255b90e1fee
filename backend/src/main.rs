#[macro_use]
extern crate rocket;

mod api;
mod config;
mod error;
mod models;
mod services;
mod utils;

use crate::services::text_analysis::{LanguageDetector, SentimentClassifier};
use crate::services::trends_provider::TrendsProvider;
use crate::services::youtube_client::VideoPlatform;
use log::error;
use rocket::{Build, Rocket};
use std::sync::Arc;

/// Service handles shared by every request, built once at startup.
pub struct AppState {
    pub trends: Arc<dyn TrendsProvider>,
    pub videos: Arc<dyn VideoPlatform>,
    pub language: Arc<dyn LanguageDetector>,
    pub sentiment: Arc<dyn SentimentClassifier>,
}

pub fn build_rocket(state: AppState) -> Rocket<Build> {
    rocket::build()
        .manage(state)
        .mount("/", routes![api::index, api::categories])
        .mount("/trends", routes![api::compare_trends, api::single_trend])
        .mount(
            "/youtube",
            routes![api::top_videos, api::sentiment, api::trending_tags],
        )
        .register("/", catchers![api::default_catcher])
}

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    config::load_environment();
    config::init_logger();

    let settings = config::Config::from_env().inspect_err(|e| error!("{e:#}"))?;
    let state = config::create_app_state(&settings)?;
    let cors = config::create_cors(&settings)?;

    build_rocket(state)
        .attach(cors)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Rocket failed to launch: {e}"))?;

    Ok(())
}
