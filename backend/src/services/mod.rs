pub mod categories;
pub mod normalizer;
pub mod region_codes;
pub mod text_analysis;
pub mod trends_provider;
pub mod trends_service;
pub mod video_service;
pub mod youtube_client;

#[cfg(test)]
pub mod testing;
