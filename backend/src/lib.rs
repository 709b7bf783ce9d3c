#[macro_use]
extern crate rocket;

pub mod api;
pub mod config;
pub mod models;
pub mod services;
pub mod utils;

use crate::services::analyzer::VideoMetricsAnalyzer;
use anyhow::Result;
use rocket::{Build, Rocket};
use std::sync::Arc;

pub struct AppState {
    pub analyzer: Arc<VideoMetricsAnalyzer>,
}

pub fn build_rocket(analyzer: VideoMetricsAnalyzer) -> Result<Rocket<Build>> {
    let cors = config::create_cors()?;

    Ok(rocket::build()
        .manage(AppState {
            analyzer: Arc::new(analyzer),
        })
        .attach(cors)
        .mount(
            "/analytics",
            routes![
                api::list_analyses,
                api::probe_duration,
                api::run_analysis
            ],
        ))
}
