use crate::services::analyzer::{AnalyzerSettings, DEFAULT_TOP_N};
use crate::services::classification::{EmotionRules, DEFAULT_VEVO_MARKER};
use crate::services::word_frequency::StopWordPolicy;
use anyhow::Result;
use env_logger::Builder;
use lazy_static::lazy_static;
use log::{info, warn, LevelFilter};
use rocket::http::Method;
use rocket_cors::{AllowedHeaders, AllowedOrigins, CorsOptions};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

lazy_static! {
    pub static ref DATASET_PATH: PathBuf = PathBuf::from(
        env::var("DATASET_PATH").unwrap_or_else(|_| "data/videos.json".to_string())
    );
    pub static ref FRONTEND_ORIGIN: String =
        env::var("FRONTEND_ORIGIN").unwrap_or_else(|_| "http://localhost:8080".to_string());
    pub static ref STOP_WORD_POLICY: StopWordPolicy =
        parse_or_default("STOP_WORD_POLICY", StopWordPolicy::default());
    pub static ref EMOTION_KEYWORDS: EmotionRules =
        parse_or_default("EMOTION_KEYWORDS", EmotionRules::default());
    pub static ref VEVO_MARKER: String =
        env::var("VEVO_MARKER").unwrap_or_else(|_| DEFAULT_VEVO_MARKER.to_string());
    pub static ref TOP_N: usize = parse_or_default("DEFAULT_TOP_N", DEFAULT_TOP_N);
}

/// Read an env variable, falling back to `default` when unset or invalid.
fn parse_or_default<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => match raw.parse::<T>() {
            Ok(value) => value,
            Err(e) => {
                warn!("Ignoring invalid {key}='{raw}': {e}");
                default
            }
        },
        Err(_) => default,
    }
}

pub fn init_logger() {
    Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();
    info!("Starting music video analytics backend...");
}

pub fn load_environment() {
    dotenv::dotenv().ok();
}

pub fn analyzer_settings() -> AnalyzerSettings {
    let settings = AnalyzerSettings {
        stop_words: *STOP_WORD_POLICY,
        emotions: EMOTION_KEYWORDS.clone(),
        vevo_marker: VEVO_MARKER.clone(),
        default_top_n: *TOP_N,
    };
    info!(
        "Analyzer settings: stop words {:?}, VEVO marker '{}', top {}",
        settings.stop_words, settings.vevo_marker, settings.default_top_n
    );
    settings
}

pub fn create_cors() -> Result<rocket_cors::Cors> {
    let cors = CorsOptions::default()
        .allowed_origins(AllowedOrigins::some_exact(&[FRONTEND_ORIGIN.as_str()]))
        .allowed_methods(
            vec![Method::Get, Method::Options]
                .into_iter()
                .map(From::from)
                .collect(),
        )
        .allowed_headers(AllowedHeaders::some(&["Accept", "Content-Type"]))
        .allow_credentials(false)
        .to_cors()
        .map_err(|e| anyhow::anyhow!("Failed to create CORS options: {}", e))?;

    Ok(cors)
}
