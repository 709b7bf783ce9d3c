use backend::config::{analyzer_settings, init_logger, load_environment, DATASET_PATH};
use backend::services::analyzer::VideoMetricsAnalyzer;
use backend::services::loader::load_records;
use log::info;

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    load_environment();
    init_logger();

    let records = load_records(&DATASET_PATH)?;
    let analyzer = VideoMetricsAnalyzer::new(records, analyzer_settings());

    backend::build_rocket(analyzer)?
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Rocket failed: {e}"))?;
    info!("Backend shut down.");
    Ok(())
}
