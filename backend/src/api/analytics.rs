use crate::models::{AnalysisSummary, DurationProbe, ErrorResponse, Report};
use crate::services::analyzer::Analysis;
use crate::services::duration::{parse_duration_minutes, DurationCategory};
use crate::AppState;
use log::{error, info};
use rocket::serde::json::Json;
use rocket::{get, State};

#[get("/")]
pub fn list_analyses() -> Json<Vec<AnalysisSummary>> {
    Json(Analysis::ALL.iter().map(Analysis::summary).collect())
}

#[get("/duration?<value>")]
pub fn probe_duration(value: &str) -> Json<DurationProbe> {
    let minutes = parse_duration_minutes(Some(value));
    Json(DurationProbe {
        duration: value.to_string(),
        minutes,
        category: DurationCategory::from_minutes(minutes).label().to_string(),
    })
}

#[get("/<slug>?<limit>")]
pub fn run_analysis(
    slug: &str,
    limit: Option<usize>,
    state: &State<AppState>,
) -> Result<Json<Report>, ErrorResponse> {
    let analysis = Analysis::from_slug(slug)
        .ok_or_else(|| ErrorResponse::not_found(format!("Unknown analysis '{slug}'")))?;

    match state.analyzer.run(analysis, limit) {
        Ok(report) => {
            info!(
                "Analysis {} returned {} rows.",
                report.analysis,
                report.rows.len()
            );
            Ok(Json(report))
        }
        Err(e) => {
            error!("Analysis {slug} failed: {e:?}");
            Err(ErrorResponse::internal(format!("Analysis '{slug}' failed")))
        }
    }
}
