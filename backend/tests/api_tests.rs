use backend::models::{AnalysisSummary, DurationProbe, Report};
use backend::services::analyzer::{AnalyzerSettings, VideoMetricsAnalyzer};
use backend::services::loader::parse_records;
use pretty_assertions::assert_eq;
use rocket::http::Status;
use rocket::local::blocking::Client;
use serde_json::json;

const FIXTURE: &str = include_str!("fixtures/videos.json");

fn client() -> Client {
    let records = parse_records(FIXTURE).expect("fixture parses");
    let analyzer = VideoMetricsAnalyzer::new(records, AnalyzerSettings::default());
    let rocket = backend::build_rocket(analyzer).expect("rocket builds");
    Client::tracked(rocket).expect("valid rocket instance")
}

fn get_report(client: &Client, uri: &str) -> Report {
    let response = client.get(uri).dispatch();
    assert_eq!(response.status(), Status::Ok, "GET {uri}");
    response.into_json::<Report>().expect("report body")
}

#[test]
fn lists_all_analyses() {
    let client = client();
    let response = client.get("/analytics").dispatch();
    assert_eq!(response.status(), Status::Ok);

    let summaries = response
        .into_json::<Vec<AnalysisSummary>>()
        .expect("summary list");
    assert_eq!(summaries.len(), 25);
    assert_eq!(summaries[0].slug, "overview");
    assert_eq!(summaries[24].slug, "data-quality");
}

#[test]
fn every_listed_analysis_runs() {
    let client = client();
    let summaries = client
        .get("/analytics")
        .dispatch()
        .into_json::<Vec<AnalysisSummary>>()
        .expect("summary list");

    for summary in summaries {
        let report = get_report(&client, &format!("/analytics/{}", summary.slug));
        assert_eq!(report.analysis, summary.slug);
        assert_eq!(report.title, summary.title);
    }
}

#[test]
fn overview_row() {
    let report = get_report(&client(), "/analytics/overview");
    assert_eq!(
        report.rows,
        vec![json!({
            "videos": 5,
            "channels": 4,
            "total_views": 2_440_000,
            "total_likes": 81_205,
            "avg_views": 488_000.0,
            "avg_likes": 16_241.0
        })]
    );
}

#[test]
fn top_viewed_with_limit() {
    let report = get_report(&client(), "/analytics/top-viewed?limit=2");
    let ids: Vec<&str> = report
        .rows
        .iter()
        .map(|row| row["video_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["kJQP7kiw5Fk", "JGwWNGJdvx8"]);
    assert_eq!(report.rows[0]["engagement"], "5.00%");
    assert_eq!(report.rows[0]["duration_minutes"], 4.7);
}

#[test]
fn engagement_distribution_order() {
    let report = get_report(&client(), "/analytics/engagement-distribution");
    let buckets: Vec<&str> = report
        .rows
        .iter()
        .map(|row| row["bucket"].as_str().unwrap())
        .collect();
    assert_eq!(
        buckets,
        vec!["5.00%", "3.75%", "3.00%", "No Likes", "No Views"]
    );
}

#[test]
fn title_words_use_extended_stop_words() {
    let report = get_report(&client(), "/analytics/title-words?limit=3");
    assert_eq!(report.rows.len(), 3);
    for row in &report.rows {
        let word = row["word"].as_str().unwrap();
        assert!(!["official", "video", "(official", "video)", "-"].contains(&word));
    }
    assert_eq!(report.rows[0], json!({ "word": "ft.", "occurrences": 2 }));
}

#[test]
fn official_remix_overlap_is_per_channel() {
    let report = get_report(&client(), "/analytics/official-remix-channels");
    assert_eq!(
        report.rows,
        vec![json!({
            "channel_name": "Ed Sheeran",
            "official_videos": 1,
            "remix_videos": 1
        })]
    );
}

#[test]
fn unknown_analysis_is_a_json_404() {
    let client = client();
    let response = client.get("/analytics/most-hated").dispatch();
    assert_eq!(response.status(), Status::NotFound);

    let body = response.into_json::<serde_json::Value>().expect("error body");
    assert_eq!(body["error"], "not_found");
}

#[test]
fn duration_probe() {
    let client = client();
    let probe = client
        .get("/analytics/duration?value=PT5M")
        .dispatch()
        .into_json::<DurationProbe>()
        .expect("probe body");
    assert_eq!(probe.minutes, Some(5.0));
    assert_eq!(probe.category, "Medium (2–5 min)");

    let probe = client
        .get("/analytics/duration?value=garbage")
        .dispatch()
        .into_json::<DurationProbe>()
        .expect("probe body");
    assert_eq!(probe.minutes, None);
    assert_eq!(probe.category, "Unknown");
}
