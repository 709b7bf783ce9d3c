use crate::services::duration::{parse_duration_minutes, DurationCategory};
use crate::services::engagement::EngagementRate;
use crate::utils::parse_publish_date;
use chrono::{Datelike, NaiveDate};
use rocket::http::{ContentType, Status};
use rocket::request::Request;
use rocket::response::Responder;
use rocket::serde::{Deserialize, Serialize};
use rocket::{response, Response};
use serde::Deserializer;
use std::io::Cursor;

/// One row of the music video dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub video_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub channel_name: String,
    #[serde(default, deserialize_with = "deserialize_publish_date")]
    pub publish_date: Option<NaiveDate>,
    #[serde(default)]
    pub duration: Option<String>, // ISO8601, PT#H#M#S
    #[serde(default)]
    pub like_count: Option<u64>,
    #[serde(default)]
    pub view_count: Option<u64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Accepts `YYYY-MM-DD` or a full timestamp. Anything unreadable counts as a
/// missing date instead of failing the whole dataset.
fn deserialize_publish_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_publish_date))
}

impl VideoRecord {
    pub fn duration_minutes(&self) -> Option<f64> {
        parse_duration_minutes(self.duration.as_deref())
    }

    pub fn duration_category(&self) -> DurationCategory {
        DurationCategory::from_minutes(self.duration_minutes())
    }

    pub fn engagement(&self) -> EngagementRate {
        EngagementRate::compute(self.like_count, self.view_count)
    }

    pub fn publish_year(&self) -> Option<i32> {
        self.publish_date.map(|date| date.year())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub analysis: String,
    pub title: String,
    pub rows: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub slug: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationProbe {
    pub duration: String,
    pub minutes: Option<f64>,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewRow {
    pub videos: usize,
    pub channels: usize,
    pub total_views: u64,
    pub total_likes: u64,
    pub avg_views: Option<f64>,
    pub avg_likes: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoRow {
    pub video_id: String,
    pub title: String,
    pub channel_name: String,
    pub publish_date: Option<NaiveDate>,
    pub views: Option<u64>,
    pub likes: Option<u64>,
    pub duration_minutes: Option<f64>,
    pub engagement: String,
}

impl From<&VideoRecord> for VideoRow {
    fn from(record: &VideoRecord) -> Self {
        VideoRow {
            video_id: record.video_id.clone(),
            title: record.title.clone(),
            channel_name: record.channel_name.clone(),
            publish_date: record.publish_date,
            views: record.view_count,
            likes: record.like_count,
            duration_minutes: record.duration_minutes().map(crate::utils::round2),
            engagement: record.engagement().label(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRow {
    pub group: String,
    pub videos: usize,
    pub avg_views: Option<f64>,
    pub avg_likes: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearTopVideoRow {
    pub year: String,
    #[serde(flatten)]
    pub video: VideoRow,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelRow {
    pub channel_name: String,
    pub videos: usize,
    pub total_views: u64,
    pub avg_views: Option<f64>,
    pub avg_engagement: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationRow {
    pub points: usize,
    pub correlation: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentRow {
    pub segment: String,
    pub videos: usize,
    pub avg_views: Option<f64>,
    pub avg_likes: Option<f64>,
    pub avg_engagement: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelOverlapRow {
    pub channel_name: String,
    pub official_videos: usize,
    pub remix_videos: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataQualityRow {
    pub videos: usize,
    pub missing_publish_date: usize,
    pub missing_views: usize,
    pub missing_likes: usize,
    pub unparseable_duration: usize,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip)]
    pub status: Option<Status>,
}

impl ErrorResponse {
    pub fn not_found(message: String) -> Self {
        ErrorResponse {
            error: "not_found".to_string(),
            message,
            status: Some(Status::NotFound),
        }
    }

    pub fn internal(message: String) -> Self {
        ErrorResponse {
            error: "internal_error".to_string(),
            message,
            status: Some(Status::InternalServerError),
        }
    }
}

impl<'r> Responder<'r, 'static> for ErrorResponse {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status.unwrap_or(Status::BadRequest);
        let json = serde_json::to_string(&self).map_err(|_| Status::InternalServerError)?;
        Response::build()
            .status(status)
            .header(ContentType::JSON)
            .sized_body(json.len(), Cursor::new(json))
            .ok()
    }
}
