use crate::models::VideoRecord;
use crate::utils::parse_publish_date;
use anyhow::{anyhow, bail, Context, Result};
use log::{debug, info, warn};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Load the dataset from a JSON file.
///
/// Accepts either an array of flat records or a YouTube Data API
/// `videos.list` response with an `items` array.
pub fn load_records(path: &Path) -> Result<Vec<VideoRecord>> {
    info!("Loading video dataset from {}", path.display());

    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset file {}", path.display()))?;
    let records = parse_records(&raw)
        .with_context(|| format!("Failed to parse dataset file {}", path.display()))?;

    info!("Loaded {} video records.", records.len());
    Ok(records)
}

pub fn parse_records(raw: &str) -> Result<Vec<VideoRecord>> {
    let document: Value = serde_json::from_str(raw).context("Dataset is not valid JSON")?;

    let records = if document.is_array() {
        serde_json::from_value::<Vec<VideoRecord>>(document)
            .context("Dataset array does not match the video record layout")?
    } else if let Some(items) = document.get("items") {
        let items = items
            .as_array()
            .ok_or_else(|| anyhow!("'items' is not an array"))?;
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                record_from_api_item(item).with_context(|| format!("Invalid item at index {i}"))
            })
            .collect::<Result<Vec<_>>>()?
    } else {
        bail!("Dataset must be an array of records or an object with an 'items' array");
    };

    ensure_unique_ids(&records)?;
    report_unparseable_durations(&records);

    Ok(records)
}

/// Map a YouTube Data API video resource (snippet, statistics, contentDetails).
/// Counts come as strings there.
pub fn record_from_api_item(item: &Value) -> Result<VideoRecord> {
    let video_id = item["id"]
        .as_str()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| anyhow!("Video resource without an id"))?
        .to_string();

    let snippet = &item["snippet"];
    let statistics = &item["statistics"];

    Ok(VideoRecord {
        title: snippet["title"].as_str().unwrap_or("").to_string(),
        channel_name: snippet["channelTitle"].as_str().unwrap_or("").to_string(),
        publish_date: snippet["publishedAt"]
            .as_str()
            .and_then(parse_publish_date),
        duration: item["contentDetails"]["duration"]
            .as_str()
            .map(String::from),
        like_count: parse_count(&statistics["likeCount"], "likeCount", &video_id)?,
        view_count: parse_count(&statistics["viewCount"], "viewCount", &video_id)?,
        category: snippet["categoryId"].as_str().map(String::from),
        description: snippet["description"].as_str().map(String::from),
        video_id,
    })
}

fn parse_count(value: &Value, field: &str, video_id: &str) -> Result<Option<u64>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => s
            .parse::<u64>()
            .map(Some)
            .with_context(|| format!("{field} '{s}' of video {video_id} is not a non-negative integer")),
        Value::Number(n) => n
            .as_u64()
            .map(Some)
            .ok_or_else(|| anyhow!("{field} {n} of video {video_id} is not a non-negative integer")),
        other => Err(anyhow!("{field} of video {video_id} has unexpected type: {other}")),
    }
}

fn ensure_unique_ids(records: &[VideoRecord]) -> Result<()> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.video_id.as_str()) {
            bail!("Duplicate video_id '{}' in dataset", record.video_id);
        }
    }
    Ok(())
}

fn report_unparseable_durations(records: &[VideoRecord]) {
    let mut unparseable = 0;
    for record in records {
        if record.duration_minutes().is_none() {
            debug!(
                "Video {} has no usable duration ({:?})",
                record.video_id, record.duration
            );
            unparseable += 1;
        }
    }
    if unparseable > 0 {
        warn!("{unparseable} videos have a missing or malformed duration and are left out of duration statistics.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_flat_record_array() {
        let raw = r#"[
            {"video_id": "a", "title": "First", "channel_name": "BandVEVO",
             "publish_date": "2018-07-01", "duration": "PT4M2S",
             "like_count": 10, "view_count": 1000},
            {"video_id": "b", "title": "Second", "channel_name": "Band",
             "publish_date": null, "duration": "oops"}
        ]"#;

        let records = parse_records(raw).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].publish_date, NaiveDate::from_ymd_opt(2018, 7, 1));
        assert_eq!(records[1].view_count, None);
        assert_eq!(records[1].duration.as_deref(), Some("oops"));
    }

    #[test]
    fn flat_and_api_shapes_agree_on_timestamp_dates() {
        let flat = parse_records(r#"[{"video_id": "a", "publish_date": "2019-12-31T23:10:00Z"}]"#)
            .unwrap();
        let api = parse_records(
            r#"{"items": [{"id": "a", "snippet": {"publishedAt": "2019-12-31T23:10:00Z"}}]}"#,
        )
        .unwrap();

        assert_eq!(flat[0].publish_date, NaiveDate::from_ymd_opt(2019, 12, 31));
        assert_eq!(flat[0].publish_date, api[0].publish_date);
    }

    #[test]
    fn maps_youtube_api_items() {
        let raw = r#"{"kind": "youtube#videoListResponse", "items": [
            {"id": "dQw4w9WgXcQ",
             "snippet": {"title": "Never Gonna Give You Up", "channelTitle": "RickAstleyVEVO",
                         "publishedAt": "2009-10-25T06:57:33Z", "description": "love song",
                         "categoryId": "10"},
             "statistics": {"viewCount": "1500000000", "likeCount": "17000000"},
             "contentDetails": {"duration": "PT3M33S"}}
        ]}"#;

        let records = parse_records(raw).unwrap();
        let record = &records[0];
        assert_eq!(record.video_id, "dQw4w9WgXcQ");
        assert_eq!(record.channel_name, "RickAstleyVEVO");
        assert_eq!(record.publish_date, NaiveDate::from_ymd_opt(2009, 10, 25));
        assert_eq!(record.view_count, Some(1_500_000_000));
        assert_eq!(record.like_count, Some(17_000_000));
        assert_eq!(record.category.as_deref(), Some("10"));
    }

    #[test]
    fn api_items_without_statistics_have_null_counts() {
        let raw = r#"{"items": [{"id": "x", "snippet": {"title": "t"}}]}"#;
        let records = parse_records(raw).unwrap();
        assert_eq!(records[0].view_count, None);
        assert_eq!(records[0].like_count, None);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let raw = r#"[{"video_id": "a"}, {"video_id": "a"}]"#;
        let err = parse_records(raw).unwrap_err();
        assert!(err.to_string().contains("Duplicate video_id 'a'"));
    }

    #[test]
    fn rejects_negative_api_counts() {
        let raw = r#"{"items": [{"id": "x", "statistics": {"viewCount": "-3"}}]}"#;
        assert!(parse_records(raw).is_err());
    }

    #[test]
    fn rejects_unexpected_shapes() {
        assert!(parse_records("{\"videos\": []}").is_err());
        assert!(parse_records("not json").is_err());
    }

    #[test]
    fn empty_array_is_an_empty_dataset() {
        assert!(parse_records("[]").unwrap().is_empty());
    }
}
