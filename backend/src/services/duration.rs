use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

lazy_static! {
    static ref ISO8601_DURATION: Regex =
        Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+(?:\.\d+)?)S)?$")
            .expect("duration pattern is valid");
}

/// Parse an ISO8601 duration (PT1H2M3S) into total minutes.
///
/// Every component is optional, but at least one has to be present. Anything
/// that doesn't match the pattern yields `None` so the record simply drops out
/// of duration based aggregates.
pub fn parse_duration_minutes(duration_str: Option<&str>) -> Option<f64> {
    let duration_str = duration_str?.trim();
    let captures = ISO8601_DURATION.captures(duration_str)?;

    if captures.iter().skip(1).all(|group| group.is_none()) {
        return None;
    }

    let component = |index: usize| -> Option<f64> {
        match captures.get(index) {
            Some(m) => m.as_str().parse::<f64>().ok(),
            None => Some(0.0),
        }
    };

    let hours = component(1)?;
    let minutes = component(2)?;
    let seconds = component(3)?;

    Some(hours * 60.0 + minutes + seconds / 60.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DurationCategory {
    Short,
    Medium,
    Long,
    Unknown,
}

impl DurationCategory {
    /// Display order used by the category breakdown.
    pub const ALL: [DurationCategory; 4] = [
        DurationCategory::Short,
        DurationCategory::Medium,
        DurationCategory::Long,
        DurationCategory::Unknown,
    ];

    /// Medium is inclusive on both ends, like `BETWEEN 2 AND 5`.
    pub fn from_minutes(minutes: Option<f64>) -> Self {
        match minutes {
            Some(m) if m < 2.0 => DurationCategory::Short,
            Some(m) if m <= 5.0 => DurationCategory::Medium,
            Some(m) if m > 5.0 => DurationCategory::Long,
            // None, or NaN
            _ => DurationCategory::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DurationCategory::Short => "Short (<2 min)",
            DurationCategory::Medium => "Medium (2–5 min)",
            DurationCategory::Long => "Long (>5 min)",
            DurationCategory::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for DurationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minutes_and_seconds() {
        assert_eq!(parse_duration_minutes(Some("PT3M30S")), Some(3.5));
        assert_eq!(parse_duration_minutes(Some("PT1H")), Some(60.0));
        assert_eq!(parse_duration_minutes(Some("PT1H2M30S")), Some(62.5));
        assert_eq!(parse_duration_minutes(Some("PT45S")), Some(0.75));
        assert_eq!(parse_duration_minutes(Some(" PT4M ")), Some(4.0));
    }

    #[test]
    fn accepts_fractional_seconds() {
        assert_eq!(parse_duration_minutes(Some("PT1M30.0S")), Some(1.5));
    }

    #[test]
    fn rejects_malformed_durations() {
        assert_eq!(parse_duration_minutes(Some("garbage")), None);
        assert_eq!(parse_duration_minutes(Some("PT")), None);
        assert_eq!(parse_duration_minutes(Some("PT3S2M")), None);
        assert_eq!(parse_duration_minutes(Some("P1D")), None);
        assert_eq!(parse_duration_minutes(Some("")), None);
        assert_eq!(parse_duration_minutes(None), None);
    }

    #[test]
    fn categorizes_on_inclusive_medium_boundaries() {
        assert_eq!(
            DurationCategory::from_minutes(Some(1.9)),
            DurationCategory::Short
        );
        assert_eq!(
            DurationCategory::from_minutes(Some(2.0)),
            DurationCategory::Medium
        );
        assert_eq!(
            DurationCategory::from_minutes(Some(5.0)),
            DurationCategory::Medium
        );
        assert_eq!(
            DurationCategory::from_minutes(Some(5.01)),
            DurationCategory::Long
        );
        assert_eq!(
            DurationCategory::from_minutes(None),
            DurationCategory::Unknown
        );
    }

    #[test]
    fn labels_match_report_buckets() {
        assert_eq!(DurationCategory::Short.to_string(), "Short (<2 min)");
        assert_eq!(DurationCategory::Medium.label(), "Medium (2–5 min)");
        assert_eq!(DurationCategory::Long.label(), "Long (>5 min)");
    }
}
