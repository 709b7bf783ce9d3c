use crate::utils::contains_ignore_case;
use anyhow::{anyhow, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_VEVO_MARKER: &str = "vevo";
pub const OTHER_EMOTION: &str = "Other";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChannelSegment {
    Vevo,
    NonVevo,
}

impl ChannelSegment {
    pub fn classify(channel_name: &str, marker: &str) -> Self {
        if !marker.is_empty() && contains_ignore_case(channel_name, marker) {
            ChannelSegment::Vevo
        } else {
            ChannelSegment::NonVevo
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChannelSegment::Vevo => "VEVO",
            ChannelSegment::NonVevo => "Non-VEVO",
        }
    }
}

impl fmt::Display for ChannelSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmotionRule {
    pub keyword: String,
    pub emotion: String,
}

/// Keyword → emotion rules checked against a description in priority order.
/// The first matching keyword wins; no match means [`OTHER_EMOTION`].
#[derive(Debug, Clone, PartialEq)]
pub struct EmotionRules {
    rules: Vec<EmotionRule>,
}

impl Default for EmotionRules {
    fn default() -> Self {
        Self::new(vec![
            ("love", "Romantic"),
            ("sad", "Sad"),
            ("party", "Party"),
            ("motiv", "Motivational"),
        ])
    }
}

impl EmotionRules {
    pub fn new(rules: Vec<(&str, &str)>) -> Self {
        EmotionRules {
            rules: rules
                .into_iter()
                .map(|(keyword, emotion)| EmotionRule {
                    keyword: keyword.to_lowercase(),
                    emotion: emotion.to_string(),
                })
                .collect(),
        }
    }

    pub fn classify(&self, description: Option<&str>) -> &str {
        let Some(description) = description else {
            return OTHER_EMOTION;
        };
        let description = description.to_lowercase();

        self.rules
            .iter()
            .find(|rule| description.contains(&rule.keyword))
            .map(|rule| rule.emotion.as_str())
            .unwrap_or(OTHER_EMOTION)
    }

    /// Emotions in priority order followed by the fallback, deduplicated.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for rule in &self.rules {
            if !labels.contains(&rule.emotion.as_str()) {
                labels.push(rule.emotion.as_str());
            }
        }
        if !labels.contains(&OTHER_EMOTION) {
            labels.push(OTHER_EMOTION);
        }
        labels
    }
}

/// Parses `keyword=Emotion,keyword=Emotion`, order is priority.
impl FromStr for EmotionRules {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut rules = Vec::new();
        for pair in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (keyword, emotion) = pair
                .split_once('=')
                .ok_or_else(|| anyhow!("Emotion rule '{pair}' is not keyword=Emotion"))?;
            let (keyword, emotion) = (keyword.trim(), emotion.trim());
            if keyword.is_empty() || emotion.is_empty() {
                return Err(anyhow!("Emotion rule '{pair}' has an empty side"));
            }
            rules.push((keyword, emotion));
        }

        if rules.is_empty() {
            return Err(anyhow!("No emotion rules given"));
        }

        Ok(EmotionRules::new(rules))
    }
}

/// Title keyword filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleKeyword {
    Official,
    Live,
    Remix,
    Mashup,
    Acoustic,
    Trailer,
    Teaser,
}

impl TitleKeyword {
    pub fn term(&self) -> &'static str {
        match self {
            TitleKeyword::Official => "official",
            TitleKeyword::Live => "live",
            TitleKeyword::Remix => "remix",
            TitleKeyword::Mashup => "mashup",
            TitleKeyword::Acoustic => "acoustic",
            TitleKeyword::Trailer => "trailer",
            TitleKeyword::Teaser => "teaser",
        }
    }

    pub fn matches(&self, title: &str) -> bool {
        contains_ignore_case(title, self.term())
    }
}
