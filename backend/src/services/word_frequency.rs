use anyhow::{anyhow, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::str::FromStr;

pub const TITLE_WORD_LIMIT: usize = 15;

const BASIC_STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "-", "|", "of", "in", "on", "official", "video",
];

/// Basic set plus the bracketed halves of "(Official Video)". The empty
/// string never matches a whitespace split token and is kept only so the list
/// mirrors the CSV variant.
const EXTENDED_STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "-", "|", "of", "in", "on", "official", "video", "", "(official",
    "video)",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum StopWordPolicy {
    Basic,
    #[default]
    Extended,
}

impl StopWordPolicy {
    pub fn stop_words(&self) -> &'static [&'static str] {
        match self {
            StopWordPolicy::Basic => BASIC_STOP_WORDS,
            StopWordPolicy::Extended => EXTENDED_STOP_WORDS,
        }
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words().contains(&token)
    }
}

impl FromStr for StopWordPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(StopWordPolicy::Basic),
            "extended" => Ok(StopWordPolicy::Extended),
            other => Err(anyhow!("Unknown stop word policy '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordCount {
    pub word: String,
    pub occurrences: usize,
}

/// Lower-cased, whitespace separated title tokens minus stop words.
pub fn tokenize_title(title: &str, policy: StopWordPolicy) -> Vec<String> {
    title
        .to_lowercase()
        .split_whitespace()
        .filter(|token| !policy.is_stop_word(token))
        .map(str::to_string)
        .collect()
}

/// Most frequent title words, ties in order of first appearance.
pub fn top_title_words<'a, I>(titles: I, policy: StopWordPolicy, limit: usize) -> Vec<WordCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<WordCount> = Vec::new();

    for title in titles {
        for token in tokenize_title(title, policy) {
            match index.get(&token) {
                Some(&pos) => counts[pos].occurrences += 1,
                None => {
                    index.insert(token.clone(), counts.len());
                    counts.push(WordCount {
                        word: token,
                        occurrences: 1,
                    });
                }
            }
        }
    }

    counts.sort_by(|a, b| b.occurrences.cmp(&a.occurrences));
    counts.truncate(limit);
    counts
}
