//! Types for metadata enrichment.

use serde::{Deserialize, Serialize};

/// Media type filter for title lookups.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Series,
    Episode,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Series => "series",
            MediaType::Episode => "episode",
        }
    }

    /// Parse the service's `Type` field. Unknown values yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" => Some(MediaType::Movie),
            "series" => Some(MediaType::Series),
            "episode" => Some(MediaType::Episode),
            _ => None,
        }
    }
}

/// A title lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleQuery {
    pub title: String,
    /// Release year; `None` searches all years.
    pub year: Option<u32>,
    /// Restrict to one media type; `None` means any.
    pub media_type: Option<MediaType>,
}

impl TitleQuery {
    /// Untyped lookup. A year of 0 means unknown.
    pub fn new(title: impl Into<String>, year: u32) -> Self {
        Self {
            title: title.into(),
            year: (year > 0).then_some(year),
            media_type: None,
        }
    }

    pub fn with_type(mut self, media_type: MediaType) -> Self {
        self.media_type = Some(media_type);
        self
    }
}

/// Metadata attached to an entry after a successful lookup.
///
/// Values the service reports as `"N/A"` are stored as `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EnrichmentResult {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actors: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,
    /// Rating string, e.g. "8.8".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    /// Vote count string, e.g. "2,345,678".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub votes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_seasons: Option<String>,
}

impl EnrichmentResult {
    /// Vote count as an integer. Zero when missing or unparseable.
    pub fn vote_count(&self) -> u64 {
        self.votes.as_deref().map(parse_vote_count).unwrap_or(0)
    }

    /// Cast members, split from the comma-separated actors field.
    pub fn cast(&self) -> Vec<String> {
        self.actors
            .as_deref()
            .map(|a| {
                a.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Parse a vote count such as "1,234,567". `"N/A"`, empty and malformed
/// values are 0.
pub fn parse_vote_count(votes: &str) -> u64 {
    let digits: String = votes.trim().chars().filter(|c| *c != ',').collect();
    digits.parse().unwrap_or(0)
}

/// Treat the service's `"N/A"` placeholder and empty strings as missing.
pub(crate) fn non_placeholder(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("N/A") {
        None
    } else {
        Some(value)
    }
}
