//! TV/series release detection.

use once_cell::sync::Lazy;
use regex_lite::Regex;

/// Series markers, evaluated top to bottom.
///
/// Each row is (name, detection pattern, strip pattern). Detection patterns
/// are deliberately loose; strip patterns require a word boundary so that a
/// show name is not cut in the middle of a word.
const SERIES_MARKERS: &[(&str, &str, &str)] = &[
    ("episode_code", r"s\d{1,2}e\d{1,2}", r"\bs\d{1,2}e\d{1,2}"),
    ("season_code", r"s\d{1,2}", r"\bs\d{1,2}\b"),
    ("season_word", r"season\s*\d", r"\bseason\s*\d"),
    ("episode_word", r"episode\s*\d", r"\bepisode\s*\d"),
    ("cross_code", r"\d{1,2}x\d{1,2}", r"\b\d{1,2}x\d{1,2}\b"),
    ("complete_series", r"complete\s*series", r"\bcomplete\s*series"),
    ("complete_season", r"complete\s*season", r"\bcomplete\s*season"),
    ("all_seasons", r"all\s*seasons", r"\ball\s*seasons"),
];

struct SeriesMarker {
    name: &'static str,
    detect: Regex,
    strip: Regex,
}

static MARKERS: Lazy<Vec<SeriesMarker>> = Lazy::new(|| {
    SERIES_MARKERS
        .iter()
        .map(|&(name, detect, strip)| SeriesMarker {
            name,
            detect: Regex::new(&format!("(?i){}", detect)).unwrap(),
            strip: Regex::new(&format!("(?i){}", strip)).unwrap(),
        })
        .collect()
});

/// Whether a torrent name looks like a TV/series release.
pub fn looks_like_series(name: &str) -> bool {
    matching_marker(name).is_some()
}

/// Name of the first series marker that matches, for diagnostics.
pub fn matching_marker(name: &str) -> Option<&'static str> {
    MARKERS
        .iter()
        .find(|m| m.detect.is_match(name))
        .map(|m| m.name)
}

/// Reduce a series release title to the show name.
///
/// Cuts at the earliest series marker and trims whitespace and the `.`, `_`
/// and `-` separators of release names. If the title starts with a marker the
/// trimmed input is returned unchanged.
pub fn extract_series_name(title: &str) -> String {
    let cut = MARKERS
        .iter()
        .filter_map(|m| m.strip.find(title).map(|found| found.start()))
        .min();

    let name = match cut {
        Some(idx) => trim_separators(&title[..idx]),
        None => title.trim(),
    };

    if name.is_empty() {
        title.trim().to_string()
    } else {
        name.to_string()
    }
}

fn trim_separators(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || matches!(c, '.' | '_' | '-'))
}
