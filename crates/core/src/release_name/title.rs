//! Title and year extraction from raw torrent names.

use once_cell::sync::Lazy;
use regex_lite::Regex;

/// Release tags stripped from display titles, matched case-insensitively,
/// longest-first where one tag contains another.
const RELEASE_TAGS: &[&str] = &[
    // Resolution
    "2160p", "1080p", "720p", "480p", "4K",
    // Source
    "BluRay", "BRRip", "WEB-DL", "WEBRip", "HDTV", "DVDRip", "BDRip",
    // Video codec
    "x264", "x265", "HEVC", "H.264", "H.265", "H264", "H265", "AVC",
    // Audio
    "AAC", "DTS", "AC3", "FLAC", "TrueHD", "Atmos", "5.1", "7.1", "10bit",
    // Containers
    ".mkv", ".mp4", ".avi",
];

/// Release group names, matched with exact case so that ordinary words
/// ("Sparks", "Evo") survive.
const RELEASE_GROUPS: &[&str] = &[
    "YTS.MX", "YIFY", "YTS", "RARBG", "FGT", "EVO", "SPARKS",
];

/// Characters allowed right before a year token.
const YEAR_BOUNDARIES: &[u8] = b" ([._-";

static IMDB_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"tt\d{7,}").unwrap());

/// Derive a display title from a raw torrent name.
///
/// Removes release tags that stand as whole words, turns `.` and `_` into
/// spaces, strips trailing `[...]` blocks, collapses whitespace and trims.
/// Applying it to its own output is a no-op.
pub fn clean_display_title(raw: &str) -> String {
    let mut result = remove_release_tags(raw);

    result = result.replace(['.', '_'], " ");

    // Strip from the last '[' backward; a bracket at position 0 is kept.
    while let Some(idx) = result.rfind('[') {
        if idx == 0 {
            break;
        }
        result.truncate(idx);
    }

    result.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove every release tag, repeating until nothing changes.
fn remove_release_tags(raw: &str) -> String {
    let mut result = raw.to_string();
    loop {
        let before = result.len();
        for tag in RELEASE_TAGS {
            result = remove_tag(&result, tag, true);
        }
        for group in RELEASE_GROUPS {
            result = remove_tag(&result, group, false);
        }
        if result.len() == before {
            return result;
        }
    }
}

/// Remove occurrences of `tag` that are not glued to a letter or digit.
///
/// An edge of the tag that is itself punctuation (".mkv") needs no boundary
/// on that side.
fn remove_tag(haystack: &str, tag: &str, ignore_case: bool) -> String {
    let (search, needle) = if ignore_case {
        (haystack.to_ascii_lowercase(), tag.to_ascii_lowercase())
    } else {
        (haystack.to_string(), tag.to_string())
    };
    let bytes = haystack.as_bytes();
    let tag_bytes = tag.as_bytes();
    let check_left = tag_bytes.first().is_some_and(u8::is_ascii_alphanumeric);
    let check_right = tag_bytes.last().is_some_and(u8::is_ascii_alphanumeric);

    let mut out = String::with_capacity(haystack.len());
    let mut last = 0;
    // ASCII lowercasing keeps byte offsets aligned with `haystack`.
    for (idx, _) in search.match_indices(&needle) {
        let end = idx + needle.len();
        let left_ok = !check_left || idx == 0 || !bytes[idx - 1].is_ascii_alphanumeric();
        let right_ok =
            !check_right || bytes.get(end).is_none_or(|b| !b.is_ascii_alphanumeric());
        if left_ok && right_ok {
            out.push_str(&haystack[last..idx]);
            last = end;
        }
    }
    out.push_str(&haystack[last..]);
    out
}

/// Extract a release year from a torrent name.
///
/// Looks for the first 4-digit token starting with "19" or "20" that sits at
/// the start of the string or right after a boundary character, and is not
/// followed by another digit. Returns 0 when there is none.
pub fn extract_year(name: &str) -> u32 {
    let bytes = name.as_bytes();
    if bytes.len() < 4 {
        return 0;
    }

    for start in 0..=bytes.len() - 4 {
        if start > 0 && !YEAR_BOUNDARIES.contains(&bytes[start - 1]) {
            continue;
        }

        let token = &bytes[start..start + 4];
        if !(token.starts_with(b"19") || token.starts_with(b"20")) {
            continue;
        }
        if !token.iter().all(u8::is_ascii_digit) {
            continue;
        }
        if bytes.get(start + 4).is_some_and(u8::is_ascii_digit) {
            continue;
        }

        let year = token
            .iter()
            .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'));
        if (1900..=2100).contains(&year) {
            return year;
        }
    }

    0
}

/// Extract an IMDb id (`tt` followed by at least 7 digits), if present.
pub fn extract_imdb_id(name: &str) -> Option<String> {
    IMDB_ID_RE.find(name).map(|m| m.as_str().to_string())
}
