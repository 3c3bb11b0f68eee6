//! Heuristics for noisy torrent release names.
//!
//! Everything here is pure and deterministic: year extraction, series
//! detection, display-title cleanup and size formatting.

mod series;
mod title;

pub use series::{extract_series_name, looks_like_series, matching_marker};
pub use title::{clean_display_title, extract_imdb_id, extract_year};

/// Format a byte count with binary (1024-based) units.
///
/// Sizes below 1 KB print as whole bytes; larger sizes use two decimals.
pub fn format_size(bytes: u64) -> String {
    const UNIT: u64 = 1024;
    const PREFIXES: &[u8] = b"KMGTPE";

    if bytes < UNIT {
        return format!("{} B", bytes);
    }

    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }

    format!(
        "{:.2} {}B",
        bytes as f64 / div as f64,
        PREFIXES[exp] as char
    )
}
