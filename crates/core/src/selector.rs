//! Best-variant selection.

use crate::source::Variant;

/// Priority of a resolution label. Labels are matched exactly, ignoring
/// case and surrounding whitespace.
pub fn quality_rank(label: &str) -> u64 {
    match label.trim().to_ascii_lowercase().as_str() {
        "2160p" => 3,
        "1080p" => 2,
        "720p" => 1,
        _ => 0,
    }
}

/// Score of a variant: quality first, seeds as the tie-breaker.
pub fn variant_score(variant: &Variant) -> u64 {
    quality_rank(&variant.quality_label) * 1000 + u64::from(variant.seed_count)
}

/// Pick the variant with the highest score. The first occurrence wins ties.
pub fn select_best(variants: &[Variant]) -> Option<&Variant> {
    let mut best: Option<(&Variant, u64)> = None;
    for variant in variants {
        let score = variant_score(variant);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((variant, score)),
        }
    }
    best.map(|(variant, _)| variant)
}
