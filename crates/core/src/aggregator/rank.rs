//! Popularity ranking.

use std::cmp::Reverse;

use crate::source::Entry;

/// Sort entries by descending vote count, in place.
///
/// Entries without metadata count as zero votes. The sort is stable, so
/// equal counts keep their source order.
pub fn rank_by_votes(entries: &mut [Entry]) {
    entries.sort_by_key(|e| Reverse(e.vote_count()));
}
