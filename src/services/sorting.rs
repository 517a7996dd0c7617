use std::cmp::Ordering;

use crate::models::{SearchResultItem, SortMode};

/// Orders `items` for display without touching the stored sequence
///
/// The sort is stable: items with equal keys keep their relative input
/// order, and missing `views`/`seconds` compare as zero.
pub fn sort_items(items: &[SearchResultItem], mode: SortMode) -> Vec<&SearchResultItem> {
    let mut sorted: Vec<&SearchResultItem> = items.iter().collect();

    let compare: fn(&SearchResultItem, &SearchResultItem) -> Ordering = match mode {
        SortMode::Unsorted => return sorted,
        SortMode::ViewsDesc => |a, b| b.view_count().cmp(&a.view_count()),
        SortMode::ViewsAsc => |a, b| a.view_count().cmp(&b.view_count()),
        SortMode::DurationDesc => |a, b| b.duration_secs().cmp(&a.duration_secs()),
        SortMode::DurationAsc => |a, b| a.duration_secs().cmp(&b.duration_secs()),
    };

    sorted.sort_by(|a, b| compare(a, b));
    sorted
}
