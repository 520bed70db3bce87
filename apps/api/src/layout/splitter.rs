//! Cluster Splitter — divides a cluster that does not fit the remaining page budget.
//!
//! # Pipeline
//! 1. `plan_slices` decides the contiguous item ranges (pure arithmetic on estimates).
//! 2. `build_parts` materializes one `ClusterPart` per range with its estimated height.
//! 3. `backfill_total_parts` writes the final part count into every part.
//!
//! Each stage is callable on its own; `split_cluster` runs all three.

use std::ops::Range;

use serde::Serialize;

use crate::layout::constants::LayoutConstants;
use crate::layout::estimator::{clamp_to_room, estimate_height, item_capacity, CardShape};
use crate::models::report::{Cluster, NewsItem};

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// Split bookkeeping. Absent on a part that carries the whole cluster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitInfo {
    /// 1-based.
    pub part_number: usize,
    /// Zero until `backfill_total_parts` runs.
    pub total_parts: usize,
}

/// A contiguous slice of one cluster's items, ready to render as a card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterPart {
    pub cluster_id: i64,
    pub category_id: i64,
    pub representative_title: String,
    pub score: Option<f64>,
    pub size: u32,
    /// Empty on continuation parts.
    pub summary: String,
    pub items: Vec<NewsItem>,
    pub item_start_index: usize,
    /// Exclusive.
    pub item_end_index: usize,
    pub split: Option<SplitInfo>,
    /// Carries title, meta and summary.
    pub is_first_part: bool,
    /// Drops summary and meta and shows an abbreviated header.
    pub is_continuation: bool,
    /// Clamped card estimate used for page accounting.
    pub estimated_height: u32,
    /// The card is taller than the room it was given and will spill visually.
    pub overflow: bool,
}

impl ClusterPart {
    pub fn part_number(&self) -> usize {
        self.split.as_ref().map_or(1, |s| s.part_number)
    }

    pub fn total_parts(&self) -> usize {
        self.split.as_ref().map_or(1, |s| s.total_parts)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Splitting
// ────────────────────────────────────────────────────────────────────────────

/// Splits `cluster` so that its first part fits `available_height` and every
/// continuation part fits `continuation_room` (a fresh page without header).
///
/// Each part carries at least one item once splitting has begun, so the loop
/// always terminates. A cluster that fits whole yields exactly one part.
pub fn split_cluster(
    cluster: &Cluster,
    available_height: u32,
    continuation_room: u32,
    c: &LayoutConstants,
) -> Vec<ClusterPart> {
    let slices = plan_slices(cluster, available_height, continuation_room, c);
    let mut parts = build_parts(cluster, &slices, continuation_room, c);
    backfill_total_parts(&mut parts);
    parts
}

/// Stage 1: item ranges for each part, in order. Always non-empty.
pub fn plan_slices(
    cluster: &Cluster,
    available_height: u32,
    continuation_room: u32,
    c: &LayoutConstants,
) -> Vec<Range<usize>> {
    let total = cluster.items.len();
    let first_capacity = item_capacity(&CardShape::full(cluster), available_height, c).max(1);
    if first_capacity >= total {
        return vec![0..total];
    }

    let continuation_capacity =
        item_capacity(&CardShape::continuation(), continuation_room, c).max(1);

    let mut slices = vec![0..first_capacity];
    let mut start = first_capacity;
    while start < total {
        let end = (start + continuation_capacity).min(total);
        slices.push(start..end);
        start = end;
    }
    slices
}

/// Stage 2: one part per slice. `total_parts` is left at zero for split clusters.
pub fn build_parts(
    cluster: &Cluster,
    slices: &[Range<usize>],
    continuation_room: u32,
    c: &LayoutConstants,
) -> Vec<ClusterPart> {
    let is_split = slices.len() > 1;

    slices
        .iter()
        .enumerate()
        .map(|(i, range)| {
            let is_continuation = i > 0;
            let shape = if is_continuation {
                CardShape::continuation()
            } else {
                CardShape::full(cluster)
            };
            let raw = estimate_height(&shape, range.len(), c);
            let (estimated_height, overflow) = clamp_to_room(cluster.id, raw, continuation_room);

            ClusterPart {
                cluster_id: cluster.id,
                category_id: cluster.category_id,
                representative_title: cluster.representative_title.clone(),
                score: cluster.score,
                size: cluster.size,
                summary: if is_continuation {
                    String::new()
                } else {
                    cluster.summary.clone()
                },
                items: cluster.items[range.clone()].to_vec(),
                item_start_index: range.start,
                item_end_index: range.end,
                split: is_split.then(|| SplitInfo {
                    part_number: i + 1,
                    total_parts: 0,
                }),
                is_first_part: !is_continuation,
                is_continuation,
                estimated_height,
                overflow,
            }
        })
        .collect()
}

/// Stage 3: the part count is only known once every slice exists.
pub fn backfill_total_parts(parts: &mut [ClusterPart]) {
    let total = parts.len();
    for part in parts.iter_mut() {
        if let Some(split) = part.split.as_mut() {
            split.total_parts = total;
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::constants::default_layout_constants;

    fn make_items(n: usize) -> Vec<NewsItem> {
        (0..n)
            .map(|i| NewsItem {
                news_id: format!("news-{i}"),
                title: format!("Headline {i}"),
                origin_url: format!("https://news.example.com/{i}"),
            })
            .collect()
    }

    fn make_cluster(item_count: usize) -> Cluster {
        Cluster {
            id: 42,
            category_id: 3,
            created_at: None,
            representative_title: "VLCC newbuilding prices".to_string(),
            score: Some(9.1),
            size: 17,
            summary: "선가 상승세가 이어지고 있다.".to_string(),
            items: make_items(item_count),
        }
    }

    fn concat_items(parts: &[ClusterPart]) -> Vec<NewsItem> {
        parts.iter().flat_map(|p| p.items.clone()).collect()
    }

    #[test]
    fn test_fits_whole_returns_single_part() {
        let c = default_layout_constants();
        let cluster = make_cluster(3);
        let parts = split_cluster(&cluster, 900, c.continuation_room(1091), &c);
        assert_eq!(parts.len(), 1);
        let part = &parts[0];
        assert!(part.split.is_none());
        assert!(part.is_first_part);
        assert!(!part.is_continuation);
        assert_eq!(part.part_number(), 1);
        assert_eq!(part.total_parts(), 1);
        assert_eq!(part.summary, cluster.summary);
        assert_eq!((part.item_start_index, part.item_end_index), (0, 3));
        assert!(!part.overflow);
    }

    #[test]
    fn test_ten_items_budget_for_four_gives_three_parts() {
        let c = default_layout_constants();
        let cluster = make_cluster(10);
        let shape = CardShape::full(&cluster);
        // exactly enough for 4 items on the current page
        let available = estimate_height(&shape, 4, &c);
        // continuation cards hold 3 items each
        let room = estimate_height(&CardShape::continuation(), 3, &c) + 10;

        let parts = split_cluster(&cluster, available, room, &c);

        assert_eq!(parts.len(), 3);
        assert_eq!((parts[0].item_start_index, parts[0].item_end_index), (0, 4));
        assert_eq!((parts[1].item_start_index, parts[1].item_end_index), (4, 7));
        assert_eq!((parts[2].item_start_index, parts[2].item_end_index), (7, 10));

        assert!(parts[0].is_first_part);
        assert!(!parts[0].is_continuation);
        assert_eq!(parts[0].summary, cluster.summary);
        for cont in &parts[1..] {
            assert!(cont.is_continuation);
            assert!(!cont.is_first_part);
            assert!(cont.summary.is_empty());
        }
        for (i, part) in parts.iter().enumerate() {
            assert_eq!(part.part_number(), i + 1);
            assert_eq!(part.total_parts(), 3);
        }
    }

    #[test]
    fn test_item_conservation_across_budgets() {
        let c = default_layout_constants();
        for item_count in [0, 1, 2, 5, 13, 40, 120] {
            let cluster = make_cluster(item_count);
            for available in [1, 90, 150, 260, 500, 979] {
                for room in [1, 200, 600, 1043] {
                    let parts = split_cluster(&cluster, available, room, &c);
                    assert_eq!(
                        concat_items(&parts),
                        cluster.items,
                        "items lost for n={item_count} available={available} room={room}"
                    );
                    let mut expected_start = 0;
                    for part in &parts {
                        assert_eq!(part.item_start_index, expected_start);
                        expected_start = part.item_end_index;
                    }
                    assert_eq!(expected_start, item_count);
                }
            }
        }
    }

    #[test]
    fn test_total_parts_consistent() {
        let c = default_layout_constants();
        let cluster = make_cluster(57);
        let parts = split_cluster(&cluster, 200, 400, &c);
        assert!(parts.len() > 1);
        assert!(parts.iter().all(|p| p.total_parts() == parts.len()));
    }

    #[test]
    fn test_non_positive_capacity_still_makes_progress() {
        let c = default_layout_constants();
        let cluster = make_cluster(4);
        // neither budget fits a single item: every part carries exactly one
        let parts = split_cluster(&cluster, 1, 1, &c);
        assert_eq!(parts.len(), 4);
        assert!(parts.iter().all(|p| p.items.len() == 1));
        assert!(parts.iter().all(|p| p.overflow));
    }

    #[test]
    fn test_empty_cluster_is_single_part_without_items() {
        let c = default_layout_constants();
        let cluster = make_cluster(0);
        let parts = split_cluster(&cluster, 10, 1043, &c);
        assert_eq!(parts.len(), 1);
        assert!(parts[0].items.is_empty());
        assert!(parts[0].split.is_none());
    }

    #[test]
    fn test_backfill_leaves_whole_parts_untouched() {
        let c = default_layout_constants();
        let cluster = make_cluster(2);
        let slices = plan_slices(&cluster, 900, 1043, &c);
        let mut parts = build_parts(&cluster, &slices, 1043, &c);
        backfill_total_parts(&mut parts);
        assert!(parts[0].split.is_none());
    }

    #[test]
    fn test_build_parts_before_backfill_has_zero_total() {
        let c = default_layout_constants();
        let cluster = make_cluster(6);
        let parts = build_parts(&cluster, &[0..2, 2..6], 1043, &c);
        assert!(parts
            .iter()
            .all(|p| p.split.as_ref().map(|s| s.total_parts) == Some(0)));
    }
}
