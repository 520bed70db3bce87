//! Height Estimator — predicts the rendered pixel height of one issue card.
//!
//! The estimate is the sum, in order, of:
//! 1. title block (title line + index badge)
//! 2. meta chip row (omitted on continuation cards)
//! 3. summary block, capped at `summary_max_height` (omitted on continuation cards)
//! 4. news container, only when the card carries items
//! 5. card padding, top and bottom
//!
//! Character counting is per `char`, so Hangul and Latin text weigh the same.
//! This is a deliberate approximation; no glyph measurement happens here.

use tracing::warn;

use crate::layout::constants::LayoutConstants;
use crate::models::report::Cluster;

// ────────────────────────────────────────────────────────────────────────────
// Card shape
// ────────────────────────────────────────────────────────────────────────────

/// The item-independent parts of a card that affect its height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardShape<'a> {
    pub summary: &'a str,
    /// Continuation cards repeat only the title; no meta row, no summary.
    pub continuation: bool,
}

impl<'a> CardShape<'a> {
    /// Full card for a cluster (or the first part of a split cluster).
    pub fn full(cluster: &'a Cluster) -> Self {
        Self {
            summary: &cluster.summary,
            continuation: false,
        }
    }

    pub fn continuation() -> Self {
        Self {
            summary: "",
            continuation: true,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Estimation
// ────────────────────────────────────────────────────────────────────────────

/// Estimated height of a card carrying `item_count` news rows.
///
/// Non-decreasing in `item_count` and in summary length (up to the cap).
pub fn estimate_height(shape: &CardShape<'_>, item_count: usize, c: &LayoutConstants) -> u32 {
    base_height(shape, c).saturating_add(item_container_height(item_count, c))
}

/// Card height with zero items: title, meta, summary and card padding.
pub fn base_height(shape: &CardShape<'_>, c: &LayoutConstants) -> u32 {
    let mut height = c.title_line_height + c.index_badge_height;
    if !shape.continuation {
        height += c.meta_row_height;
        height += summary_height(shape.summary, c);
    }
    height + 2 * c.card_padding
}

/// `base + min((ceil(chars / per_line) - 1) × line_height, max - base)`, or 0 for no summary.
pub fn summary_height(summary: &str, c: &LayoutConstants) -> u32 {
    let char_count = summary.chars().count() as u32;
    if char_count == 0 {
        return 0;
    }
    let lines = char_count.div_ceil(c.summary_chars_per_line.max(1));
    let growth = (lines - 1).saturating_mul(c.summary_line_height);
    let cap = c.summary_max_height.saturating_sub(c.summary_base_height);
    c.summary_base_height + growth.min(cap)
}

/// Height of the boxed "related news" list; zero when there is nothing to list.
pub fn item_container_height(item_count: usize, c: &LayoutConstants) -> u32 {
    if item_count == 0 {
        return 0;
    }
    let n = item_count as u32;
    2 * c.container_padding
        + c.container_caption_height
        + n.saturating_mul(c.item_row_height)
        + (n - 1).saturating_mul(c.item_row_spacing)
}

/// Largest item count whose card fits within `budget`. May be zero.
///
/// Inverts `estimate_height`: for `n ≥ 1` the card costs
/// `base + container_fixed − row_spacing + n × per_item_cost`.
pub fn item_capacity(shape: &CardShape<'_>, budget: u32, c: &LayoutConstants) -> usize {
    let fixed = base_height(shape, c) + 2 * c.container_padding + c.container_caption_height;
    let fixed = fixed.saturating_sub(c.item_row_spacing);
    if budget < fixed {
        return 0;
    }
    ((budget - fixed) / c.per_item_cost().max(1)) as usize
}

/// Clamps a card estimate to `room`, the most a single page can give one card.
///
/// Returns `(height, overflowed)`. An overflowing card is still laid out on a page
/// of its own; the renderer lets it spill visually rather than dropping content.
pub fn clamp_to_room(cluster_id: i64, height: u32, room: u32) -> (u32, bool) {
    if height > room {
        warn!(
            "Cluster {} exceeds single page height ({}px > {}px); content may be clipped",
            cluster_id, height, room
        );
        (room, true)
    } else {
        (height, false)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
