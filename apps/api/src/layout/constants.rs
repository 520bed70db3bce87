//! Fixed pixel dimensions of the A4 report page and of an issue card.
//!
//! Values are CSS pixels at 96 dpi (A4 = 794 × 1123px). They mirror the rendered
//! card: 32px page padding, 16px card padding, 16px stack spacing between cards.
//! The table is an approximation of the browser layout; the estimator is lossy on
//! purpose and the allocator only needs it to be conservative.

use serde::{Deserialize, Serialize};

/// Pixel dimensions used by the height estimator, splitter and allocator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConstants {
    pub page_height: u32,
    pub page_width: u32,
    pub page_padding_top: u32,
    pub page_padding_bottom: u32,
    /// Category header bar, shown only on a category's first page.
    pub header_height: u32,
    /// Vertical gap owed after every card on a page.
    pub cluster_spacing: u32,

    pub title_line_height: u32,
    pub index_badge_height: u32,
    /// Score/size chip row. Rendered even when the score is null.
    pub meta_row_height: u32,

    pub summary_base_height: u32,
    pub summary_line_height: u32,
    pub summary_chars_per_line: u32,
    /// Upper bound on the summary block, base height included.
    pub summary_max_height: u32,

    pub container_padding: u32,
    pub container_caption_height: u32,
    pub item_row_height: u32,
    pub item_row_spacing: u32,

    pub card_padding: u32,
}

impl LayoutConstants {
    /// Lowest y coordinate content may reach: page height minus the bottom padding.
    pub fn max_page_height(&self) -> u32 {
        self.page_height.saturating_sub(self.page_padding_bottom)
    }

    /// Height already consumed before the first card on a page.
    pub fn page_start_height(&self, is_first_page: bool) -> u32 {
        if is_first_page {
            self.header_height + self.page_padding_top
        } else {
            self.page_padding_top
        }
    }

    /// Room for one card (spacing included) on a fresh page without a header bar.
    pub fn continuation_room(&self, max_page_height: u32) -> u32 {
        max_page_height.saturating_sub(self.page_padding_top + self.cluster_spacing)
    }

    /// Cost of one more news row: row height plus the gap before it.
    pub fn per_item_cost(&self) -> u32 {
        self.item_row_height + self.item_row_spacing
    }
}

/// Returns the constant table matching the report page stylesheet.
pub fn default_layout_constants() -> LayoutConstants {
    LayoutConstants {
        page_height: 1123,
        page_width: 794,
        page_padding_top: 32,
        page_padding_bottom: 32,
        header_height: 80,
        cluster_spacing: 16,

        title_line_height: 28,
        index_badge_height: 8,
        meta_row_height: 32,

        // one 21px line (14px × 1.5) plus 12px bottom margin
        summary_base_height: 33,
        summary_line_height: 21,
        summary_chars_per_line: 50,
        summary_max_height: 117,

        container_padding: 12,
        container_caption_height: 28,
        item_row_height: 20,
        item_row_spacing: 6,

        card_padding: 16,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants_sanity() {
        let c = default_layout_constants();
        assert_eq!(c.max_page_height(), 1091);
        assert!(c.summary_max_height > c.summary_base_height);
        assert!(c.summary_chars_per_line > 0);
        assert_eq!(c.per_item_cost(), 26);
    }

    #[test]
    fn test_page_start_height_includes_header_only_on_first_page() {
        let c = default_layout_constants();
        assert_eq!(c.page_start_height(true), 112);
        assert_eq!(c.page_start_height(false), 32);
    }

    #[test]
    fn test_continuation_room_never_underflows() {
        let c = default_layout_constants();
        assert_eq!(c.continuation_room(1091), 1043);
        assert_eq!(c.continuation_room(10), 0);
    }
}
