//! Report Paginator — lays out every category in fixed order with global page numbers.
//!
//! Page 1 is the cover and page 2 the table of contents, so category content
//! starts at page 3. Each category contributes at least one page.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::layout::allocator::{allocate_category, PageLayout};
use crate::layout::constants::LayoutConstants;
use crate::models::report::{Category, Cluster};

pub const COVER_PAGE_NUMBER: usize = 1;
pub const TOC_PAGE_NUMBER: usize = 2;
pub const FIRST_CATEGORY_PAGE_NUMBER: usize = 3;

/// One line of the table of contents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TocEntry {
    pub category: Category,
    pub label: String,
    /// First physical page occupied by the category.
    pub page_number: usize,
}

/// Page-by-page layout of the category section plus its table of contents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportLayout {
    pub pages: Vec<PageLayout>,
    pub toc_entries: Vec<TocEntry>,
}

impl ReportLayout {
    /// Cover and table of contents included.
    pub fn total_pages(&self) -> usize {
        FIRST_CATEGORY_PAGE_NUMBER - 1 + self.pages.len()
    }
}

/// Paginates `clusters_by_category` in `category_order`.
///
/// A category missing from the map is laid out as empty. The result depends
/// only on the arguments; calling twice with the same input gives equal output.
pub fn paginate(
    clusters_by_category: &BTreeMap<Category, Vec<Cluster>>,
    category_order: &[Category],
    c: &LayoutConstants,
) -> ReportLayout {
    let max_page_height = c.max_page_height();
    let mut next_page = FIRST_CATEGORY_PAGE_NUMBER;
    let mut pages = Vec::new();
    let mut toc_entries = Vec::with_capacity(category_order.len());

    for &category in category_order {
        let clusters = clusters_by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let category_pages = allocate_category(category, clusters, next_page, max_page_height, c);

        toc_entries.push(TocEntry {
            category,
            label: category.label().to_string(),
            page_number: next_page,
        });
        next_page += category_pages.len();
        pages.extend(category_pages);
    }

    let overflowing = pages.iter().filter(|p| p.has_overflow()).count();
    if overflowing > 0 {
        warn!("{} page(s) hold content taller than the page", overflowing);
    }
    debug!(
        "Paginated {} categories into {} content page(s)",
        category_order.len(),
        pages.len()
    );

    ReportLayout { pages, toc_entries }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
