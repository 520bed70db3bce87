//! Page Allocator — greedy packing of one category's cards onto A4 pages.
//!
//! Clusters arrive score-sorted. Each one is split against whatever budget is
//! left on the current page; parts that do not fit open a new page (no header
//! bar, top padding only). A category with no clusters still yields one page.

use serde::Serialize;
use tracing::{debug, warn};

use crate::layout::constants::LayoutConstants;
use crate::layout::estimator::{estimate_height, CardShape};
use crate::layout::splitter::{split_cluster, ClusterPart};
use crate::models::report::{Category, Cluster};

/// The computed content assignment for one physical output page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageLayout {
    /// 1-based page number across the whole report.
    pub page_index: usize,
    pub category: Category,
    /// Set only on the category's first page, which shows the header bar.
    pub category_label: Option<String>,
    pub cluster_parts: Vec<ClusterPart>,
    pub is_first_page: bool,
    /// Accumulated height estimate, for verification and debugging.
    pub estimated_height: u32,
}

impl PageLayout {
    pub fn has_overflow(&self) -> bool {
        self.cluster_parts.iter().any(|p| p.overflow)
    }
}

/// Lays out one category's clusters starting at `start_page_index`.
///
/// Page indices in the result are contiguous. No page's `estimated_height`
/// exceeds `max_page_height` unless one of its parts is flagged `overflow`.
pub fn allocate_category(
    category: Category,
    clusters: &[Cluster],
    start_page_index: usize,
    max_page_height: u32,
    c: &LayoutConstants,
) -> Vec<PageLayout> {
    let continuation_room = c.continuation_room(max_page_height);
    let mut pages: Vec<PageLayout> = Vec::new();
    let mut current = PageBuilder::open(category, start_page_index, true, c);

    for cluster in clusters {
        // Not even the title and a single row fit below what is already here:
        // start the cluster on a fresh page instead of stranding a one-item part.
        if !current.is_empty() && !fits_minimal(cluster, current.room(max_page_height, c), c) {
            current = current.close_into(&mut pages, c);
        }

        let room = current.room(max_page_height, c);
        let parts = split_cluster(cluster, room, continuation_room, c);
        if let Some(first) = parts.first().filter(|p| p.split.is_some()) {
            debug!("Cluster {} split into {} parts", cluster.id, first.total_parts());
        }

        for mut part in parts {
            if current.height + part.estimated_height + c.cluster_spacing > max_page_height {
                if !current.is_empty() {
                    current = current.close_into(&mut pages, c);
                }
                if current.height + part.estimated_height + c.cluster_spacing > max_page_height {
                    warn!(
                        "Cluster {} part {} does not fit an empty page",
                        part.cluster_id,
                        part.part_number()
                    );
                    part.overflow = true;
                }
            }
            current.push(part, c);
        }
    }

    if !current.is_empty() || pages.is_empty() {
        pages.push(current.finish());
    }

    debug!(
        "Allocated {} page(s) for category {} starting at page {}",
        pages.len(),
        category.id(),
        start_page_index
    );

    pages
}

fn fits_minimal(cluster: &Cluster, room: u32, c: &LayoutConstants) -> bool {
    let min_items = cluster.items.len().min(1);
    estimate_height(&CardShape::full(cluster), min_items, c) <= room
}

// ────────────────────────────────────────────────────────────────────────────
// Page under construction
// ────────────────────────────────────────────────────────────────────────────

struct PageBuilder {
    category: Category,
    page_index: usize,
    is_first_page: bool,
    parts: Vec<ClusterPart>,
    height: u32,
}

impl PageBuilder {
    fn open(
        category: Category,
        page_index: usize,
        is_first_page: bool,
        c: &LayoutConstants,
    ) -> Self {
        Self {
            category,
            page_index,
            is_first_page,
            parts: Vec::new(),
            height: c.page_start_height(is_first_page),
        }
    }

    fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Card budget left on this page, with the trailing spacing already paid.
    fn room(&self, max_page_height: u32, c: &LayoutConstants) -> u32 {
        max_page_height.saturating_sub(self.height + c.cluster_spacing)
    }

    fn push(&mut self, part: ClusterPart, c: &LayoutConstants) {
        self.height += part.estimated_height + c.cluster_spacing;
        self.parts.push(part);
    }

    /// Pushes this page and returns the next (headerless) one.
    fn close_into(self, pages: &mut Vec<PageLayout>, c: &LayoutConstants) -> PageBuilder {
        let category = self.category;
        let next_index = self.page_index + 1;
        pages.push(self.finish());
        PageBuilder::open(category, next_index, false, c)
    }

    fn finish(self) -> PageLayout {
        PageLayout {
            page_index: self.page_index,
            category: self.category,
            category_label: self.is_first_page.then(|| self.category.label().to_string()),
            cluster_parts: self.parts,
            is_first_page: self.is_first_page,
            estimated_height: self.height,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
