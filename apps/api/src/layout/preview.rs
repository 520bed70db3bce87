//! On-screen preview — one page per category, clusters kept whole, items in a
//! 3-per-page carousel. Independent of A4 height estimation since the screen scrolls.
//!
//! All viewer state lives in explicit structs owned by the caller:
//! `PreviewState` (carousel page per cluster) and `ViewerState` (zoom and page cursor).
//! `apply_action` is the single entry point for user navigation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::report::{Category, Cluster, NewsItem};

pub const ITEMS_PER_CAROUSEL_PAGE: usize = 3;

// ────────────────────────────────────────────────────────────────────────────
// Carousel state
// ────────────────────────────────────────────────────────────────────────────

/// Current carousel page (1-based) per cluster id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreviewState {
    carousel_pages: HashMap<i64, usize>,
    /// Cluster ids the pages refer to; a different set resets everything.
    cluster_ids: Vec<i64>,
}

impl PreviewState {
    /// Restores caller-held pages recorded against `cluster_ids`.
    /// Call `sync_clusters` afterwards to apply the reset rule.
    pub fn restore(cluster_ids: Vec<i64>, pages: HashMap<i64, usize>) -> Self {
        let mut state = Self {
            carousel_pages: HashMap::new(),
            cluster_ids,
        };
        for (id, page) in pages {
            state.set_page(id, page);
        }
        state
    }

    /// Restores caller-held pages, bound to `clusters`.
    pub fn with_pages(clusters: &[Cluster], pages: HashMap<i64, usize>) -> Self {
        let ids = clusters.iter().map(|c| c.id).collect();
        Self::restore(ids, pages)
    }

    pub fn cluster_ids(&self) -> &[i64] {
        &self.cluster_ids
    }

    pub fn carousel_pages(&self) -> &HashMap<i64, usize> {
        &self.carousel_pages
    }

    /// Data-change event. Resets every carousel to page 1 when the cluster set differs.
    /// Returns `true` if a reset happened.
    pub fn sync_clusters(&mut self, clusters: &[Cluster]) -> bool {
        let ids: Vec<i64> = clusters.iter().map(|c| c.id).collect();
        if ids == self.cluster_ids {
            return false;
        }
        self.cluster_ids = ids;
        self.carousel_pages.clear();
        true
    }

    pub fn page(&self, cluster_id: i64) -> usize {
        self.carousel_pages.get(&cluster_id).copied().unwrap_or(1)
    }

    pub fn set_page(&mut self, cluster_id: i64, page: usize) {
        self.carousel_pages.insert(cluster_id, page.max(1));
    }

    pub fn next(&mut self, cluster: &Cluster) {
        let page = self.page(cluster.id);
        if page < carousel_page_count(cluster.items.len()) {
            self.set_page(cluster.id, page + 1);
        }
    }

    pub fn prev(&mut self, cluster: &Cluster) {
        let page = self.page(cluster.id);
        if page > 1 {
            self.set_page(cluster.id, page - 1);
        }
    }
}

/// Number of carousel pages for `item_count` items; at least 1.
pub fn carousel_page_count(item_count: usize) -> usize {
    item_count.div_ceil(ITEMS_PER_CAROUSEL_PAGE).max(1)
}

/// `items[(page-1)*3 .. page*3]`, clipped to the list.
pub fn carousel_slice(items: &[NewsItem], page: usize) -> &[NewsItem] {
    let start = (page.max(1) - 1) * ITEMS_PER_CAROUSEL_PAGE;
    if start >= items.len() {
        return &[];
    }
    let end = (start + ITEMS_PER_CAROUSEL_PAGE).min(items.len());
    &items[start..end]
}

// ────────────────────────────────────────────────────────────────────────────
// Preview output
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterPreview {
    /// 1-based position within the category, shown as the card's index badge.
    pub display_index: usize,
    pub cluster_id: i64,
    pub representative_title: String,
    pub score: Option<f64>,
    pub size: u32,
    pub summary: String,
    pub items: Vec<NewsItem>,
    /// Total related items, shown in the container caption.
    pub item_total: usize,
    pub carousel_page: usize,
    pub carousel_pages: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryPreview {
    pub category: Category,
    pub label: String,
    pub clusters: Vec<ClusterPreview>,
}

/// Builds the preview page for one category from score-sorted clusters.
///
/// A stored page past the end is clamped to the last carousel page.
pub fn preview_category(
    category: Category,
    clusters: &[Cluster],
    state: &PreviewState,
) -> CategoryPreview {
    let clusters = clusters
        .iter()
        .enumerate()
        .map(|(i, cluster)| {
            let pages = carousel_page_count(cluster.items.len());
            let page = state.page(cluster.id).min(pages);
            ClusterPreview {
                display_index: i + 1,
                cluster_id: cluster.id,
                representative_title: cluster.representative_title.clone(),
                score: cluster.score,
                size: cluster.size,
                summary: cluster.summary.clone(),
                items: carousel_slice(&cluster.items, page).to_vec(),
                item_total: cluster.items.len(),
                carousel_page: page,
                carousel_pages: pages,
                has_prev: page > 1,
                has_next: page * ITEMS_PER_CAROUSEL_PAGE < cluster.items.len(),
            }
        })
        .collect();

    CategoryPreview {
        category,
        label: category.label().to_string(),
        clusters,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Viewer state (zoom + page cursor)
// ────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_SCALE: f32 = 0.62;
pub const MIN_SCALE: f32 = 0.3;
pub const MAX_SCALE: f32 = 2.0;
pub const SCALE_STEP: f32 = 0.1;

/// A4 height in CSS px (297mm × 3.7795 px/mm).
const A4_HEIGHT_PX: f32 = 297.0 * 3.7795;
const PAGE_MARGIN_PX: f32 = 16.0;
const CONTAINER_PADDING_PX: f32 = 32.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerState {
    pub scale: f32,
    /// 1-based.
    pub current_page: usize,
    pub total_pages: usize,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            current_page: 1,
            total_pages: 1,
        }
    }
}

impl ViewerState {
    pub fn new(total_pages: usize) -> Self {
        Self {
            total_pages: total_pages.max(1),
            ..Self::default()
        }
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale.clamp(MIN_SCALE, MAX_SCALE);
    }

    pub fn zoom_in(&mut self) {
        self.set_scale(self.scale + SCALE_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_scale(self.scale - SCALE_STEP);
    }

    /// Scale at which one A4 page fills a container of `container_height` px. Never above 1.
    pub fn fit_to_container(&mut self, container_height: f32) {
        let available = container_height - CONTAINER_PADDING_PX - PAGE_MARGIN_PX;
        self.set_scale((available / A4_HEIGHT_PX).min(1.0));
    }

    /// Data-change event: a new layout arrived. Keeps the cursor in range.
    pub fn set_total_pages(&mut self, total_pages: usize) {
        self.total_pages = total_pages.max(1);
        self.current_page = self.current_page.clamp(1, self.total_pages);
    }

    pub fn go_to(&mut self, page: usize) {
        if (1..=self.total_pages).contains(&page) {
            self.current_page = page;
        }
    }

    pub fn first(&mut self) {
        self.go_to(1);
    }

    pub fn last(&mut self) {
        self.go_to(self.total_pages);
    }

    pub fn prev(&mut self) {
        self.go_to(self.current_page.saturating_sub(1).max(1));
    }

    pub fn next(&mut self) {
        self.go_to((self.current_page + 1).min(self.total_pages));
    }
}

// ────────────────────────────────────────────────────────────────────────────
// User actions
// ────────────────────────────────────────────────────────────────────────────

/// One navigation step requested by the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewerAction {
    CarouselNext { cluster_id: i64 },
    CarouselPrev { cluster_id: i64 },
    ZoomIn,
    ZoomOut,
    FitToContainer { height: f32 },
    FirstPage,
    LastPage,
    PrevPage,
    NextPage,
    GoToPage { page: usize },
}

/// Applies `action` to the caller-held state. A carousel action naming a
/// cluster that is not shown is ignored.
pub fn apply_action(
    action: ViewerAction,
    clusters: &[Cluster],
    preview: &mut PreviewState,
    viewer: &mut ViewerState,
) {
    match action {
        ViewerAction::CarouselNext { cluster_id } => {
            if let Some(cluster) = clusters.iter().find(|c| c.id == cluster_id) {
                preview.next(cluster);
            }
        }
        ViewerAction::CarouselPrev { cluster_id } => {
            if let Some(cluster) = clusters.iter().find(|c| c.id == cluster_id) {
                preview.prev(cluster);
            }
        }
        ViewerAction::ZoomIn => viewer.zoom_in(),
        ViewerAction::ZoomOut => viewer.zoom_out(),
        ViewerAction::FitToContainer { height } => viewer.fit_to_container(height),
        ViewerAction::FirstPage => viewer.first(),
        ViewerAction::LastPage => viewer.last(),
        ViewerAction::PrevPage => viewer.prev(),
        ViewerAction::NextPage => viewer.next(),
        ViewerAction::GoToPage { page } => viewer.go_to(page),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn make_cluster(id: i64, item_count: usize) -> Cluster {
        Cluster {
            id,
            category_id: 2,
            created_at: None,
            representative_title: format!("Issue {id}"),
            score: Some(1.0),
            size: item_count as u32,
            summary: String::new(),
            items: (0..item_count)
                .map(|i| NewsItem {
                    news_id: format!("{id}-{i}"),
                    title: format!("Article {i}"),
                    origin_url: String::new(),
                })
                .collect(),
        }
    }

    // ── carousel ────────────────────────────────────────────────────────────

    #[test]
    fn test_carousel_slice_pages() {
        let cluster = make_cluster(1, 7);
        assert_eq!(carousel_slice(&cluster.items, 1).len(), 3);
        assert_eq!(carousel_slice(&cluster.items, 2)[0].news_id, "1-3");
        assert_eq!(carousel_slice(&cluster.items, 3).len(), 1);
        assert!(carousel_slice(&cluster.items, 4).is_empty());
    }

    #[test]
    fn test_preview_flags_on_first_and_last_page() {
        let cluster = make_cluster(1, 7);
        let mut state = PreviewState::default();
        state.sync_clusters(std::slice::from_ref(&cluster));

        let preview = preview_category(Category::China, std::slice::from_ref(&cluster), &state);
        let card = &preview.clusters[0];
        assert_eq!(card.carousel_page, 1);
        assert!(!card.has_prev);
        assert!(card.has_next);
        assert_eq!(card.carousel_pages, 3);
        assert_eq!(card.item_total, 7);

        state.next(&cluster);
        state.next(&cluster);
        state.next(&cluster); // already on the last page
        let preview = preview_category(Category::China, std::slice::from_ref(&cluster), &state);
        let card = &preview.clusters[0];
        assert_eq!(card.carousel_page, 3);
        assert!(card.has_prev);
        assert!(!card.has_next);
        assert_eq!(card.items.len(), 1);
    }

    #[test]
    fn test_preview_clamps_stale_page() {
        let clusters = vec![make_cluster(1, 4)];
        let state = PreviewState::with_pages(&clusters, HashMap::from([(1, 9)]));
        let preview = preview_category(Category::China, &clusters, &state);
        assert_eq!(preview.clusters[0].carousel_page, 2);
        assert_eq!(preview.clusters[0].items.len(), 1);
    }

    #[test]
    fn test_cluster_without_items_has_one_empty_page() {
        let clusters = vec![make_cluster(5, 0)];
        let preview = preview_category(Category::China, &clusters, &PreviewState::default());
        let card = &preview.clusters[0];
        assert_eq!(card.carousel_pages, 1);
        assert!(card.items.is_empty());
        assert!(!card.has_next && !card.has_prev);
    }

    #[test]
    fn test_sync_resets_only_on_changed_cluster_set() {
        let clusters = vec![make_cluster(1, 9), make_cluster(2, 9)];
        let mut state = PreviewState::default();
        assert!(state.sync_clusters(&clusters));
        state.set_page(1, 3);

        assert!(!state.sync_clusters(&clusters));
        assert_eq!(state.page(1), 3);

        let other = vec![make_cluster(3, 9)];
        assert!(state.sync_clusters(&other));
        assert_eq!(state.page(1), 1);
    }

    #[test]
    fn test_display_index_follows_input_order() {
        let clusters = vec![make_cluster(10, 1), make_cluster(11, 1), make_cluster(12, 1)];
        let preview = preview_category(Category::Domestic, &clusters, &PreviewState::default());
        let ids: Vec<(usize, i64)> = preview
            .clusters
            .iter()
            .map(|c| (c.display_index, c.cluster_id))
            .collect();
        assert_eq!(ids, vec![(1, 10), (2, 11), (3, 12)]);
        assert_eq!(preview.label, "국내동향");
    }

    // ── viewer ──────────────────────────────────────────────────────────────

    #[test]
    fn test_zoom_is_clamped() {
        let mut viewer = ViewerState::new(8);
        for _ in 0..30 {
            viewer.zoom_in();
        }
        assert!((viewer.scale - MAX_SCALE).abs() < 1e-6);
        for _ in 0..30 {
            viewer.zoom_out();
        }
        assert!((viewer.scale - MIN_SCALE).abs() < 1e-6);
    }

    #[test]
    fn test_fit_to_container_caps_at_one() {
        let mut viewer = ViewerState::default();
        viewer.fit_to_container(5000.0);
        assert!((viewer.scale - 1.0).abs() < 1e-6);
        viewer.fit_to_container(700.0);
        assert!(viewer.scale < 1.0 && viewer.scale >= MIN_SCALE);
    }

    #[test]
    fn test_page_navigation_stays_in_range() {
        let mut viewer = ViewerState::new(4);
        viewer.prev();
        assert_eq!(viewer.current_page, 1);
        viewer.last();
        assert_eq!(viewer.current_page, 4);
        viewer.next();
        assert_eq!(viewer.current_page, 4);
        viewer.go_to(9);
        assert_eq!(viewer.current_page, 4);

        viewer.set_total_pages(2);
        assert_eq!(viewer.current_page, 2);
        viewer.first();
        assert_eq!(viewer.current_page, 1);
    }

    // ── actions ─────────────────────────────────────────────────────────────

    #[test]
    fn test_apply_carousel_actions() {
        let clusters = vec![make_cluster(1, 7), make_cluster(2, 2)];
        let mut preview = PreviewState::with_pages(&clusters, HashMap::new());
        let mut viewer = ViewerState::new(8);

        let next = ViewerAction::CarouselNext { cluster_id: 1 };
        apply_action(next, &clusters, &mut preview, &mut viewer);
        assert_eq!(preview.page(1), 2);
        assert_eq!(preview.page(2), 1);

        let prev = ViewerAction::CarouselPrev { cluster_id: 1 };
        apply_action(prev, &clusters, &mut preview, &mut viewer);
        apply_action(prev, &clusters, &mut preview, &mut viewer);
        assert_eq!(preview.page(1), 1);

        // unknown cluster leaves everything alone
        let before = preview.clone();
        let ghost = ViewerAction::CarouselNext { cluster_id: 99 };
        apply_action(ghost, &clusters, &mut preview, &mut viewer);
        assert_eq!(preview, before);
    }

    #[test]
    fn test_apply_viewer_actions() {
        let clusters = vec![make_cluster(1, 1)];
        let mut preview = PreviewState::default();
        let mut viewer = ViewerState::new(8);

        apply_action(ViewerAction::LastPage, &clusters, &mut preview, &mut viewer);
        assert_eq!(viewer.current_page, 8);
        apply_action(ViewerAction::PrevPage, &clusters, &mut preview, &mut viewer);
        assert_eq!(viewer.current_page, 7);
        let go_to = ViewerAction::GoToPage { page: 3 };
        apply_action(go_to, &clusters, &mut preview, &mut viewer);
        assert_eq!(viewer.current_page, 3);
        apply_action(ViewerAction::NextPage, &clusters, &mut preview, &mut viewer);
        assert_eq!(viewer.current_page, 4);
        apply_action(ViewerAction::FirstPage, &clusters, &mut preview, &mut viewer);
        assert_eq!(viewer.current_page, 1);

        apply_action(ViewerAction::ZoomIn, &clusters, &mut preview, &mut viewer);
        assert!((viewer.scale - (DEFAULT_SCALE + SCALE_STEP)).abs() < 1e-6);
        apply_action(ViewerAction::ZoomOut, &clusters, &mut preview, &mut viewer);
        assert!((viewer.scale - DEFAULT_SCALE).abs() < 1e-6);
        let fit = ViewerAction::FitToContainer { height: 5000.0 };
        apply_action(fit, &clusters, &mut preview, &mut viewer);
        assert!((viewer.scale - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_viewer_action_wire_format() {
        let action: ViewerAction =
            serde_json::from_str(r#"{"type": "carousel_next", "cluster_id": 17}"#).unwrap();
        assert_eq!(action, ViewerAction::CarouselNext { cluster_id: 17 });
        let action: ViewerAction = serde_json::from_str(r#"{"type": "zoom_in"}"#).unwrap();
        assert_eq!(action, ViewerAction::ZoomIn);
    }

    #[test]
    fn test_restore_resets_when_cluster_set_changed() {
        let clusters = vec![make_cluster(1, 9)];
        let mut state = PreviewState::restore(vec![1], HashMap::from([(1, 3)]));
        assert!(!state.sync_clusters(&clusters));
        assert_eq!(state.page(1), 3);

        let mut state = PreviewState::restore(vec![1, 2], HashMap::from([(1, 3)]));
        assert!(state.sync_clusters(&clusters));
        assert_eq!(state.page(1), 1);
        assert!(state.carousel_pages().is_empty());
        assert_eq!(state.cluster_ids(), &[1]);
    }
}
