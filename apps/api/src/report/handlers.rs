//! Axum route handlers for the Weekly Report API.

use std::collections::{BTreeMap, HashMap};

use axum::{
    extract::{Query, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::layout::paginator::FIRST_CATEGORY_PAGE_NUMBER;
use crate::layout::{
    apply_action, paginate, preview_category, CategoryPreview, LayoutConstants, PreviewState,
    ReportLayout, ViewerAction, ViewerState,
};
use crate::models::report::{Category, Cluster};
use crate::report::export::{build_render_document, export_pdf};
use crate::report::stats::{
    aggregate_report_stats, category_issue_counts, extract_top_keywords, group_by_category,
    parse_report_date, week_info, CategoryIssueCount, ReportStats, SelectionOptions, WeekInfo,
};
use crate::state::AppState;

const TOP_KEYWORD_COUNT: usize = 3;

/// Viewer scale in effect after an export, restored from the `scale` query.
pub const VIEWER_SCALE_HEADER: &str = "x-viewer-scale";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ReportDateQuery {
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub date: String,
    /// Viewer zoom at the time of export; restored after rasterization.
    pub scale: Option<f32>,
}

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub date: String,
    /// Carousel page per cluster id, as held by the viewer.
    #[serde(default)]
    pub carousel_pages: HashMap<i64, usize>,
    /// Cluster ids the pages were recorded against. A different set resets every carousel.
    #[serde(default)]
    pub cluster_ids: Option<Vec<i64>>,
    #[serde(default)]
    pub viewer: Option<ViewerState>,
    #[serde(default)]
    pub action: Option<ViewerAction>,
}

/// Cover-page data shared by the layout and preview responses.
#[derive(Debug, Serialize)]
pub struct ReportSummary {
    pub date: NaiveDate,
    pub week: WeekInfo,
    pub stats: ReportStats,
    pub top_keywords: Vec<String>,
    pub issue_counts: Vec<CategoryIssueCount>,
    pub max_issue_count: usize,
}

#[derive(Debug, Serialize)]
pub struct LayoutResponse {
    pub summary: ReportSummary,
    pub total_pages: usize,
    pub layout: ReportLayout,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub summary: ReportSummary,
    pub total_pages: usize,
    pub categories: Vec<CategoryPreview>,
    /// State to send back with the next request.
    pub cluster_ids: Vec<i64>,
    pub carousel_pages: HashMap<i64, usize>,
    pub carousel_reset: bool,
    pub viewer: ViewerState,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/report/layout
///
/// Print-exact layout: every category split across A4 pages, with TOC page numbers.
pub async fn handle_report_layout(
    State(state): State<AppState>,
    Query(query): Query<ReportDateQuery>,
) -> Result<Json<LayoutResponse>, AppError> {
    let (date, clusters) = load_report(&state, &query.date).await?;
    let grouped = group_by_category(&clusters, selection_options(&state));
    let layout = paginate_blocking(grouped, state.layout_constants.clone()).await?;

    Ok(Json(LayoutResponse {
        summary: summarize(date, &clusters),
        total_pages: layout.total_pages(),
        layout,
    }))
}

/// POST /api/v1/report/preview
///
/// Screen layout: one page per category, clusters whole, items in 3-per-page carousels.
pub async fn handle_report_preview(
    State(state): State<AppState>,
    Json(request): Json<PreviewRequest>,
) -> Result<Json<PreviewResponse>, AppError> {
    let (date, clusters) = load_report(&state, &request.date).await?;
    let grouped = group_by_category(&clusters, selection_options(&state));

    let shown: Vec<Cluster> = grouped.values().flatten().cloned().collect();
    let mut preview_state = match request.cluster_ids {
        Some(ids) => PreviewState::restore(ids, request.carousel_pages),
        None => PreviewState::with_pages(&shown, request.carousel_pages),
    };
    let carousel_reset = preview_state.sync_clusters(&shown);

    let total_pages = FIRST_CATEGORY_PAGE_NUMBER - 1 + Category::ALL.len();
    let mut viewer = request.viewer.unwrap_or_default();
    viewer.set_total_pages(total_pages);
    if let Some(action) = request.action {
        apply_action(action, &shown, &mut preview_state, &mut viewer);
    }

    let categories: Vec<CategoryPreview> = Category::ALL
        .into_iter()
        .map(|category| {
            let clusters = grouped.get(&category).map(Vec::as_slice).unwrap_or(&[]);
            preview_category(category, clusters, &preview_state)
        })
        .collect();

    Ok(Json(PreviewResponse {
        summary: summarize(date, &clusters),
        total_pages,
        categories,
        cluster_ids: preview_state.cluster_ids().to_vec(),
        carousel_pages: preview_state.carousel_pages().clone(),
        carousel_reset,
        viewer,
    }))
}

/// GET /api/v1/report/export
///
/// Lays the report out for print and returns the rasterized PDF as an attachment.
/// A date without clusters still exports cover, contents and empty category pages.
/// Any rasterization failure becomes one generic error; no partial file is sent.
pub async fn handle_report_export(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, AppError> {
    let export_id = Uuid::new_v4();
    let (date, clusters) = load_report(&state, &query.date).await?;
    let grouped = group_by_category(&clusters, selection_options(&state));
    let layout = paginate_blocking(grouped, state.layout_constants.clone()).await?;

    let mut viewer = ViewerState::new(layout.total_pages());
    if let Some(scale) = query.scale {
        viewer.set_scale(scale);
    }

    let week = week_info(date);
    let document = build_render_document(
        &state.config.report_title,
        date,
        &week,
        aggregate_report_stats(&clusters),
        extract_top_keywords(&clusters, TOP_KEYWORD_COUNT),
        layout,
    );

    info!(
        "Export {}: rasterizing {} pages for {}",
        export_id,
        document.pages.len(),
        date
    );
    let pdf = export_pdf(&mut viewer, state.rasterizer.as_ref(), &document).await?;

    let disposition = HeaderValue::from_str(&content_disposition(&pdf.filename))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid filename header: {e}")))?;
    let restored_scale = HeaderValue::from_str(&format!("{:.2}", viewer.scale))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid scale header: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (header::CONTENT_DISPOSITION, disposition),
            (header::HeaderName::from_static(VIEWER_SCALE_HEADER), restored_scale),
        ],
        pdf.bytes,
    )
        .into_response())
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn load_report(
    state: &AppState,
    raw_date: &str,
) -> Result<(NaiveDate, Vec<Cluster>), AppError> {
    let date = parse_report_date(raw_date)
        .ok_or_else(|| AppError::Validation("date must be YYYY-MM-DD".to_string()))?;
    let clusters = state
        .upstream
        .fetch_report(&date.format("%Y-%m-%d").to_string(), None)
        .await?;
    Ok((date, clusters))
}

fn selection_options(state: &AppState) -> SelectionOptions {
    SelectionOptions {
        clusters_per_category: state.config.clusters_per_category,
        max_items_per_cluster: state.config.max_items_per_cluster,
    }
}

fn summarize(date: NaiveDate, clusters: &[Cluster]) -> ReportSummary {
    let (issue_counts, max_issue_count) = category_issue_counts(clusters);
    ReportSummary {
        date,
        week: week_info(date),
        stats: aggregate_report_stats(clusters),
        top_keywords: extract_top_keywords(clusters, TOP_KEYWORD_COUNT),
        issue_counts,
        max_issue_count,
    }
}

/// RFC 5987 `filename*` attachment header; the name may contain Hangul.
fn content_disposition(filename: &str) -> String {
    format!("attachment; filename*=UTF-8''{}", urlencoding::encode(filename))
}

/// Pagination is synchronous and total; it runs off the async workers like any CPU pass.
async fn paginate_blocking(
    grouped: BTreeMap<Category, Vec<Cluster>>,
    constants: LayoutConstants,
) -> Result<ReportLayout, AppError> {
    tokio::task::spawn_blocking(move || paginate(&grouped, &Category::ALL, &constants))
        .await
        .map_err(|e| AppError::Internal(e.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_disposition_keeps_unreserved() {
        assert_eq!(
            content_disposition("report_48-1.pdf"),
            "attachment; filename*=UTF-8''report_48-1.pdf"
        );
        assert_eq!(
            content_disposition("a b"),
            "attachment; filename*=UTF-8''a%20b"
        );
    }

    #[test]
    fn test_content_disposition_encodes_hangul() {
        // "주" = EC A3 BC
        assert_eq!(
            content_disposition("주.pdf"),
            "attachment; filename*=UTF-8''%EC%A3%BC.pdf"
        );
    }

    #[test]
    fn test_preview_request_defaults_carousel_pages() {
        let req: PreviewRequest = serde_json::from_str(r#"{"date": "2025-12-02"}"#).unwrap();
        assert!(req.carousel_pages.is_empty());
        let req: PreviewRequest =
            serde_json::from_str(r#"{"date": "2025-12-02", "carousel_pages": {"17": 2}}"#).unwrap();
        assert_eq!(req.carousel_pages.get(&17), Some(&2));
        assert!(req.cluster_ids.is_none() && req.viewer.is_none() && req.action.is_none());
    }

    #[test]
    fn test_preview_request_with_viewer_and_action() {
        let req: PreviewRequest = serde_json::from_str(
            r#"{
                "date": "2025-12-02",
                "cluster_ids": [17, 18],
                "viewer": {"scale": 0.8, "current_page": 2, "total_pages": 8},
                "action": {"type": "next_page"}
            }"#,
        )
        .unwrap();
        assert_eq!(req.cluster_ids, Some(vec![17, 18]));
        assert_eq!(req.viewer.map(|v| v.current_page), Some(2));
        assert_eq!(req.action, Some(ViewerAction::NextPage));
    }
}
