//! PDF export — assembles the ordered page list and hands it to the rasterizer.
//!
//! Rasterization itself is a black box behind `PageRasterizer`. The default
//! backend, `HttpRasterizer`, posts the document and the render scale to an
//! external render service. `AppState` holds an `Arc<dyn PageRasterizer>`.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::layout::paginator::{COVER_PAGE_NUMBER, TOC_PAGE_NUMBER};
use crate::layout::{PageLayout, ReportLayout, TocEntry, ViewerState};
use crate::report::stats::{ReportStats, WeekInfo};

const RENDER_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum RasterizeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Render service error (status {status}): {message}")]
    Service { status: u16, message: String },

    #[error("Render service returned an empty file")]
    EmptyFile,

    #[error("No pages to render")]
    EmptyDocument,
}

// ────────────────────────────────────────────────────────────────────────────
// Document
// ────────────────────────────────────────────────────────────────────────────

/// Cover page figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverPage {
    pub title: String,
    pub week_number: u32,
    pub date_range: String,
    pub total_news: usize,
    pub total_issues: usize,
    pub top_keywords: Vec<String>,
}

/// One physical page, in print order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderPage {
    Cover {
        page_number: usize,
        cover: CoverPage,
    },
    TableOfContents {
        page_number: usize,
        entries: Vec<TocEntry>,
    },
    Category(PageLayout),
}

impl RenderPage {
    pub fn page_number(&self) -> usize {
        match self {
            RenderPage::Cover { page_number, .. } => *page_number,
            RenderPage::TableOfContents { page_number, .. } => *page_number,
            RenderPage::Category(layout) => layout.page_index,
        }
    }
}

/// Everything the rasterizer needs to produce the file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderDocument {
    pub filename: String,
    pub pages: Vec<RenderPage>,
}

/// `<title>_<week>주차_<date>.pdf`
pub fn export_filename(title: &str, week_number: u32, date: NaiveDate) -> String {
    format!("{title}_{week_number}주차_{}.pdf", date.format("%Y-%m-%d"))
}

/// Cover, table of contents, then every category page of `layout`.
pub fn build_render_document(
    title: &str,
    date: NaiveDate,
    week: &WeekInfo,
    stats: ReportStats,
    top_keywords: Vec<String>,
    layout: ReportLayout,
) -> RenderDocument {
    let cover = CoverPage {
        title: title.to_string(),
        week_number: week.week_number,
        date_range: week.date_range.clone(),
        total_news: stats.total_news,
        total_issues: stats.total_issues,
        top_keywords,
    };

    let mut pages = Vec::with_capacity(layout.total_pages());
    pages.push(RenderPage::Cover {
        page_number: COVER_PAGE_NUMBER,
        cover,
    });
    pages.push(RenderPage::TableOfContents {
        page_number: TOC_PAGE_NUMBER,
        entries: layout.toc_entries,
    });
    pages.extend(layout.pages.into_iter().map(RenderPage::Category));

    RenderDocument {
        filename: export_filename(title, week.week_number, date),
        pages,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Rasterizer trait
// ────────────────────────────────────────────────────────────────────────────

/// Turns an ordered page list into a PDF at the given viewer scale. Implement
/// this to swap backends without touching the handler.
#[async_trait]
pub trait PageRasterizer: Send + Sync {
    async fn rasterize(
        &self,
        document: &RenderDocument,
        scale: f32,
    ) -> Result<Bytes, RasterizeError>;
}

/// Body posted to the render service.
#[derive(Debug, Serialize)]
struct RenderRequest<'a> {
    scale: f32,
    #[serde(flatten)]
    document: &'a RenderDocument,
}

/// A finished export, ready to download.
#[derive(Debug, Clone)]
pub struct ExportedPdf {
    pub filename: String,
    pub bytes: Bytes,
}

/// Rasterizes `document` at full scale.
///
/// The viewer is switched to scale 1.0 and that scale is what the rasterizer
/// renders at. The previous scale is put back afterwards, whether
/// rasterization succeeded or not. A failure yields no file at all.
pub async fn export_pdf(
    viewer: &mut ViewerState,
    rasterizer: &dyn PageRasterizer,
    document: &RenderDocument,
) -> Result<ExportedPdf, RasterizeError> {
    if document.pages.is_empty() {
        return Err(RasterizeError::EmptyDocument);
    }

    let original_scale = viewer.scale;
    viewer.set_scale(1.0);

    let total = document.pages.len();
    for page in &document.pages {
        debug!("Queued page {}/{} for {}", page.page_number(), total, document.filename);
    }

    let result = rasterizer.rasterize(document, viewer.scale).await;

    viewer.set_scale(original_scale);

    let bytes = result?;
    if bytes.is_empty() {
        return Err(RasterizeError::EmptyFile);
    }

    info!(
        "Exported {} ({} pages, {} bytes)",
        document.filename,
        document.pages.len(),
        bytes.len()
    );

    Ok(ExportedPdf {
        filename: document.filename.clone(),
        bytes,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// HttpRasterizer (default backend)
// ────────────────────────────────────────────────────────────────────────────

/// Posts the render document and scale as JSON to `<base_url>/render`; the
/// service answers with the PDF body.
pub struct HttpRasterizer {
    client: Client,
    base_url: String,
}

impl HttpRasterizer {
    pub fn new(base_url: String) -> Result<Self, RasterizeError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(RENDER_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PageRasterizer for HttpRasterizer {
    async fn rasterize(
        &self,
        document: &RenderDocument,
        scale: f32,
    ) -> Result<Bytes, RasterizeError> {
        let response = self
            .client
            .post(format!("{}/render", self.base_url))
            .header("accept", "application/pdf")
            .json(&RenderRequest { scale, document })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Render service returned {}: {}", status, body);
            return Err(RasterizeError::Service {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.bytes().await?)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
