use std::sync::Arc;

use crate::config::Config;
use crate::layout::LayoutConstants;
use crate::report::export::PageRasterizer;
use crate::upstream::UpstreamClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub upstream: UpstreamClient,
    /// Pluggable PDF backend. Default: HttpRasterizer against RENDER_SERVICE_URL.
    pub rasterizer: Arc<dyn PageRasterizer>,
    pub config: Config,
    /// Pixel table shared by every layout pass.
    pub layout_constants: LayoutConstants,
}
