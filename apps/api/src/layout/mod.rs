// Report layout engine.
// Implements: card height estimation, cluster splitting, greedy page allocation,
// report-wide pagination, and the on-screen preview carousel.
// Every function here is total and synchronous; nothing is cached between calls.

pub mod allocator;
pub mod constants;
pub mod estimator;
pub mod paginator;
pub mod preview;
pub mod splitter;

// Re-export the public API consumed by the report handlers.
pub use allocator::PageLayout;
pub use constants::{default_layout_constants, LayoutConstants};
pub use paginator::{paginate, ReportLayout, TocEntry};
pub use preview::{
    apply_action, preview_category, CategoryPreview, PreviewState, ViewerAction, ViewerState,
};
