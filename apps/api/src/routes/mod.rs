pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::news::handlers as news;
use crate::report::handlers as report;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Weekly report
        .route("/api/v1/report/layout", get(report::handle_report_layout))
        .route("/api/v1/report/preview", post(report::handle_report_preview))
        .route("/api/v1/report/export", get(report::handle_report_export))
        // News browsing
        .route("/api/v1/news", get(news::handle_news_list))
        .route("/api/v1/news/search", get(news::handle_news_search))
        .route("/api/v1/news/:id", get(news::handle_news_detail))
        .with_state(state)
}
