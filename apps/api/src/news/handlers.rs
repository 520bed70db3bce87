//! Axum route handlers for news browsing and search.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::errors::AppError;
use crate::models::news::{
    NewsDetailItem, NewsListParams, NewsListResponse, NewsSearchParams, NewsSearchResponse,
};
use crate::state::AppState;

const MAX_PAGE_SIZE: u32 = 100;

/// GET /api/v1/news
pub async fn handle_news_list(
    State(state): State<AppState>,
    Query(params): Query<NewsListParams>,
) -> Result<Json<NewsListResponse>, AppError> {
    if params.limit.is_some_and(|l| l == 0 || l > MAX_PAGE_SIZE) {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {MAX_PAGE_SIZE}"
        )));
    }
    let list = state.upstream.fetch_news_list(&params).await?;
    Ok(Json(list))
}

/// GET /api/v1/news/search
pub async fn handle_news_search(
    State(state): State<AppState>,
    Query(params): Query<NewsSearchParams>,
) -> Result<Json<NewsSearchResponse>, AppError> {
    if params.q.as_deref().map_or(true, |q| q.trim().is_empty()) {
        return Err(AppError::Validation("q cannot be empty".to_string()));
    }
    let results = state.upstream.search_news(&params).await?;
    Ok(Json(results))
}

/// GET /api/v1/news/:id
pub async fn handle_news_detail(
    State(state): State<AppState>,
    Path(news_id): Path<String>,
) -> Result<Json<NewsDetailItem>, AppError> {
    let detail = state.upstream.fetch_news_detail(&news_id).await?;
    Ok(Json(detail))
}
