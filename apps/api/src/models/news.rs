use serde::{Deserialize, Serialize};

/// News source filter: `K` (domestic press) or `F` (foreign press).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NewsSource {
    K,
    F,
}

impl NewsSource {
    pub fn as_str(self) -> &'static str {
        match self {
            NewsSource::K => "K",
            NewsSource::F => "F",
        }
    }
}

/// Generic upstream envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsListItem {
    pub news_id: String,
    pub title: String,
    pub provider: String,
    pub image_url: String,
    pub published_at: String,
    pub news_category_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsListResponse {
    pub total: u64,
    pub items: Vec<NewsListItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsListParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub news_category_id: Option<i64>,
    pub source: Option<NewsSource>,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchNewsItem {
    pub news_id: String,
    pub title: String,
    pub summary: String,
    pub source: String,
    pub provider: String,
    pub image_url: String,
    pub news_category_id: i64,
    pub published_at: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsSearchResponse {
    pub keyword: String,
    pub total: u64,
    pub items: Vec<SearchNewsItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsSearchParams {
    pub q: Option<String>,
    pub limit: Option<u32>,
    pub source: Option<NewsSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsDetailItem {
    pub news_id: String,
    pub title: String,
    pub content: String,
    pub summary: String,
    pub source: String,
    pub provider: String,
    pub news_category_id: i64,
    pub published_at: String,
    pub image_url: String,
    pub origin_url: String,
}
