/// Upstream Client — the single point of entry for calls to the news/report REST API.
///
/// The upstream returns pre-clustered, pre-scored data; nothing here reorders or
/// rescores it. Authentication is a bearer token forwarded as-is when configured.
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::news::{
    ApiResponse, NewsDetailItem, NewsListParams, NewsListResponse, NewsSearchParams,
    NewsSearchResponse,
};
use crate::models::report::{Cluster, ReportResponse};

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Upstream reported failure: {0}")]
    Unsuccessful(String),
}

/// Thin wrapper over the upstream REST API.
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl UpstreamClient {
    pub fn new(base_url: String, token: Option<String>) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// GET /api/report: every cluster for the report date, optionally one category.
    pub async fn fetch_report(
        &self,
        date: &str,
        category_id: Option<i64>,
    ) -> Result<Vec<Cluster>, UpstreamError> {
        let mut query: Vec<(&str, String)> = vec![("date", date.to_string())];
        if let Some(id) = category_id {
            query.push(("category_id", id.to_string()));
        }

        let response: ReportResponse = self.get_json("/api/report", &query).await?;
        if !response.success {
            return Err(UpstreamError::Unsuccessful(
                response
                    .error
                    .unwrap_or_else(|| "리포트 데이터를 불러올 수 없습니다.".to_string()),
            ));
        }

        debug!("Fetched {} clusters for {}", response.data.len(), date);
        Ok(response.data)
    }

    /// GET /api/news/
    pub async fn fetch_news_list(
        &self,
        params: &NewsListParams,
    ) -> Result<NewsListResponse, UpstreamError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        push_opt(&mut query, "start_date", params.start_date.clone());
        push_opt(&mut query, "end_date", params.end_date.clone());
        push_opt(&mut query, "news_category_id", params.news_category_id);
        push_opt(&mut query, "source", params.source.map(|s| s.as_str()));
        push_opt(&mut query, "offset", params.offset);
        push_opt(&mut query, "limit", params.limit);

        let response: ApiResponse<NewsListResponse> = self.get_json("/api/news/", &query).await?;
        unwrap_envelope(response)
    }

    /// GET /api/search/news
    pub async fn search_news(
        &self,
        params: &NewsSearchParams,
    ) -> Result<NewsSearchResponse, UpstreamError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        push_opt(&mut query, "q", params.q.clone());
        push_opt(&mut query, "limit", params.limit);
        push_opt(&mut query, "source", params.source.map(|s| s.as_str()));

        self.get_json("/api/search/news", &query).await
    }

    /// GET /api/news/{id}
    pub async fn fetch_news_detail(&self, news_id: &str) -> Result<NewsDetailItem, UpstreamError> {
        let path = format!("/api/news/{news_id}");
        let response: ApiResponse<NewsDetailItem> = self.get_json(&path, &[]).await?;
        unwrap_envelope(response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, UpstreamError> {
        let request = self
            .authorize(self.client.get(format!("{}{}", self.base_url, path)))
            .query(query);

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Upstream {} returned {}: {}", path, status, body);
            return Err(UpstreamError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.json().await?)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

fn push_opt<T: ToString>(
    query: &mut Vec<(&'static str, String)>,
    key: &'static str,
    value: Option<T>,
) {
    if let Some(v) = value {
        query.push((key, v.to_string()));
    }
}

fn unwrap_envelope<T>(response: ApiResponse<T>) -> Result<T, UpstreamError> {
    match (response.success, response.data) {
        (true, Some(data)) => Ok(data),
        (_, _) => Err(UpstreamError::Unsuccessful(
            response
                .error
                .unwrap_or_else(|| "upstream returned no data".to_string()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = UpstreamClient::new("http://localhost:8000/".to_string(), None).unwrap();
        assert_eq!(client.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_push_opt_skips_none() {
        let mut query = Vec::new();
        push_opt::<u32>(&mut query, "limit", None);
        push_opt(&mut query, "offset", Some(20));
        assert_eq!(query, vec![("offset", "20".to_string())]);
    }

    #[test]
    fn test_unwrap_envelope_failure_carries_message() {
        let response: ApiResponse<u32> = ApiResponse {
            success: false,
            data: None,
            error: Some("bad date".to_string()),
        };
        match unwrap_envelope(response) {
            Err(UpstreamError::Unsuccessful(msg)) => assert_eq!(msg, "bad date"),
            other => panic!("expected Unsuccessful, got {other:?}"),
        }
    }

    #[test]
    fn test_unwrap_envelope_success() {
        let response = ApiResponse {
            success: true,
            data: Some(5u32),
            error: None,
        };
        assert_eq!(unwrap_envelope(response).unwrap(), 5);
    }
}
