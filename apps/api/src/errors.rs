use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::report::export::RasterizeError;
use crate::upstream::UpstreamError;

/// User-facing message for any PDF export failure. Deliberately generic.
pub const PDF_EXPORT_FAILED: &str = "PDF 다운로드 중 오류가 발생했습니다.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Layout code never produces one of these; only the upstream fetch and the
/// rasterization boundary can fail.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("Rasterize error: {0}")]
    Rasterize(#[from] RasterizeError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Upstream(UpstreamError::Api { status: 404, message }) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", message.clone())
            }
            AppError::Upstream(e) => {
                tracing::error!("Upstream error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    "리포트를 불러오는 중 오류가 발생했습니다.".to_string(),
                )
            }
            AppError::Rasterize(e) => {
                tracing::error!("PDF download failed: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "PDF_EXPORT_ERROR",
                    PDF_EXPORT_FAILED.to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
