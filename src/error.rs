//! HTTP error mapping for request handlers.

use crate::render;
use crate::store::StoreError;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Content type used for every non-empty response body.
pub const HTML_CONTENT_TYPE: &str = "text/html;charset=UTF-8";

/// Top-level application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("not found")]
    NotFound,
}

/// Build an HTML response with the service-wide content type.
pub(crate) fn html_response(status: StatusCode, body: impl Into<String>) -> Response {
    (
        status,
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static(HTML_CONTENT_TYPE),
        )],
        body.into(),
    )
        .into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => {
                html_response(StatusCode::NOT_FOUND, render::MISSING_ITEM)
            }
            AppError::Store(err) => {
                // Backend failures are not retried and never masked as success.
                tracing::error!("store operation failed: {}", err);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
