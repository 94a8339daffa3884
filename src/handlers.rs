//! Request handlers realizing the routing table: submission form, item
//! creation, streamed item retrieval, and the method-not-allowed fallback.

use crate::error::{html_response, AppError, HTML_CONTENT_TYPE};
use crate::{keys, relay, render, sanitize::sanitize, AppState};
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Response},
    Form,
};
use bytes::Bytes;
use serde::Deserialize;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

/// Buffered response chunks between the relay task and the HTTP body.
const RELAY_CHANNEL_CAPACITY: usize = 8;

/// Form payload for item submission.
#[derive(Debug, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub content: String,
}

/// Serve the submission form at the root path.
pub async fn show_form() -> Response {
    html_response(StatusCode::OK, render::submission_form())
}

/// Fetch a stored item and stream it back wrapped in the display document.
///
/// The relay task is spawned, not awaited, so response transmission starts
/// as soon as the preface chunk is available.
///
/// # Errors
/// Returns [`AppError::Store`] if the backend cannot be reached; an absent
/// key yields the missing-item document via [`AppError::NotFound`].
pub async fn get_item(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response, AppError> {
    if key.eq_ignore_ascii_case("favicon.ico") {
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    let body = state.store.get(&key).await?.ok_or(AppError::NotFound)?;

    let (tx, rx) = mpsc::channel(RELAY_CHANNEL_CAPACITY);
    tokio::spawn(relay::relay(body.stream, tx));

    Ok((
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static(HTML_CONTENT_TYPE),
        )],
        Body::from_stream(ReceiverStream::new(rx)),
    )
        .into_response())
}

/// Store a submitted item and respond with its retrieval URL.
///
/// The content is escaped before storage, so what is stored (and later
/// streamed back verbatim) is already HTML-safe. Provenance headers are
/// recorded as object metadata, empty when absent.
///
/// # Errors
/// Returns [`AppError::Store`] if the backend write fails.
pub async fn create_item(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
    Form(submission): Form<Submission>,
) -> Result<Response, AppError> {
    if submission.content.is_empty() {
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    let content = sanitize(&submission.content);
    let key = keys::new_key();
    let metadata = HashMap::from([
        (
            "cf-connecting-ip".to_string(),
            header_or_empty(&headers, "cf-connecting-ip"),
        ),
        ("cf-ray".to_string(), header_or_empty(&headers, "cf-ray")),
    ]);

    let stored = state
        .store
        .put(&key, Bytes::from(content), metadata)
        .await?;
    tracing::info!("created {}, {} bytes", stored.key, stored.size);

    let item_url = format!("{}{}", base_url(&headers, uri.path()), stored.key);
    Ok(html_response(
        StatusCode::CREATED,
        render::item_created(&item_url),
    ))
}

/// Fallback for any method other than GET or POST.
pub async fn method_not_allowed() -> Response {
    let mut response = html_response(
        StatusCode::METHOD_NOT_ALLOWED,
        render::METHOD_NOT_ALLOWED,
    );
    response
        .headers_mut()
        .insert(header::ALLOW, HeaderValue::from_static("GET,POST"));
    response
}

fn header_or_empty(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_string()
}

/// Reconstruct the request's own base URL, trailing slash guaranteed, so the
/// minted key can be appended directly.
fn base_url(headers: &HeaderMap, path: &str) -> String {
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("http");
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("localhost");
    let mut url = format!("{scheme}://{host}{path}");
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}

#[cfg(test)]
mod tests {
    use super::base_url;
    use axum::http::{header, HeaderMap, HeaderValue};

    #[test]
    fn base_url_uses_host_and_path() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("paste.example"));
        assert_eq!(base_url(&headers, "/"), "http://paste.example/");
    }

    #[test]
    fn base_url_respects_forwarded_proto_and_adds_slash() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("paste.example"));
        headers.insert("x-forwarded-proto", HeaderValue::from_static("https"));
        assert_eq!(base_url(&headers, "/sub"), "https://paste.example/sub/");
    }

    #[test]
    fn base_url_falls_back_to_localhost() {
        assert_eq!(base_url(&HeaderMap::new(), "/"), "http://localhost/");
    }
}
