//! HTTP utilities for translation providers
//!
//! Common request/response handling shared by provider implementations.

use crate::config::get_translation_http_timeout_secs;
use crate::translate::TranslateError;
use reqwest::{Client as HttpClient, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Longest error body echoed back in an error message
const MAX_ERROR_BODY: usize = 500;

/// Creates an HTTP client configured with the translation timeout.
///
/// Uses `TRANSLATION_HTTP_TIMEOUT_SECS` environment variable or 30s default.
#[must_use]
pub fn create_http_client() -> HttpClient {
    let timeout = Duration::from_secs(get_translation_http_timeout_secs());
    HttpClient::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| HttpClient::new())
}

/// Sends a prepared request and decodes the JSON response.
///
/// # Errors
///
/// Returns `TranslateError::Network` on connectivity issues, a status-specific
/// variant on non-success responses, or `TranslateError::Json` if decoding fails.
pub async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, TranslateError> {
    let response = request
        .send()
        .await
        .map_err(|e| TranslateError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(status_error(status, &body));
    }

    response
        .json()
        .await
        .map_err(|e| TranslateError::Json(e.to_string()))
}

/// Maps a non-success status and its body onto a [`TranslateError`].
pub fn status_error(status: StatusCode, body: &str) -> TranslateError {
    let message = clean_error_body(status, body);
    match status.as_u16() {
        403 => TranslateError::Authorization(message),
        429 => TranslateError::RateLimited(message),
        456 => TranslateError::QuotaExceeded(message),
        code => TranslateError::Api {
            status: code,
            message,
        },
    }
}

fn clean_error_body(status: StatusCode, body: &str) -> String {
    let trimmed = body.trim();

    // Nginx/proxy error pages
    let is_html = trimmed.starts_with("<!DOCTYPE")
        || trimmed.starts_with("<html")
        || trimmed.starts_with("<HTML");
    if is_html || trimmed.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("Unknown status")
            .to_string();
    }

    // DeepL wraps errors as {"message": "..."}
    let message = serde_json::from_str::<serde_json::Value>(trimmed)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| trimmed.to_string());

    truncate_chars(&message, MAX_ERROR_BODY)
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}... (truncated)", &text[..idx]),
        None => text.to_string(),
    }
}
