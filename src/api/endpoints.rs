//! Endpoint URL builders.
//!
//! Path segments and query values are percent-encoded by `Url`, so usernames
//! and search terms can carry any characters.

#[cfg(test)]
#[path = "endpoints_test.rs"]
mod endpoints_test;

use reqwest::Url;

use crate::error::ClientError;
use crate::models::{ConnectionAction, PhotoKind};

fn build(base: &str, segments: &[&str], query: &[(&str, &str)]) -> Result<Url, ClientError> {
    let mut url = Url::parse(base).map_err(|e| ClientError::InvalidUrl(format!("{base}: {e}")))?;
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(format!("{base}: cannot be a base URL")))?;
        path.pop_if_empty().extend(segments);
    }
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Ok(url)
}

/// Split a static path like `/upload/cover-photo` into segments.
fn static_segments(path: &'static str) -> Vec<&'static str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

pub fn profile_url(base: &str, username: &str) -> Result<Url, ClientError> {
    build(base, &["profile"], &[("username", username)])
}

pub fn photo_upload_url(base: &str, kind: PhotoKind) -> Result<Url, ClientError> {
    build(base, &static_segments(kind.upload_path()), &[])
}

pub fn base64_upload_url(base: &str) -> Result<Url, ClientError> {
    build(base, &["api", "files", "upload-base64"], &[])
}

pub fn user_connections_url(base: &str, username: &str) -> Result<Url, ClientError> {
    build(base, &["api", "connections", "user", username], &[])
}

pub fn pending_requests_url(base: &str, username: &str) -> Result<Url, ClientError> {
    build(base, &["api", "connections", "requests"], &[("username", username)])
}

pub fn connection_action_url(base: &str, action: ConnectionAction) -> Result<Url, ClientError> {
    build(base, &["api", "connections", action.as_path()], &[])
}

pub fn disconnect_url(base: &str) -> Result<Url, ClientError> {
    build(base, &["api", "connections", "disconnect"], &[])
}

/// `t` defeats intermediary caches; callers pass the current epoch millis.
pub fn recent_messages_url(base: &str, username: &str, cache_bust_ms: i64) -> Result<Url, ClientError> {
    let t = cache_bust_ms.to_string();
    build(base, &["api", "messages", "recent"], &[("username", username), ("t", &t)])
}

pub fn mark_read_url(base: &str, message_id: i64) -> Result<Url, ClientError> {
    let id = message_id.to_string();
    build(base, &["api", "messages", "read", &id], &[])
}

pub fn user_search_url(base: &str, term: &str) -> Result<Url, ClientError> {
    build(base, &["api", "users", "search"], &[("term", term)])
}

/// Turn a backend-relative `fileUrl` (e.g. `/uploads/a.png`) into an absolute URL.
/// Already absolute URLs pass through unchanged.
#[must_use]
pub fn absolute_asset_url(base: &str, file_url: &str) -> String {
    if file_url.starts_with("http://") || file_url.starts_with("https://") {
        return file_url.to_owned();
    }
    if file_url.starts_with('/') {
        format!("{base}{file_url}")
    } else {
        format!("{base}/{file_url}")
    }
}
