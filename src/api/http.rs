//! `reqwest`-backed implementation of [`Backend`].
//!
//! Thin HTTP wrapper: every call builds its URL in [`super::endpoints`],
//! checks the status, and decodes the body in `parse_json` so the decoding
//! rules stay testable without a server.

use std::time::Duration;

use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::Backend;
use super::endpoints;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::models::{
    Base64Upload, Connection, ConnectionAction, ConnectionBody, ConnectionRequest, FileUrlResponse, MessageSummary,
    PhotoKind, Profile, ReadReceipt, UrlResponse, UserSearchResult,
};

// =============================================================================
// CLIENT
// =============================================================================

pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Build a backend client from typed config.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::HttpClientBuild`] if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ClientError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.base_url.clone() })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        let text = send(self.http.get(url)).await?;
        parse_json(&text)
    }

    async fn post_json<B: serde::Serialize + Sync>(&self, url: Url, body: &B) -> Result<String, ClientError> {
        send(self.http.post(url).json(body)).await
    }
}

/// Send a request and return the body of a 2xx response.
async fn send(request: RequestBuilder) -> Result<String, ClientError> {
    let response = request
        .send()
        .await
        .map_err(|e| ClientError::Transport(e.to_string()))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| ClientError::Transport(e.to_string()))?;

    if !status.is_success() {
        return Err(ClientError::Status { status: status.as_u16(), body: text });
    }
    Ok(text)
}

fn cache_bust_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[async_trait::async_trait]
impl Backend for HttpBackend {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_profile(&self, username: &str) -> Result<Profile, ClientError> {
        self.get_json(endpoints::profile_url(&self.base_url, username)?).await
    }

    async fn update_profile(&self, username: &str, profile: &Profile) -> Result<(), ClientError> {
        let url = endpoints::profile_url(&self.base_url, username)?;
        send(self.http.put(url).json(profile)).await?;
        Ok(())
    }

    async fn upload_photo(&self, kind: PhotoKind, file_name: &str, bytes: Vec<u8>) -> Result<String, ClientError> {
        let url = endpoints::photo_upload_url(&self.base_url, kind)?;
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_owned());
        let form = reqwest::multipart::Form::new().part("file", part);
        let text = send(self.http.post(url).multipart(form)).await?;
        let body: FileUrlResponse = parse_json(&text)?;
        Ok(body.file_url)
    }

    async fn upload_base64(&self, image: &str, kind: PhotoKind) -> Result<String, ClientError> {
        let url = endpoints::base64_upload_url(&self.base_url)?;
        let body = Base64Upload { image: image.to_owned(), kind: kind.as_str().to_owned() };
        let text = self.post_json(url, &body).await?;
        let body: UrlResponse = parse_json(&text)?;
        Ok(body.url)
    }

    async fn fetch_connections(&self, username: &str) -> Result<Vec<Connection>, ClientError> {
        self.get_json(endpoints::user_connections_url(&self.base_url, username)?)
            .await
    }

    async fn fetch_pending_requests(&self, username: &str) -> Result<Vec<ConnectionRequest>, ClientError> {
        self.get_json(endpoints::pending_requests_url(&self.base_url, username)?)
            .await
    }

    async fn respond_to_request(
        &self,
        action: ConnectionAction,
        from_username: &str,
        to_username: &str,
    ) -> Result<(), ClientError> {
        let url = endpoints::connection_action_url(&self.base_url, action)?;
        let body = ConnectionBody { from_username: from_username.to_owned(), to_username: to_username.to_owned() };
        self.post_json(url, &body).await?;
        Ok(())
    }

    async fn disconnect(&self, from_username: &str, to_username: &str) -> Result<(), ClientError> {
        let url = endpoints::disconnect_url(&self.base_url)?;
        let body = ConnectionBody { from_username: from_username.to_owned(), to_username: to_username.to_owned() };
        self.post_json(url, &body).await?;
        Ok(())
    }

    async fn fetch_recent_messages(&self, username: &str) -> Result<Vec<MessageSummary>, ClientError> {
        let url = endpoints::recent_messages_url(&self.base_url, username, cache_bust_millis())?;
        let messages: Vec<MessageSummary> = self.get_json(url).await?;
        debug!(
            username,
            total = messages.len(),
            unread = messages.iter().filter(|m| m.unread).count(),
            "recent messages fetched"
        );
        Ok(messages)
    }

    async fn mark_message_read(&self, message_id: i64, username: &str) -> Result<(), ClientError> {
        let url = endpoints::mark_read_url(&self.base_url, message_id)?;
        self.post_json(url, &ReadReceipt { username: username.to_owned() })
            .await?;
        Ok(())
    }

    async fn search_users(&self, term: &str) -> Result<Vec<UserSearchResult>, ClientError> {
        self.get_json(endpoints::user_search_url(&self.base_url, term)?)
            .await
    }
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, ClientError> {
    serde_json::from_str(text).map_err(|e| ClientError::Parse(e.to_string()))
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;

#[cfg(test)]
#[path = "http_backend_test.rs"]
mod http_backend_test;
