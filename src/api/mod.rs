//! Backend REST API access.
//!
//! ARCHITECTURE
//! ============
//! Views and the optimistic mutator talk to the backend only through the
//! [`Backend`] trait so they can be driven by a mock in tests. The
//! production implementation is [`http::HttpBackend`]; URL construction lives
//! in [`endpoints`] as pure functions.

pub mod endpoints;
pub mod http;

pub use http::HttpBackend;

use crate::error::ClientError;
use crate::models::{
    Connection, ConnectionAction, ConnectionRequest, MessageSummary, PhotoKind, Profile, UserSearchResult,
};

/// Every backend call the client makes. Enables mocking in tests.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// Backend origin without trailing slash; prefixed to relative upload URLs.
    fn base_url(&self) -> &str;

    /// `GET /profile?username=`.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on transport failure, non-success status, or
    /// an undecodable body. The same applies to every method below.
    async fn fetch_profile(&self, username: &str) -> Result<Profile, ClientError>;

    /// `PUT /profile?username=`.
    async fn update_profile(&self, username: &str, profile: &Profile) -> Result<(), ClientError>;

    /// Multipart upload of a profile or cover photo; returns the relative `fileUrl`.
    async fn upload_photo(&self, kind: PhotoKind, file_name: &str, bytes: Vec<u8>) -> Result<String, ClientError>;

    /// `POST /api/files/upload-base64`; returns the stored image URL.
    async fn upload_base64(&self, image: &str, kind: PhotoKind) -> Result<String, ClientError>;

    /// `GET /api/connections/user/{username}`.
    async fn fetch_connections(&self, username: &str) -> Result<Vec<Connection>, ClientError>;

    /// `GET /api/connections/requests?username=`.
    async fn fetch_pending_requests(&self, username: &str) -> Result<Vec<ConnectionRequest>, ClientError>;

    /// `POST /api/connections/{accept|reject}` with `{fromUsername, toUsername}`.
    async fn respond_to_request(
        &self,
        action: ConnectionAction,
        from_username: &str,
        to_username: &str,
    ) -> Result<(), ClientError>;

    /// `POST /api/connections/disconnect` with `{fromUsername, toUsername}`.
    async fn disconnect(&self, from_username: &str, to_username: &str) -> Result<(), ClientError>;

    /// `GET /api/messages/recent?username=&t=`, always cache-busted.
    async fn fetch_recent_messages(&self, username: &str) -> Result<Vec<MessageSummary>, ClientError>;

    /// `POST /api/messages/read/{id}` with `{username}`.
    async fn mark_message_read(&self, message_id: i64, username: &str) -> Result<(), ClientError>;

    /// `GET /api/users/search?term=`.
    async fn search_users(&self, term: &str) -> Result<Vec<UserSearchResult>, ClientError>;
}
