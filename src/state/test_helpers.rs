//! In-memory backend and context builders shared by unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::AppContext;
use crate::api::Backend;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::models::{ConnectionAction, MessageSummary, PhotoKind, Profile, UserCard};
use crate::session::SessionContext;

pub const SESSION_USER: &str = "alice";

/// Stateful fake of the REST backend. Writes mutate the fake's tables so a
/// follow-up fetch observes them, as with the real server.
#[derive(Default)]
pub struct MockBackend {
    pub data: Mutex<MockData>,
}

#[derive(Default)]
pub struct MockData {
    pub profiles: HashMap<String, Profile>,
    pub connections: HashMap<String, Vec<UserCard>>,
    pub pending: HashMap<String, Vec<UserCard>>,
    pub messages: HashMap<String, Vec<MessageSummary>>,
    pub users: Vec<UserCard>,
    /// Operation names that fail with a 500.
    pub failing: HashSet<&'static str>,
    /// Operation names in call order.
    pub calls: Vec<String>,
    /// Sleep applied to every fetch.
    pub latency: Duration,
}

impl MockBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut MockData) -> R) -> R {
        f(&mut self.data.lock().unwrap())
    }

    pub fn fail(&self, op: &'static str) {
        self.with(|d| d.failing.insert(op));
    }

    pub fn recover(&self, op: &'static str) {
        self.with(|d| d.failing.remove(op));
    }

    pub fn calls(&self) -> Vec<String> {
        self.with(|d| d.calls.clone())
    }

    pub fn call_count(&self, op: &str) -> usize {
        self.with(|d| d.calls.iter().filter(|c| *c == op).count())
    }

    pub fn set_pending(&self, username: &str, from: &[&str]) {
        self.with(|d| d.pending.insert(username.to_owned(), from.iter().map(|u| UserCard::new(u)).collect()));
    }

    pub fn set_connections(&self, username: &str, with: &[&str]) {
        self.with(|d| d.connections.insert(username.to_owned(), with.iter().map(|u| UserCard::new(u)).collect()));
    }

    pub fn set_messages(&self, username: &str, messages: Vec<MessageSummary>) {
        self.with(|d| d.messages.insert(username.to_owned(), messages));
    }

    /// Record the call and fail if the operation is switched off.
    async fn enter(&self, op: &'static str) -> Result<(), ClientError> {
        let (failing, latency) = self.with(|d| {
            d.calls.push(op.to_owned());
            (d.failing.contains(op), d.latency)
        });
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        if failing {
            return Err(ClientError::Status { status: 500, body: format!("{op} failed") });
        }
        Ok(())
    }
}

pub fn message(id: i64, sender: &str, unread: bool) -> MessageSummary {
    MessageSummary {
        id,
        sender: sender.to_owned(),
        sender_name: None,
        sender_photo: None,
        preview: format!("hi from {sender}"),
        timestamp: None,
        unread,
    }
}

/// Context logged in as [`SESSION_USER`] with a short poll interval.
pub fn test_context(backend: Arc<MockBackend>) -> AppContext {
    let session = SessionContext::in_memory();
    session.login(SESSION_USER).unwrap();
    let config = ClientConfig { message_poll: Duration::from_millis(20), ..ClientConfig::default() };
    AppContext::new(backend, session, config)
}

fn remove_user(list: Option<&mut Vec<UserCard>>, username: &str) {
    if let Some(list) = list {
        list.retain(|u| u.username != username);
    }
}

#[async_trait::async_trait]
impl Backend for MockBackend {
    fn base_url(&self) -> &str {
        "http://backend.test"
    }

    async fn fetch_profile(&self, username: &str) -> Result<Profile, ClientError> {
        self.enter("fetch_profile").await?;
        self.with(|d| d.profiles.get(username).cloned())
            .ok_or_else(|| ClientError::Status { status: 404, body: "User not found".into() })
    }

    async fn update_profile(&self, username: &str, profile: &Profile) -> Result<(), ClientError> {
        self.enter("update_profile").await?;
        self.with(|d| d.profiles.insert(username.to_owned(), profile.clone()));
        Ok(())
    }

    async fn upload_photo(&self, kind: PhotoKind, file_name: &str, _bytes: Vec<u8>) -> Result<String, ClientError> {
        self.enter("upload_photo").await?;
        Ok(format!("/uploads/{}/{file_name}", kind.as_str()))
    }

    async fn upload_base64(&self, _image: &str, kind: PhotoKind) -> Result<String, ClientError> {
        self.enter("upload_base64").await?;
        Ok(format!("https://cdn.test/{}.png", kind.as_str()))
    }

    async fn fetch_connections(&self, username: &str) -> Result<Vec<UserCard>, ClientError> {
        self.enter("fetch_connections").await?;
        Ok(self.with(|d| d.connections.get(username).cloned().unwrap_or_default()))
    }

    async fn fetch_pending_requests(&self, username: &str) -> Result<Vec<UserCard>, ClientError> {
        self.enter("fetch_pending_requests").await?;
        Ok(self.with(|d| d.pending.get(username).cloned().unwrap_or_default()))
    }

    async fn respond_to_request(
        &self,
        action: ConnectionAction,
        from_username: &str,
        to_username: &str,
    ) -> Result<(), ClientError> {
        self.enter("respond_to_request").await?;
        self.with(|d| {
            remove_user(d.pending.get_mut(to_username), from_username);
            if action == ConnectionAction::Accept {
                d.connections.entry(to_username.to_owned()).or_default().push(UserCard::new(from_username));
                d.connections.entry(from_username.to_owned()).or_default().push(UserCard::new(to_username));
            }
        });
        Ok(())
    }

    async fn disconnect(&self, from_username: &str, to_username: &str) -> Result<(), ClientError> {
        self.enter("disconnect").await?;
        self.with(|d| {
            remove_user(d.connections.get_mut(from_username), to_username);
            remove_user(d.connections.get_mut(to_username), from_username);
        });
        Ok(())
    }

    async fn fetch_recent_messages(&self, username: &str) -> Result<Vec<MessageSummary>, ClientError> {
        self.enter("fetch_recent_messages").await?;
        Ok(self.with(|d| d.messages.get(username).cloned().unwrap_or_default()))
    }

    async fn mark_message_read(&self, message_id: i64, username: &str) -> Result<(), ClientError> {
        self.enter("mark_message_read").await?;
        self.with(|d| {
            if let Some(m) = d.messages.get_mut(username).and_then(|l| l.iter_mut().find(|m| m.id == message_id)) {
                m.unread = false;
            }
        });
        Ok(())
    }

    async fn search_users(&self, term: &str) -> Result<Vec<UserCard>, ClientError> {
        self.enter("search_users").await?;
        let term = term.to_lowercase();
        Ok(self.with(|d| d.users.iter().filter(|u| u.username.to_lowercase().contains(&term)).cloned().collect()))
    }
}
