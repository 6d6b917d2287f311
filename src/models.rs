//! Wire DTOs for the backend REST API.
//!
//! DESIGN
//! ======
//! Field names follow the backend's camelCase JSON. Nullable or missing
//! collections decode to empty values so a sparse profile never fails to
//! load, and unknown profile fields are carried in `extra` so a load/save
//! cycle does not drop data this client does not edit.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Username of the university's own account; its profile lives at `/university`.
pub const UNIVERSITY_USERNAME: &str = "anurag_university";
pub const UNIVERSITY_DISPLAY_NAME: &str = "Anurag University";

// =============================================================================
// PEOPLE
// =============================================================================

/// A person as shown in connection lists, request dropdowns and search results.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCard {
    pub username: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub profile_photo: Option<String>,
}

/// An established connection of some user.
pub type Connection = UserCard;
/// An inbound pending invitation to the session user.
pub type ConnectionRequest = UserCard;
/// A row of `GET /api/users/search`.
pub type UserSearchResult = UserCard;

impl UserCard {
    #[must_use]
    pub fn new(username: &str) -> Self {
        Self { username: username.to_owned(), first_name: None, last_name: None, profile_photo: None }
    }

    /// "First Last", or the username when no name is known.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        );
        let full = full.trim();
        if full.is_empty() { self.username.clone() } else { full.to_owned() }
    }

    /// Whether this card points at the university account, by username or by
    /// its full display name.
    #[must_use]
    pub fn is_university(&self) -> bool {
        if self.username == UNIVERSITY_USERNAME {
            return true;
        }
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) if !first.is_empty() && !last.is_empty() => {
                format!("{first} {last}") == UNIVERSITY_DISPLAY_NAME
            }
            _ => false,
        }
    }
}

// =============================================================================
// MESSAGES
// =============================================================================

/// Most recent message of one conversation, for badge and dropdown display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSummary {
    pub id: i64,
    pub sender: String,
    #[serde(default)]
    pub sender_name: Option<String>,
    #[serde(default)]
    pub sender_photo: Option<String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub preview: String,
    /// Backend `LocalDateTime`, e.g. `2025-03-01T12:30:00`.
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub unread: bool,
}

// =============================================================================
// CONNECTION ACTIONS
// =============================================================================

/// Response to an inbound connection request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConnectionAction {
    Accept,
    Reject,
}

impl ConnectionAction {
    /// Final path segment of `POST /api/connections/{action}`.
    #[must_use]
    pub fn as_path(self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Reject => "reject",
        }
    }
}

impl fmt::Display for ConnectionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

impl FromStr for ConnectionAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accept" => Ok(Self::Accept),
            "reject" => Ok(Self::Reject),
            other => Err(format!("unknown connection action: {other}")),
        }
    }
}

/// Body of the accept/reject/disconnect endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionBody {
    pub from_username: String,
    pub to_username: String,
}

/// Body of `POST /api/messages/read/{id}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadReceipt {
    pub username: String,
}

// =============================================================================
// UPLOADS
// =============================================================================

/// Which profile image an upload replaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhotoKind {
    Profile,
    Cover,
}

impl PhotoKind {
    /// Multipart upload endpoint path.
    #[must_use]
    pub fn upload_path(self) -> &'static str {
        match self {
            Self::Profile => "/upload/profile-photo",
            Self::Cover => "/upload/cover-photo",
        }
    }

    /// Value of the `type` field in base64 uploads.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Cover => "cover",
        }
    }
}

impl FromStr for PhotoKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "profile" => Ok(Self::Profile),
            "cover" => Ok(Self::Cover),
            other => Err(format!("unknown photo kind: {other} (expected 'profile' or 'cover')")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileUrlResponse {
    pub file_url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Base64Upload {
    pub image: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlResponse {
    pub url: String,
}

// =============================================================================
// PROFILE
// =============================================================================

/// Backend profile object as read by `GET /profile` and written by `PUT /profile`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub email: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub profile_photo: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub cover_photo: String,
    #[serde(default, deserialize_with = "deserialize_string_list")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_string_list")]
    pub professional_experiences: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_string_list")]
    pub academic_achievements: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_string_list")]
    pub interests: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub social_links: BTreeMap<String, String>,
    /// Every other backend field (major, bio, cgpa, ...), preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Any non-array decodes to an empty list; non-string items keep their JSON text.
fn deserialize_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => s,
            other => other.to_string(),
        })
        .collect())
}

#[cfg(test)]
#[path = "models_test.rs"]
mod models_test;
