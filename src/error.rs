//! Client error taxonomy.
//!
//! ERROR HANDLING
//! ==============
//! View controllers log fetch failures and keep their last-known-good state.
//! Only validation failures and failed optimistic actions reach the user as
//! text; nothing here is fatal to the process.

/// Errors produced by backend calls, session access, and client-side checks.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("request failed: {0}")]
    Transport(String),

    /// The backend answered with a non-success HTTP status.
    #[error("backend returned status {status}")]
    Status { status: u16, body: String },

    /// The response body did not match the expected shape.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// An endpoint URL could not be built from the configured base URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The operation needs a logged-in user and none is present.
    #[error("no session identity; log in first")]
    MissingSession,

    /// The action is only available on the session user's own view.
    #[error("action not available on another user's page")]
    ReadOnlyView,

    /// Client-side validation rejected the input before any request was made.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// Reading or writing the persistent session store failed.
    #[error("session store I/O failed: {0}")]
    SessionStore(#[from] std::io::Error),
}

impl ClientError {
    /// Stable code used as a structured log field.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "E_TRANSPORT",
            Self::Status { .. } => "E_STATUS",
            Self::Parse(_) => "E_PARSE",
            Self::InvalidUrl(_) => "E_INVALID_URL",
            Self::MissingSession => "E_MISSING_SESSION",
            Self::ReadOnlyView => "E_READ_ONLY_VIEW",
            Self::Validation(_) => "E_VALIDATION",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::SessionStore(_) => "E_SESSION_STORE",
        }
    }

    /// Whether the failure came from the network or the backend rather than
    /// from local input.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Status { .. } | Self::Parse(_))
    }
}

/// Input problems caught before a request is issued.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please fill in all required fields.")]
    MissingRequiredFields,
    #[error("username must not be empty")]
    EmptyUsername,
}
