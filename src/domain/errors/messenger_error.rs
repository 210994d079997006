//! Messaging backend error types.

use thiserror::Error;

type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failures reported by the messaging backend or the session layer.
///
/// Every variant carries a human-readable message and, when available, the
/// underlying cause.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum MessengerError {
    #[error("authentication failed: {message}")]
    Authentication {
        message: String,
        #[source]
        source: Option<Cause>,
    },

    #[error("failed to send message: {message}")]
    Send {
        message: String,
        #[source]
        source: Option<Cause>,
    },

    #[error("failed to fetch history: {message}")]
    FetchHistory {
        message: String,
        #[source]
        source: Option<Cause>,
    },

    #[error("failed to delete message: {message}")]
    Delete {
        message: String,
        #[source]
        source: Option<Cause>,
    },

    #[error("failed to edit message: {message}")]
    Edit {
        message: String,
        #[source]
        source: Option<Cause>,
    },

    #[error("failed to forward message: {message}")]
    Forward {
        message: String,
        #[source]
        source: Option<Cause>,
    },

    #[error("user not found: {message}")]
    UserNotFound {
        message: String,
        #[source]
        source: Option<Cause>,
    },

    #[error("invalid peer: {message}")]
    InvalidPeer {
        message: String,
        #[source]
        source: Option<Cause>,
    },

    #[error("session error: {message}")]
    Session {
        message: String,
        #[source]
        source: Option<Cause>,
    },

    #[error("upload failed: {message}")]
    Upload {
        message: String,
        #[source]
        source: Option<Cause>,
    },
}

macro_rules! constructors {
    ($($name:ident => $variant:ident),+ $(,)?) => {
        $(
            #[doc = concat!("Creates a `", stringify!($variant), "` error.")]
            #[must_use]
            pub fn $name(message: impl Into<String>) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: None,
                }
            }
        )+
    };
}

impl MessengerError {
    constructors! {
        authentication => Authentication,
        send => Send,
        fetch_history => FetchHistory,
        delete => Delete,
        edit => Edit,
        forward => Forward,
        user_not_found => UserNotFound,
        invalid_peer => InvalidPeer,
        session => Session,
        upload => Upload,
    }

    /// Attaches the underlying cause.
    #[must_use]
    pub fn with_source(
        mut self,
        cause: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        match &mut self {
            Self::Authentication { source, .. }
            | Self::Send { source, .. }
            | Self::FetchHistory { source, .. }
            | Self::Delete { source, .. }
            | Self::Edit { source, .. }
            | Self::Forward { source, .. }
            | Self::UserNotFound { source, .. }
            | Self::InvalidPeer { source, .. }
            | Self::Session { source, .. }
            | Self::Upload { source, .. } => *source = Some(Box::new(cause)),
        }
        self
    }

    /// Stable machine-readable code for this failure kind.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Authentication { .. } => "AUTH_FAILED",
            Self::Send { .. } => "SEND_FAILED",
            Self::FetchHistory { .. } => "FETCH_HISTORY_FAILED",
            Self::Delete { .. } => "DELETE_FAILED",
            Self::Edit { .. } => "EDIT_FAILED",
            Self::Forward { .. } => "FORWARD_FAILED",
            Self::UserNotFound { .. } => "USER_NOT_FOUND",
            Self::InvalidPeer { .. } => "INVALID_PEER",
            Self::Session { .. } => "SESSION_ERROR",
            Self::Upload { .. } => "UPLOAD_FAILED",
        }
    }

    /// The bare message without the kind prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Authentication { message, .. }
            | Self::Send { message, .. }
            | Self::FetchHistory { message, .. }
            | Self::Delete { message, .. }
            | Self::Edit { message, .. }
            | Self::Forward { message, .. }
            | Self::UserNotFound { message, .. }
            | Self::InvalidPeer { message, .. }
            | Self::Session { message, .. }
            | Self::Upload { message, .. } => message,
        }
    }
}
