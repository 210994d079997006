use crate::domain::entities::{ChannelInfo, FormattedMessage, Peer, UserInfo};

/// Users and chats matching a search query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchHits {
    pub users: Vec<UserInfo>,
    pub channels: Vec<ChannelInfo>,
}

impl SearchHits {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.channels.is_empty()
    }
}

/// Asynchronous event delivered to the UI.
///
/// Each value is handed to the dispatcher exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A message arrived in some conversation.
    NewMessage {
        peer: Peer,
        message: FormattedMessage,
    },
    /// A remote user started typing.
    UserTyping { peer: Peer, user_id: i64 },
    /// A user's presence changed.
    UserStatus {
        user_id: i64,
        online: bool,
        last_seen: String,
    },
    /// The backend reported a failure outside any request.
    Error { message: String },
    /// Results of a debounced search.
    SearchResult { query: String, hits: SearchHits },
}

impl Notification {
    /// Short name used in structured logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NewMessage { .. } => "new_message",
            Self::UserTyping { .. } => "user_typing",
            Self::UserStatus { .. } => "user_status",
            Self::Error { .. } => "error",
            Self::SearchResult { .. } => "search_result",
        }
    }
}
