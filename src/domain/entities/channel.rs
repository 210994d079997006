use serde::{Deserialize, Serialize};

use super::{ChatKind, Peer};

/// A group chat or broadcast channel as shown in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub title: String,
    #[serde(default)]
    pub creator: bool,
    #[serde(default)]
    pub broadcast: bool,
    #[serde(default)]
    pub participants: u32,
    #[serde(default)]
    pub unread: u32,
    pub peer: Peer,
}

impl ChannelInfo {
    /// Creates a broadcast channel entry.
    #[must_use]
    pub fn channel(id: i64, access_hash: i64, title: impl Into<String>, creator: bool) -> Self {
        Self {
            title: title.into(),
            creator,
            broadcast: true,
            participants: 0,
            unread: 0,
            peer: Peer::new(id, access_hash, ChatKind::Channel),
        }
    }

    /// Creates a group entry.
    #[must_use]
    pub fn group(id: i64, access_hash: i64, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            creator: false,
            broadcast: false,
            participants: 0,
            unread: 0,
            peer: Peer::new(id, access_hash, ChatKind::Group),
        }
    }

    #[must_use]
    pub const fn with_participants(mut self, participants: u32) -> Self {
        self.participants = participants;
        self
    }

    #[must_use]
    pub const fn with_unread(mut self, unread: u32) -> Self {
        self.unread = unread;
        self
    }

    /// Whether the viewer may post here.
    ///
    /// Broadcast channels only accept posts from their creator.
    #[must_use]
    pub const fn is_writable(&self) -> bool {
        !self.broadcast || self.creator
    }
}
