use serde::{Deserialize, Serialize};

use super::{ChatKind, Peer};

/// A direct-chat counterpart (person or bot) as shown in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub name: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub unread: u32,
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub typing: bool,
    #[serde(default)]
    pub last_seen: String,
    pub peer: Peer,
}

impl UserInfo {
    #[must_use]
    pub fn new(id: i64, access_hash: i64, name: impl Into<String>, is_bot: bool) -> Self {
        let kind = if is_bot { ChatKind::Bot } else { ChatKind::User };
        Self {
            name: name.into(),
            username: None,
            is_bot,
            unread: 0,
            online: false,
            typing: false,
            last_seen: String::new(),
            peer: Peer::new(id, access_hash, kind),
        }
    }

    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    #[must_use]
    pub const fn with_unread(mut self, unread: u32) -> Self {
        self.unread = unread;
        self
    }

    /// Returns the secondary status line for the sidebar.
    #[must_use]
    pub fn status_line(&self) -> String {
        if self.typing {
            "typing…".to_string()
        } else if self.is_bot {
            "bot".to_string()
        } else if self.online {
            "online".to_string()
        } else if self.last_seen.is_empty() {
            String::new()
        } else {
            format!("last seen {}", self.last_seen)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bot_peer_kind() {
        let bot = UserInfo::new(1, 2, "helper", true);
        assert_eq!(bot.peer.kind, ChatKind::Bot);
        let user = UserInfo::new(1, 2, "ann", false);
        assert_eq!(user.peer.kind, ChatKind::User);
    }

    #[test]
    fn test_status_line_precedence() {
        let mut user = UserInfo::new(1, 2, "ann", false);
        assert_eq!(user.status_line(), "");
        user.last_seen = "yesterday".to_string();
        assert_eq!(user.status_line(), "last seen yesterday");
        user.online = true;
        assert_eq!(user.status_line(), "online");
        user.typing = true;
        assert_eq!(user.status_line(), "typing…");
    }
}
