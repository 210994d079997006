use serde::{Deserialize, Serialize};

/// Kind of conversation a peer represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChatKind {
    #[default]
    User,
    Bot,
    Group,
    Channel,
}

impl ChatKind {
    /// Returns the lowercase label used in logs and on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
            Self::Group => "group",
            Self::Channel => "channel",
        }
    }

    /// True for one-to-one conversations.
    #[must_use]
    pub const fn is_direct(self) -> bool {
        matches!(self, Self::User | Self::Bot)
    }
}

impl std::fmt::Display for ChatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Addressable conversation identity.
///
/// Two peers are the same conversation when id and kind match; the access
/// hash is a backend credential and does not take part in equality.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Peer {
    pub id: i64,
    pub access_hash: i64,
    pub kind: ChatKind,
}

impl Peer {
    #[must_use]
    pub const fn new(id: i64, access_hash: i64, kind: ChatKind) -> Self {
        Self {
            id,
            access_hash,
            kind,
        }
    }

    /// Key under which older history pages of this peer are cached.
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!("{}{}", self.access_hash, self.id)
    }
}

impl PartialEq for Peer {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.kind == other.kind
    }
}

impl Eq for Peer {}

impl std::hash::Hash for Peer {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.kind.hash(state);
    }
}

impl std::fmt::Display for Peer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_ignores_access_hash() {
        let a = Peer::new(42, 1, ChatKind::User);
        let b = Peer::new(42, 999, ChatKind::User);
        assert_eq!(a, b);
    }

    #[test]
    fn test_equality_respects_kind() {
        let user = Peer::new(42, 1, ChatKind::User);
        let group = Peer::new(42, 1, ChatKind::Group);
        assert_ne!(user, group);
    }

    #[test]
    fn test_cache_key_concatenates_hash_and_id() {
        let peer = Peer::new(77, 1234, ChatKind::Channel);
        assert_eq!(peer.cache_key(), "123477");
    }

    #[test]
    fn test_display() {
        assert_eq!(Peer::new(5, 0, ChatKind::Bot).to_string(), "bot:5");
    }
}
