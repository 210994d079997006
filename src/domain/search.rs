use std::fmt;

use crate::domain::entities::{ChannelInfo, ChatKind, Peer, UserInfo};
use crate::domain::notification::SearchHits;

/// One row of the search overlay.
///
/// Users, bots, groups and channels are flattened into a single list tagged
/// by the peer kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub peer: Peer,
    pub name: String,
    pub detail: Option<String>,
    pub score: i64,
}

impl SearchResult {
    #[must_use]
    pub fn new(peer: Peer, name: impl Into<String>) -> Self {
        Self {
            peer,
            name: name.into(),
            detail: None,
            score: 0,
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    #[must_use]
    pub const fn with_score(mut self, score: i64) -> Self {
        self.score = score;
        self
    }

    #[must_use]
    pub const fn kind(&self) -> ChatKind {
        self.peer.kind
    }
}

impl From<&UserInfo> for SearchResult {
    fn from(user: &UserInfo) -> Self {
        let result = Self::new(user.peer, user.name.clone());
        match &user.username {
            Some(username) => result.with_detail(format!("@{username}")),
            None => result,
        }
    }
}

impl From<&ChannelInfo> for SearchResult {
    fn from(channel: &ChannelInfo) -> Self {
        let result = Self::new(channel.peer, channel.title.clone());
        if channel.participants > 0 {
            result.with_detail(format!("{} members", channel.participants))
        } else {
            result
        }
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind(), self.name)
    }
}

/// Flattens search hits, users first, preserving backend order.
#[must_use]
pub fn flatten_hits(hits: &SearchHits) -> Vec<SearchResult> {
    hits.users
        .iter()
        .map(SearchResult::from)
        .chain(hits.channels.iter().map(SearchResult::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_tags_by_kind() {
        let hits = SearchHits {
            users: vec![
                UserInfo::new(1, 0, "ann", false).with_username("ann"),
                UserInfo::new(2, 0, "helper", true),
            ],
            channels: vec![
                ChannelInfo::channel(3, 0, "news", false).with_participants(10),
                ChannelInfo::group(4, 0, "friends"),
            ],
        };

        let results = flatten_hits(&hits);
        let kinds: Vec<_> = results.iter().map(SearchResult::kind).collect();
        assert_eq!(
            kinds,
            vec![ChatKind::User, ChatKind::Bot, ChatKind::Channel, ChatKind::Group]
        );
        assert_eq!(results[0].detail.as_deref(), Some("@ann"));
        assert_eq!(results[2].detail.as_deref(), Some("10 members"));
        assert_eq!(results[3].detail, None);
    }

    #[test]
    fn test_display() {
        let result = SearchResult::new(Peer::new(1, 0, ChatKind::Group), "friends");
        assert_eq!(result.to_string(), "[group] friends");
    }
}
