use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::domain::entities::Peer;

/// How long a typing notification stays visible without a refresh.
pub const TYPING_TIMEOUT: Duration = Duration::from_secs(6);

/// Remembers who is typing where, until the notification goes stale.
#[derive(Debug)]
pub struct TypingTracker {
    typing: HashMap<Peer, HashMap<i64, Instant>>,
    timeout: Duration,
}

impl TypingTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::with_timeout(TYPING_TIMEOUT)
    }

    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            typing: HashMap::new(),
            timeout,
        }
    }

    pub fn record(&mut self, peer: Peer, user_id: i64) {
        self.record_at(peer, user_id, Instant::now());
    }

    pub fn record_at(&mut self, peer: Peer, user_id: i64, now: Instant) {
        self.typing.entry(peer).or_default().insert(user_id, now);
    }

    /// Forgets a user, e.g. once their message arrived.
    pub fn clear_user(&mut self, peer: Peer, user_id: i64) {
        if let Some(users) = self.typing.get_mut(&peer) {
            users.remove(&user_id);
            if users.is_empty() {
                self.typing.remove(&peer);
            }
        }
    }

    /// Removes stale entries and returns the peers nobody types in anymore.
    pub fn expire(&mut self) -> Vec<Peer> {
        self.expire_at(Instant::now())
    }

    pub fn expire_at(&mut self, now: Instant) -> Vec<Peer> {
        let timeout = self.timeout;
        for users in self.typing.values_mut() {
            users.retain(|_, since| now.saturating_duration_since(*since) < timeout);
        }
        let idle: Vec<Peer> = self
            .typing
            .iter()
            .filter(|(_, users)| users.is_empty())
            .map(|(peer, _)| *peer)
            .collect();
        for peer in &idle {
            self.typing.remove(peer);
        }
        idle
    }

    #[must_use]
    pub fn is_typing(&self, peer: Peer) -> bool {
        self.typing.get(&peer).is_some_and(|users| !users.is_empty())
    }

    #[must_use]
    pub fn typing_count(&self, peer: Peer) -> usize {
        self.typing.get(&peer).map_or(0, HashMap::len)
    }
}

impl Default for TypingTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the "is typing" line shown under a conversation.
#[must_use]
pub fn format_typing_indicator(names: &[&str]) -> Option<String> {
    match names {
        [] => None,
        [one] => Some(format!("{one} is typing...")),
        [a, b] => Some(format!("{a} and {b} are typing...")),
        [a, b, c] => Some(format!("{a}, {b} and {c} are typing...")),
        _ => Some("Several people are typing...".to_string()),
    }
}
