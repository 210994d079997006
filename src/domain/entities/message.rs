use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a message within a conversation.
///
/// Zero is reserved for the empty placeholder message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct MessageId(pub i64);

impl MessageId {
    pub const EMPTY: Self = Self(0);

    /// Returns the underlying value.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for MessageId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<&str> for MessageId {
    fn from(value: &str) -> Self {
        Self(value.parse().unwrap_or(0))
    }
}

/// Extra information about who sent a message in a multi-member chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SenderDetail {
    pub user_id: i64,
    pub username: Option<String>,
    pub is_bot: bool,
}

/// A message prepared for display.
///
/// Values are never mutated after construction; edits produce a new value
/// with the same id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedMessage {
    id: MessageId,
    sender: String,
    content: String,
    is_own: bool,
    timestamp: DateTime<Utc>,
    #[serde(default)]
    reply_to: Option<Box<FormattedMessage>>,
    #[serde(default)]
    sender_detail: Option<SenderDetail>,
    #[serde(default)]
    media: Option<String>,
}

impl FormattedMessage {
    #[must_use]
    pub fn new(
        id: impl Into<MessageId>,
        sender: impl Into<String>,
        content: impl Into<String>,
        is_own: bool,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            sender: sender.into(),
            content: content.into(),
            is_own,
            timestamp,
            reply_to: None,
            sender_detail: None,
            media: None,
        }
    }

    /// The placeholder occupying unused conversation slots.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(MessageId::EMPTY, "", "", false, DateTime::<Utc>::UNIX_EPOCH)
    }

    /// Attaches the message this one replies to.
    ///
    /// Only one level is kept so reply chains never nest.
    #[must_use]
    pub fn with_reply_to(mut self, mut parent: Self) -> Self {
        parent.reply_to = None;
        self.reply_to = Some(Box::new(parent));
        self
    }

    #[must_use]
    pub fn with_sender_detail(mut self, detail: SenderDetail) -> Self {
        self.sender_detail = Some(detail);
        self
    }

    #[must_use]
    pub fn with_media(mut self, label: impl Into<String>) -> Self {
        self.media = Some(label.into());
        self
    }

    /// Returns a copy carrying new text under the same identity.
    #[must_use]
    pub fn with_content(&self, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..self.clone()
        }
    }

    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    #[must_use]
    pub fn sender(&self) -> &str {
        &self.sender
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub const fn is_own(&self) -> bool {
        self.is_own
    }

    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    #[must_use]
    pub fn reply_to(&self) -> Option<&Self> {
        self.reply_to.as_deref()
    }

    #[must_use]
    pub const fn sender_detail(&self) -> Option<&SenderDetail> {
        self.sender_detail.as_ref()
    }

    #[must_use]
    pub fn media(&self) -> Option<&str> {
        self.media.as_deref()
    }

    /// True for the placeholder that pads the conversation window.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.id.is_empty()
    }

    /// Formats the timestamp in local time.
    #[must_use]
    pub fn format_timestamp(&self, format: &str) -> String {
        self.timestamp.with_timezone(&Local).format(format).to_string()
    }

    /// Single-line preview used in confirmations and notifications.
    #[must_use]
    pub fn preview(&self, max_chars: usize) -> String {
        let text = if self.content.is_empty() {
            self.media.as_deref().unwrap_or_default()
        } else {
            self.content.as_str()
        };
        let line = text.lines().next().unwrap_or_default();
        if line.chars().count() > max_chars {
            let cut: String = line.chars().take(max_chars.saturating_sub(1)).collect();
            format!("{cut}…")
        } else {
            line.to_string()
        }
    }
}

impl Default for FormattedMessage {
    fn default() -> Self {
        Self::empty()
    }
}
