//! Messaging backend port definition.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::entities::{ChannelInfo, ChatKind, FormattedMessage, MessageId, Peer, StoryItem, UserInfo};
use crate::domain::errors::MessengerError;
use crate::domain::notification::SearchHits;

/// Sidebar list returned for one conversation category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogList {
    Users(Vec<UserInfo>),
    Channels(Vec<ChannelInfo>),
}

impl DialogList {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Users(users) => users.len(),
            Self::Channels(channels) => channels.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Request to send a plain text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendTextRequest {
    pub peer: Peer,
    pub text: String,
    pub reply_to: Option<MessageId>,
}

/// Request to upload a file with an optional caption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendMediaRequest {
    pub peer: Peer,
    pub path: PathBuf,
    pub caption: String,
    pub reply_to: Option<MessageId>,
}

/// Operations the UI needs from the messaging backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessengerPort: Send + Sync {
    /// Lists the conversations of one category.
    async fn get_dialogs(&self, kind: ChatKind) -> Result<DialogList, MessengerError>;

    /// Returns up to `limit` messages older than `offset_id`, oldest first.
    ///
    /// An empty `offset_id` requests the latest page.
    async fn get_history(
        &self,
        peer: Peer,
        limit: usize,
        offset_id: MessageId,
    ) -> Result<Vec<FormattedMessage>, MessengerError>;

    async fn send_text(&self, request: SendTextRequest) -> Result<FormattedMessage, MessengerError>;

    async fn send_media(&self, request: SendMediaRequest) -> Result<FormattedMessage, MessengerError>;

    /// Returns whether the backend applied the edit.
    async fn edit_message(
        &self,
        peer: Peer,
        message_id: MessageId,
        text: String,
    ) -> Result<bool, MessengerError>;

    async fn delete_message(&self, peer: Peer, message_id: MessageId) -> Result<(), MessengerError>;

    async fn forward_messages(
        &self,
        from: Peer,
        to: Peer,
        message_ids: Vec<MessageId>,
    ) -> Result<(), MessengerError>;

    /// Returns whether anything was marked read.
    async fn mark_read(&self, peer: Peer) -> Result<bool, MessengerError>;

    async fn set_typing(&self, peer: Peer) -> Result<(), MessengerError>;

    async fn search(&self, query: String) -> Result<SearchHits, MessengerError>;

    async fn get_stories(&self, peer: Peer) -> Result<Vec<StoryItem>, MessengerError>;
}
