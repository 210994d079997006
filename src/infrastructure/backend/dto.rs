//! Wire types of the backend bridge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{ChannelInfo, FormattedMessage, MessageId, Peer, SenderDetail, UserInfo};
use crate::domain::notification::{Notification, SearchHits};

#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageDto {
    pub id: i64,
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub out: bool,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub reply_to: Option<Box<MessageDto>>,
    #[serde(default)]
    pub sender_id: Option<i64>,
    #[serde(default)]
    pub sender_username: Option<String>,
    #[serde(default)]
    pub sender_is_bot: bool,
    #[serde(default)]
    pub media: Option<String>,
}

impl From<MessageDto> for FormattedMessage {
    fn from(dto: MessageDto) -> Self {
        let mut message = Self::new(dto.id, dto.sender, dto.content, dto.out, dto.date);
        if let Some(parent) = dto.reply_to {
            message = message.with_reply_to(Self::from(*parent));
        }
        if let Some(user_id) = dto.sender_id {
            message = message.with_sender_detail(SenderDetail {
                user_id,
                username: dto.sender_username,
                is_bot: dto.sender_is_bot,
            });
        }
        if let Some(media) = dto.media {
            message = message.with_media(media);
        }
        message
    }
}

#[derive(Debug, Deserialize)]
pub struct HistoryResponse {
    pub messages: Vec<MessageDto>,
}

#[derive(Debug, Deserialize)]
pub struct SentResponse {
    pub message: MessageDto,
}

#[derive(Debug, Deserialize)]
pub struct UsersResponse {
    pub users: Vec<UserInfo>,
}

#[derive(Debug, Deserialize)]
pub struct ChannelsResponse {
    pub channels: Vec<ChannelInfo>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub users: Vec<UserInfo>,
    #[serde(default)]
    pub channels: Vec<ChannelInfo>,
}

impl From<SearchResponse> for SearchHits {
    fn from(response: SearchResponse) -> Self {
        Self {
            users: response.users,
            channels: response.channels,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AccountResponse {
    pub user: UserInfo,
}

#[derive(Debug, Deserialize)]
pub struct FlagResponse {
    pub ok: bool,
}

#[derive(Debug, Serialize)]
pub struct SendTextBody<'a> {
    pub peer: &'a Peer,
    pub text: &'a str,
    pub reply_to: Option<MessageId>,
    pub random_id: String,
}

#[derive(Debug, Serialize)]
pub struct EditBody<'a> {
    pub peer: &'a Peer,
    pub message_id: MessageId,
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
pub struct DeleteBody<'a> {
    pub peer: &'a Peer,
    pub message_ids: [MessageId; 1],
}

#[derive(Debug, Serialize)]
pub struct ForwardBody<'a> {
    pub from: &'a Peer,
    pub to: &'a Peer,
    pub message_ids: &'a [MessageId],
    pub random_id: String,
}

#[derive(Debug, Serialize)]
pub struct PeerBody<'a> {
    pub peer: &'a Peer,
}

/// Event pushed over the feed socket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedEvent {
    NewMessage {
        peer: Peer,
        message: MessageDto,
    },
    UserTyping {
        peer: Peer,
        user_id: i64,
    },
    UserStatus {
        user_id: i64,
        #[serde(default)]
        online: bool,
        #[serde(default)]
        last_seen: String,
    },
    Error {
        message: String,
    },
}

impl From<FeedEvent> for Notification {
    fn from(event: FeedEvent) -> Self {
        match event {
            FeedEvent::NewMessage { peer, message } => Self::NewMessage {
                peer,
                message: message.into(),
            },
            FeedEvent::UserTyping { peer, user_id } => Self::UserTyping { peer, user_id },
            FeedEvent::UserStatus {
                user_id,
                online,
                last_seen,
            } => Self::UserStatus {
                user_id,
                online,
                last_seen,
            },
            FeedEvent::Error { message } => Self::Error { message },
        }
    }
}
