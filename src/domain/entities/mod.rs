//! Domain entity definitions.

mod channel;
mod message;
mod peer;
mod story;
mod token;
mod user;

pub use channel::ChannelInfo;
pub use message::{FormattedMessage, MessageId, SenderDetail};
pub use peer::{ChatKind, Peer};
pub use story::StoryItem;
pub use token::SessionToken;
pub use user::UserInfo;
