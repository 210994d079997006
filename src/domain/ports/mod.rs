mod auth_port;
mod messenger_port;
mod notification_feed_port;
mod notification_port;
mod session_storage_port;

pub use auth_port::AuthPort;
pub use messenger_port::{DialogList, MessengerPort, SendMediaRequest, SendTextRequest};
pub use notification_feed_port::{NotificationFeedPort, NotificationSink};
pub use notification_port::NotificationPort;
pub use session_storage_port::SessionStoragePort;

#[cfg(test)]
pub mod mocks {
    pub use super::auth_port::mock::MockAuthPort;
    pub use super::messenger_port::MockMessengerPort;
    pub use super::notification_port::mock::MockNotificationPort;
    pub use super::session_storage_port::mock::MockSessionStorage;
}
