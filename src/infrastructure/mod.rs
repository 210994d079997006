/// Messaging backend adapters.
pub mod backend;
/// Application configuration.
pub mod config;
/// Desktop notifications.
pub mod notifications;
/// Search result ranking.
pub mod search;
/// Secure session storage.
pub mod storage;

pub use backend::{HttpMessengerClient, WebSocketNotificationFeed};
pub use notifications::DesktopNotificationService;
pub use storage::KeyringSessionStorage;
