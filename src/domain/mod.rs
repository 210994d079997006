//! Domain layer with core entities and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Keybinding definitions.
pub mod keybinding;
/// Asynchronous notification definitions.
pub mod notification;
/// Port definitions.
pub mod ports;
/// Search result definitions.
pub mod search;

pub use entities::{ChatKind, FormattedMessage, MessageId, Peer, SessionToken};
pub use errors::MessengerError;
pub use notification::Notification;
pub use ports::{AuthPort, MessengerPort, SessionStoragePort};
