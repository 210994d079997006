//! Push notification source port definition.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::errors::MessengerError;
use crate::domain::notification::Notification;

/// Receiver side of pushed notifications.
pub trait NotificationSink: Send + Sync {
    /// Hands one notification over without blocking.
    ///
    /// Returns `false` when the notification was discarded.
    fn deliver(&self, notification: Notification) -> bool;
}

/// Long-lived source of backend-pushed events.
#[async_trait]
pub trait NotificationFeedPort: Send + Sync {
    /// Streams notifications into `sink` until the connection ends.
    async fn run(&self, sink: Arc<dyn NotificationSink>) -> Result<(), MessengerError>;
}
