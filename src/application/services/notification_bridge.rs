//! Bounded hand-off from the backend feed to the UI loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::warn;

use crate::domain::notification::Notification;
use crate::domain::ports::NotificationSink;

/// Default number of notifications buffered ahead of the UI.
pub const DEFAULT_BRIDGE_CAPACITY: usize = 256;

/// Sending half of the notification queue.
///
/// Delivery never waits: when the queue is full the incoming notification
/// is discarded and counted.
#[derive(Clone)]
pub struct NotificationBridge {
    tx: mpsc::Sender<Notification>,
    dropped: Arc<AtomicU64>,
}

impl NotificationBridge {
    /// Creates the bridge and the receiver the UI loop drains.
    #[must_use]
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Notification>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (
            Self {
                tx,
                dropped: Arc::new(AtomicU64::new(0)),
            },
            rx,
        )
    }

    /// Number of notifications discarded so far.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Queues a notification without blocking.
    pub fn push(&self, notification: Notification) -> bool {
        match self.tx.try_send(notification) {
            Ok(()) => true,
            Err(TrySendError::Full(notification)) => {
                let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                warn!(
                    kind = notification.kind(),
                    dropped, "Notification queue full, dropping notification"
                );
                false
            }
            Err(TrySendError::Closed(notification)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(
                    kind = notification.kind(),
                    "Notification queue closed, dropping notification"
                );
                false
            }
        }
    }
}

impl NotificationSink for NotificationBridge {
    fn deliver(&self, notification: Notification) -> bool {
        self.push(notification)
    }
}
