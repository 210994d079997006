//! Desktop notifications.

use notify_rust::Notification;

use crate::domain::ports::NotificationPort;

/// Shows notifications through the desktop notification daemon.
#[derive(Debug, Clone, Default)]
pub struct DesktopNotificationService {
    enabled: bool,
}

impl DesktopNotificationService {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl NotificationPort for DesktopNotificationService {
    fn send(&self, title: &str, body: &str) {
        if !self.enabled {
            return;
        }

        let title = title.to_string();
        let body = body.to_string();

        tokio::task::spawn_blocking(move || {
            if let Err(e) = Notification::new()
                .summary(&title)
                .body(&body)
                .appname("termgram")
                .show()
            {
                tracing::warn!(error = %e, "Failed to show notification");
            }
        });
    }
}
