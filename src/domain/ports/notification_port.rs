/// Port for desktop notifications.
pub trait NotificationPort: Send + Sync {
    /// Shows a desktop notification.
    fn send(&self, title: &str, body: &str);
}
