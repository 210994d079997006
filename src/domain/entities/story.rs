use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single story posted by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryItem {
    pub id: i64,
    #[serde(default)]
    pub caption: String,
    pub posted_at: DateTime<Utc>,
    #[serde(default)]
    pub expired: bool,
    #[serde(default)]
    pub media: Option<String>,
}
