use crossterm::event::KeyEvent;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Quit,

    // Global
    SwitchToUsers,
    SwitchToBots,
    SwitchToChannels,
    SwitchToGroups,
    ToggleAttachmentPicker,
    OpenSearch,
    FocusNext,
    FocusPrevious,

    // Navigation
    NavigateUp,
    NavigateDown,
    NavigateLeft,
    NavigateRight,
    Select,
    SelectFirst,
    SelectLast,

    // Conversation list
    OpenStories,

    // Message list
    LoadOlder,
    Reply,
    EditMessage,
    DeleteMessage,
    ForwardMessage,

    // Input
    SendMessage,
    ClearAttachment,
    Cancel,

    // Overlays
    Confirm,
    Deny,
    ToggleHidden,
}

impl Action {
    /// Actions resolved before any focused component sees the key.
    pub const GLOBAL: [Self; 9] = [
        Self::Quit,
        Self::SwitchToUsers,
        Self::SwitchToBots,
        Self::SwitchToChannels,
        Self::SwitchToGroups,
        Self::ToggleAttachmentPicker,
        Self::OpenSearch,
        Self::FocusNext,
        Self::FocusPrevious,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Quit => "Quit",
            Self::SwitchToUsers => "Users",
            Self::SwitchToBots => "Bots",
            Self::SwitchToChannels => "Channels",
            Self::SwitchToGroups => "Groups",
            Self::ToggleAttachmentPicker => "Attach",
            Self::OpenSearch => "Search",
            Self::FocusNext => "Next pane",
            Self::FocusPrevious => "Prev pane",
            Self::NavigateUp => "Up",
            Self::NavigateDown => "Down",
            Self::NavigateLeft => "Left",
            Self::NavigateRight => "Right",
            Self::Select => "Open",
            Self::SelectFirst => "First",
            Self::SelectLast => "Last",
            Self::OpenStories => "Stories",
            Self::LoadOlder => "Older",
            Self::Reply => "Reply",
            Self::EditMessage => "Edit",
            Self::DeleteMessage => "Delete",
            Self::ForwardMessage => "Forward",
            Self::SendMessage => "Send",
            Self::ClearAttachment => "Drop file",
            Self::Cancel => "Cancel",
            Self::Confirm => "Yes",
            Self::Deny => "No",
            Self::ToggleHidden => "Hidden files",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keybind {
    pub key: KeyEvent,
    pub action: Action,
    pub label: Cow<'static, str>,
}

impl Keybind {
    pub fn new(key: KeyEvent, action: Action, label: impl Into<Cow<'static, str>>) -> Self {
        Self {
            key,
            action,
            label: label.into(),
        }
    }
}
