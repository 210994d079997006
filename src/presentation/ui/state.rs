//! Everything the screen shows, owned by the dispatcher.

use std::path::PathBuf;

use super::focus::{Focus, FocusRouter, Mode};
use super::overlay::{Overlay, OverlayKind};
use crate::application::services::{ConversationBuffer, TypingTracker};
use crate::domain::entities::{ChannelInfo, FormattedMessage, MessageId, Peer, UserInfo};
use crate::domain::search::SearchResult;
use crate::infrastructure::config::AppConfig;
use crate::presentation::commands::CommandRegistry;
use crate::presentation::widgets::{FileExplorerComponent, TextInput};

/// A sidebar row: a direct chat or a group/channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEntry {
    User(UserInfo),
    Channel(ChannelInfo),
}

impl ChatEntry {
    #[must_use]
    pub const fn peer(&self) -> Peer {
        match self {
            Self::User(user) => user.peer,
            Self::Channel(channel) => channel.peer,
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::User(user) => &user.name,
            Self::Channel(channel) => &channel.title,
        }
    }

    #[must_use]
    pub const fn unread(&self) -> u32 {
        match self {
            Self::User(user) => user.unread,
            Self::Channel(channel) => channel.unread,
        }
    }

    pub fn set_unread(&mut self, unread: u32) {
        match self {
            Self::User(user) => user.unread = unread,
            Self::Channel(channel) => channel.unread = unread,
        }
    }

    #[must_use]
    pub const fn is_writable(&self) -> bool {
        match self {
            Self::User(_) => true,
            Self::Channel(channel) => channel.is_writable(),
        }
    }
}

impl From<&ChatEntry> for SearchResult {
    fn from(entry: &ChatEntry) -> Self {
        match entry {
            ChatEntry::User(user) => Self::from(user),
            ChatEntry::Channel(channel) => Self::from(channel),
        }
    }
}

/// Toggles read from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub show_typing: bool,
    pub notifications_enabled: bool,
    pub notification_preview: bool,
    pub timestamp_format: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_typing: true,
            notifications_enabled: true,
            notification_preview: true,
            timestamp_format: "%H:%M".to_string(),
        }
    }
}

impl From<&AppConfig> for Settings {
    fn from(config: &AppConfig) -> Self {
        Self {
            show_typing: config.ui.show_typing,
            notifications_enabled: config.notifications.enabled,
            notification_preview: config.notifications.show_preview,
            timestamp_format: config.ui.timestamp_format.clone(),
        }
    }
}

/// At most one reply or edit waits for the next submit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PendingAction {
    #[default]
    None,
    Reply {
        message: FormattedMessage,
    },
    Edit {
        index: usize,
        message_id: MessageId,
    },
}

/// What the compositor draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    Main,
    Overlay(OverlayKind),
}

/// Sidebar lists, one per category, with their cursors.
#[derive(Debug, Clone, Default)]
pub struct Sidebar {
    pub users: Vec<UserInfo>,
    pub bots: Vec<UserInfo>,
    pub channels: Vec<ChannelInfo>,
    pub groups: Vec<ChannelInfo>,
    cursors: [usize; 4],
}

impl Sidebar {
    #[must_use]
    pub fn len(&self, mode: Mode) -> usize {
        match mode {
            Mode::Users => self.users.len(),
            Mode::Bots => self.bots.len(),
            Mode::Channels => self.channels.len(),
            Mode::Groups => self.groups.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self, mode: Mode) -> bool {
        self.len(mode) == 0
    }

    #[must_use]
    pub const fn cursor(&self, mode: Mode) -> usize {
        self.cursors[mode.index()]
    }

    pub fn set_cursor(&mut self, mode: Mode, cursor: usize) {
        let len = self.len(mode);
        self.cursors[mode.index()] = cursor.min(len.saturating_sub(1));
    }

    #[must_use]
    pub fn entry(&self, mode: Mode, index: usize) -> Option<ChatEntry> {
        match mode {
            Mode::Users => self.users.get(index).cloned().map(ChatEntry::User),
            Mode::Bots => self.bots.get(index).cloned().map(ChatEntry::User),
            Mode::Channels => self.channels.get(index).cloned().map(ChatEntry::Channel),
            Mode::Groups => self.groups.get(index).cloned().map(ChatEntry::Channel),
        }
    }

    #[must_use]
    pub fn selected(&self, mode: Mode) -> Option<ChatEntry> {
        self.entry(mode, self.cursor(mode))
    }

    /// Every entry across categories, for the forward picker.
    #[must_use]
    pub fn all_entries(&self) -> Vec<ChatEntry> {
        Mode::ALL
            .iter()
            .flat_map(|mode| (0..self.len(*mode)).filter_map(|i| self.entry(*mode, i)))
            .collect()
    }

    #[must_use]
    pub fn position(&self, peer: Peer) -> Option<usize> {
        match Mode::from_kind(peer.kind) {
            Mode::Users => self.users.iter().position(|u| u.peer == peer),
            Mode::Bots => self.bots.iter().position(|u| u.peer == peer),
            Mode::Channels => self.channels.iter().position(|c| c.peer == peer),
            Mode::Groups => self.groups.iter().position(|c| c.peer == peer),
        }
    }

    /// Adds `entry` at the top of its category unless already listed.
    pub fn insert(&mut self, entry: ChatEntry) {
        if self.position(entry.peer()).is_some() {
            return;
        }
        let mode = Mode::from_kind(entry.peer().kind);
        match (mode, entry) {
            (Mode::Users, ChatEntry::User(user)) => self.users.insert(0, user),
            (Mode::Bots, ChatEntry::User(user)) => self.bots.insert(0, user),
            (Mode::Channels, ChatEntry::Channel(channel)) => self.channels.insert(0, channel),
            (Mode::Groups, ChatEntry::Channel(channel)) => self.groups.insert(0, channel),
            _ => {}
        }
    }

    /// Applies `f` to the unread counter of the entry for `peer`.
    pub fn update_unread(&mut self, peer: Peer, f: impl FnOnce(u32) -> u32) -> bool {
        let Some(index) = self.position(peer) else {
            return false;
        };
        let unread = match Mode::from_kind(peer.kind) {
            Mode::Users => &mut self.users[index].unread,
            Mode::Bots => &mut self.bots[index].unread,
            Mode::Channels => &mut self.channels[index].unread,
            Mode::Groups => &mut self.groups[index].unread,
        };
        *unread = f(*unread);
        true
    }

    /// Direct-chat entries for `user_id`, in users and bots.
    pub fn users_with_id(&mut self, user_id: i64) -> impl Iterator<Item = &mut UserInfo> {
        self.users
            .iter_mut()
            .chain(self.bots.iter_mut())
            .filter(move |u| u.peer.id == user_id)
    }
}

/// State of the main screen.
pub struct UiState {
    pub router: FocusRouter,
    pub sidebar: Sidebar,
    /// Detail record of the open conversation.
    pub active: Option<ChatEntry>,
    pub buffer: ConversationBuffer,
    pub message_cursor: Option<usize>,
    pub pending: PendingAction,
    pub input: TextInput,
    pub attachment: Option<PathBuf>,
    pub file_picker: Option<FileExplorerComponent>,
    pub uploading: Option<String>,
    pub overlay: Option<Overlay>,
    /// A sidebar list fetch is in flight.
    pub loading_dialogs: bool,
    /// The latest history page of the open conversation is on its way.
    pub loading: bool,
    pub loading_older: bool,
    /// The user scrolled back past the live window.
    pub viewing_history: bool,
    /// The backend returned an empty older page.
    pub history_exhausted: bool,
    pub typing: TypingTracker,
    pub settings: Settings,
    pub size: (u16, u16),
    pub should_quit: bool,
    pub registry: CommandRegistry,
}

impl Default for UiState {
    fn default() -> Self {
        Self::new(Settings::default(), CommandRegistry::default())
    }
}

impl UiState {
    #[must_use]
    pub fn new(settings: Settings, registry: CommandRegistry) -> Self {
        Self {
            router: FocusRouter::new(),
            sidebar: Sidebar::default(),
            active: None,
            buffer: ConversationBuffer::new(),
            message_cursor: None,
            pending: PendingAction::None,
            input: TextInput::new(" Message ").placeholder("Select a conversation"),
            attachment: None,
            file_picker: None,
            uploading: None,
            overlay: None,
            loading_dialogs: false,
            loading: false,
            loading_older: false,
            viewing_history: false,
            history_exhausted: false,
            typing: TypingTracker::new(),
            settings,
            size: (0, 0),
            should_quit: false,
            registry,
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            Settings::from(config),
            CommandRegistry::with_overrides(&config.keybindings),
        )
    }

    #[must_use]
    pub const fn focus(&self) -> Focus {
        self.router.focus()
    }

    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.router.mode()
    }

    #[must_use]
    pub fn active_peer(&self) -> Option<Peer> {
        self.active.as_ref().map(ChatEntry::peer)
    }

    /// Whether the input accepts text.
    ///
    /// The open conversation decides, whatever category the sidebar shows.
    /// With nothing open only the channel list is read-only.
    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.active
            .as_ref()
            .map_or(self.mode() != Mode::Channels, ChatEntry::is_writable)
    }

    #[must_use]
    pub fn render_state(&self) -> RenderState {
        self.overlay
            .as_ref()
            .map_or(RenderState::Main, |overlay| RenderState::Overlay(overlay.kind()))
    }

    #[must_use]
    pub fn selected_message(&self) -> Option<(usize, &FormattedMessage)> {
        let index = self.message_cursor?;
        self.buffer
            .get(index)
            .filter(|m| !m.is_empty())
            .map(|m| (index, m))
    }

    /// Keeps the message cursor on real content.
    pub fn clamp_message_cursor(&mut self) {
        let (Some(first), Some(last)) = (self.buffer.first_real_index(), self.buffer.last_real_index())
        else {
            self.message_cursor = None;
            return;
        };
        self.message_cursor = Some(self.message_cursor.map_or(last, |c| c.clamp(first, last)));
    }

    /// Whether the cursor sits on the newest message.
    #[must_use]
    pub fn cursor_at_latest(&self) -> bool {
        self.message_cursor.is_none() || self.message_cursor == self.buffer.last_real_index()
    }

    /// Syncs the input's title and focus highlight.
    pub fn refresh_input_chrome(&mut self) {
        let label = match (&self.pending, &self.attachment) {
            (PendingAction::Edit { .. }, _) => " Editing (Esc to cancel) ".to_string(),
            (PendingAction::Reply { message }, _) => {
                format!(" Reply to {} (Esc to cancel) ", message.sender())
            }
            (PendingAction::None, Some(path)) => {
                let name = path
                    .file_name()
                    .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
                format!(" Attached: {name} (Ctrl+X to drop) ")
            }
            (PendingAction::None, None) if self.is_writable() => " Message ".to_string(),
            (PendingAction::None, None) => " Read-only ".to_string(),
        };
        self.input.set_label(label);
        self.input.set_focused(self.focus() == Focus::Input);
    }
}
