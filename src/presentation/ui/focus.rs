//! Pane focus and conversation-category routing.

use std::collections::HashSet;

use crate::domain::entities::ChatKind;
use crate::domain::keybinding::Action;

/// Pane that receives non-global keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Sidebar,
    MainView,
    Input,
}

impl Focus {
    /// Next pane in the ring. The input is skipped unless it accepts text.
    #[must_use]
    pub const fn next(self, writable: bool) -> Self {
        match self {
            Self::Sidebar => Self::MainView,
            Self::MainView if writable => Self::Input,
            Self::MainView | Self::Input => Self::Sidebar,
        }
    }

    #[must_use]
    pub const fn previous(self, writable: bool) -> Self {
        match self {
            Self::Sidebar if writable => Self::Input,
            Self::Sidebar | Self::Input => Self::MainView,
            Self::MainView => Self::Sidebar,
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Sidebar => "CHATS",
            Self::MainView => "MESSAGES",
            Self::Input => "INPUT",
        }
    }
}

/// Conversation category shown in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    Users,
    Bots,
    Channels,
    Groups,
}

impl Mode {
    pub const ALL: [Self; 4] = [Self::Users, Self::Bots, Self::Channels, Self::Groups];

    #[must_use]
    pub const fn chat_kind(self) -> ChatKind {
        match self {
            Self::Users => ChatKind::User,
            Self::Bots => ChatKind::Bot,
            Self::Channels => ChatKind::Channel,
            Self::Groups => ChatKind::Group,
        }
    }

    #[must_use]
    pub const fn from_kind(kind: ChatKind) -> Self {
        match kind {
            ChatKind::User => Self::Users,
            ChatKind::Bot => Self::Bots,
            ChatKind::Channel => Self::Channels,
            ChatKind::Group => Self::Groups,
        }
    }

    #[must_use]
    pub const fn from_action(action: Action) -> Option<Self> {
        match action {
            Action::SwitchToUsers => Some(Self::Users),
            Action::SwitchToBots => Some(Self::Bots),
            Action::SwitchToChannels => Some(Self::Channels),
            Action::SwitchToGroups => Some(Self::Groups),
            _ => None,
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Users => "Users",
            Self::Bots => "Bots",
            Self::Channels => "Channels",
            Self::Groups => "Groups",
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Users => 0,
            Self::Bots => 1,
            Self::Channels => 2,
            Self::Groups => 3,
        }
    }
}

/// Tracks the focused pane, the active category and which categories have
/// been requested from the backend this session.
#[derive(Debug, Clone, Default)]
pub struct FocusRouter {
    focus: Focus,
    mode: Mode,
    requested: HashSet<Mode>,
}

impl FocusRouter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn focus(&self) -> Focus {
        self.focus
    }

    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
    }

    pub fn focus_next(&mut self, writable: bool) {
        self.focus = self.focus.next(writable);
    }

    pub fn focus_previous(&mut self, writable: bool) {
        self.focus = self.focus.previous(writable);
    }

    /// Drops focus back to the list if the input just became read-only.
    pub fn ensure_valid(&mut self, writable: bool) {
        if self.focus == Focus::Input && !writable {
            self.focus = Focus::MainView;
        }
    }

    /// Activates `mode` and focuses the list.
    ///
    /// Returns `true` the first time a category is entered, meaning its
    /// conversation list still has to be fetched.
    pub fn switch_mode(&mut self, mode: Mode) -> bool {
        self.mode = mode;
        self.focus = Focus::Sidebar;
        self.requested.insert(mode)
    }

    /// Forgets a request so the next switch fetches again.
    pub fn mark_failed(&mut self, mode: Mode) {
        self.requested.remove(&mode);
    }
}
