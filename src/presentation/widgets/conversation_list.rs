use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, StatefulWidget, Widget},
};

use crate::presentation::ui::utils::{sanitize, unread_badge};
use crate::presentation::ui::{ChatEntry, Mode, Sidebar};

pub struct ConversationListStyle {
    pub border: Style,
    pub border_focused: Style,
    pub name: Style,
    pub unread: Style,
    pub online: Style,
    pub offline: Style,
    pub typing: Style,
    pub highlight: Style,
    pub hint: Style,
}

impl Default for ConversationListStyle {
    fn default() -> Self {
        Self {
            border: Style::default().fg(Color::DarkGray),
            border_focused: Style::default().fg(Color::Cyan),
            name: Style::default(),
            unread: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            online: Style::default().fg(Color::Green),
            offline: Style::default().fg(Color::DarkGray),
            typing: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
            highlight: Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
            hint: Style::default().fg(Color::DarkGray),
        }
    }
}

/// Sidebar list of the conversations in one category.
pub struct ConversationList<'a> {
    sidebar: &'a Sidebar,
    mode: Mode,
    active: Option<&'a ChatEntry>,
    focused: bool,
    loading: bool,
    style: ConversationListStyle,
}

impl<'a> ConversationList<'a> {
    #[must_use]
    pub fn new(sidebar: &'a Sidebar, mode: Mode) -> Self {
        Self {
            sidebar,
            mode,
            active: None,
            focused: false,
            loading: false,
            style: ConversationListStyle::default(),
        }
    }

    /// Marks the open conversation.
    #[must_use]
    pub const fn active(mut self, active: Option<&'a ChatEntry>) -> Self {
        self.active = active;
        self
    }

    #[must_use]
    pub const fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    #[must_use]
    pub const fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    #[must_use]
    pub const fn style(mut self, style: ConversationListStyle) -> Self {
        self.style = style;
        self
    }

    fn row(&self, entry: &ChatEntry) -> ListItem<'static> {
        let is_active = self
            .active
            .is_some_and(|active| active.peer() == entry.peer());
        let mut spans = Vec::new();

        match entry {
            ChatEntry::User(user) => {
                let (dot, style) = if user.online {
                    ("● ", self.style.online)
                } else {
                    ("○ ", self.style.offline)
                };
                spans.push(Span::styled(dot, style));
            }
            ChatEntry::Channel(channel) => {
                let marker = if channel.broadcast { "# " } else { "@ " };
                spans.push(Span::styled(marker, self.style.offline));
            }
        }

        let name_style = if is_active {
            self.style.name.add_modifier(Modifier::UNDERLINED)
        } else {
            self.style.name
        };
        spans.push(Span::styled(sanitize(entry.title()), name_style));

        if let Some(badge) = unread_badge(entry.unread()) {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(badge, self.style.unread));
        }
        if matches!(entry, ChatEntry::User(user) if user.typing) {
            spans.push(Span::styled(" typing…", self.style.typing));
        }

        ListItem::new(Line::from(spans))
    }
}

impl Widget for ConversationList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let count = self.sidebar.len(self.mode);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ({count}) ", self.mode.title()))
            .border_style(if self.focused {
                self.style.border_focused
            } else {
                self.style.border
            });

        if count == 0 {
            let text = if self.loading { "Loading…" } else { "Nothing here yet" };
            let inner = block.inner(area);
            block.render(area, buf);
            Line::from(Span::styled(text, self.style.hint)).render(inner, buf);
            return;
        }

        let items: Vec<ListItem> = (0..count)
            .filter_map(|index| self.sidebar.entry(self.mode, index))
            .map(|entry| self.row(&entry))
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(self.style.highlight)
            .highlight_symbol("▌");
        let mut state = ListState::default().with_selected(Some(self.sidebar.cursor(self.mode)));
        StatefulWidget::render(list, area, buf, &mut state);
    }
}
