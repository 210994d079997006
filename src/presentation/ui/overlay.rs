//! Modal layers drawn above the main screen.
//!
//! An overlay owns all input while it is open. Closing it drops the overlay
//! and nothing else, so the screen underneath comes back exactly as it was.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Clear, List, ListItem, ListState, Paragraph, StatefulWidget, Widget, Wrap,
    },
};

use super::state::ChatEntry;
use super::utils::{centered_rect, sanitize, truncate};
use crate::application::services::SearchDebouncer;
use crate::domain::entities::{FormattedMessage, MessageId, Peer, StoryItem};
use crate::domain::keybinding::Action;
use crate::domain::notification::SearchHits;
use crate::domain::search::{SearchResult, flatten_hits};
use crate::infrastructure::search::FuzzyRanker;
use crate::presentation::commands::CommandRegistry;
use crate::presentation::widgets::TextInput;

/// What the dispatcher should do after an overlay consumed a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayOutcome {
    Keep,
    Close,
    /// Search text changed; the new query goes to the debouncer.
    Search(String),
    Open(ChatEntry),
    Delete {
        peer: Peer,
        message_id: MessageId,
    },
    Forward {
        from: Peer,
        to: Peer,
        message_id: MessageId,
    },
}

/// Which overlay is showing, for tests and the footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKind {
    Search,
    ConfirmDelete,
    Forward,
    Stories,
    Error,
}

#[derive(Debug, Clone)]
pub enum Overlay {
    Search(SearchOverlay),
    ConfirmDelete(ConfirmDelete),
    Forward(ForwardPicker),
    Stories(StoryViewer),
    Error(ErrorModal),
}

impl Overlay {
    #[must_use]
    pub const fn kind(&self) -> OverlayKind {
        match self {
            Self::Search(_) => OverlayKind::Search,
            Self::ConfirmDelete(_) => OverlayKind::ConfirmDelete,
            Self::Forward(_) => OverlayKind::Forward,
            Self::Stories(_) => OverlayKind::Stories,
            Self::Error(_) => OverlayKind::Error,
        }
    }

    #[must_use]
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error(ErrorModal {
            title: title.into(),
            message: message.into(),
        })
    }

    pub fn handle_key(&mut self, key: KeyEvent, registry: &CommandRegistry) -> OverlayOutcome {
        if registry
            .find_action_in(key, &[Action::Quit, Action::Cancel])
            .is_some()
        {
            return OverlayOutcome::Close;
        }

        match self {
            Self::Search(search) => search.handle_key(key),
            Self::ConfirmDelete(confirm) => confirm.handle_key(key, registry),
            Self::Forward(picker) => picker.handle_key(key),
            Self::Stories(viewer) => viewer.handle_key(key, registry),
            Self::Error(_) => match registry.find_action_in(key, &[Action::Confirm]) {
                Some(_) => OverlayOutcome::Close,
                None => OverlayOutcome::Keep,
            },
        }
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer) {
        match self {
            Self::Search(search) => search.render(area, buf),
            Self::ConfirmDelete(confirm) => confirm.render(area, buf),
            Self::Forward(picker) => picker.render(area, buf),
            Self::Stories(viewer) => viewer.render(area, buf),
            Self::Error(modal) => modal.render(area, buf),
        }
    }
}

fn popup_block(title: &str, color: Color) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(Span::styled(
            format!(" {title} "),
            Style::default().add_modifier(Modifier::BOLD),
        ))
}

fn move_selection(selected: usize, len: usize, down: bool) -> usize {
    if len == 0 {
        0
    } else if down {
        (selected + 1) % len
    } else {
        selected.checked_sub(1).unwrap_or(len - 1)
    }
}

fn render_results(results: &[SearchResult], selected: usize, area: Rect, buf: &mut Buffer) {
    let width = usize::from(area.width.saturating_sub(4));
    let items: Vec<ListItem> = results
        .iter()
        .map(|result| {
            let mut spans = vec![
                Span::styled(
                    format!("[{}] ", result.kind()),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(truncate(&sanitize(&result.name), width)),
            ];
            if let Some(detail) = &result.detail {
                spans.push(Span::styled(
                    format!("  {detail}"),
                    Style::default().fg(Color::Gray),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected((!results.is_empty()).then_some(selected));
    StatefulWidget::render(list, area, buf, &mut state);
}

/// Remote search over users and chats.
#[derive(Debug, Clone)]
pub struct SearchOverlay {
    input: TextInput,
    hits: SearchHits,
    results: Vec<SearchResult>,
    selected: usize,
}

impl Default for SearchOverlay {
    fn default() -> Self {
        let mut input = TextInput::new(" Search ").placeholder("at least 3 characters");
        input.set_focused(true);
        Self {
            input,
            hits: SearchHits::default(),
            results: Vec::new(),
            selected: 0,
        }
    }
}

impl SearchOverlay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn query(&self) -> &str {
        self.input.value()
    }

    #[must_use]
    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    fn handle_key(&mut self, key: KeyEvent) -> OverlayOutcome {
        match key.code {
            KeyCode::Up => {
                self.selected = move_selection(self.selected, self.results.len(), false);
                OverlayOutcome::Keep
            }
            KeyCode::Down => {
                self.selected = move_selection(self.selected, self.results.len(), true);
                OverlayOutcome::Keep
            }
            KeyCode::Enter => self
                .selected_entry()
                .map_or(OverlayOutcome::Keep, OverlayOutcome::Open),
            _ => {
                let before = self.input.value().to_string();
                if !self.input.handle_key(key) || self.input.value() == before {
                    return OverlayOutcome::Keep;
                }
                if !SearchDebouncer::qualifies(self.input.value()) {
                    self.hits = SearchHits::default();
                    self.results.clear();
                    self.selected = 0;
                }
                OverlayOutcome::Search(self.input.value().to_string())
            }
        }
    }

    /// Shows results for `query`. Results for text no longer in the box are
    /// dropped and `false` is returned.
    pub fn apply_results(&mut self, query: &str, hits: SearchHits) -> bool {
        if query != self.input.value() {
            return false;
        }
        self.results = FuzzyRanker::new().rank(flatten_hits(&hits), query);
        self.hits = hits;
        self.selected = 0;
        true
    }

    fn selected_entry(&self) -> Option<ChatEntry> {
        let result = self.results.get(self.selected)?;
        self.hits
            .users
            .iter()
            .find(|u| u.peer == result.peer)
            .cloned()
            .map(ChatEntry::User)
            .or_else(|| {
                self.hits
                    .channels
                    .iter()
                    .find(|c| c.peer == result.peer)
                    .cloned()
                    .map(ChatEntry::Channel)
            })
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        let popup = centered_rect(60, 60, area);
        Clear.render(popup, buf);
        let block = popup_block("Search", Color::Cyan);
        let inner = block.inner(popup);
        block.render(popup, buf);

        let [input_area, list_area, hint_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(inner);

        self.input.render(input_area, buf);

        if self.results.is_empty() {
            let text = if SearchDebouncer::qualifies(self.input.value()) {
                "No matches yet"
            } else {
                "Type to search users, bots, groups and channels"
            };
            Paragraph::new(text)
                .style(Style::default().fg(Color::DarkGray))
                .render(list_area, buf);
        } else {
            render_results(&self.results, self.selected, list_area, buf);
        }

        Line::from(" [Enter] Open  [↑↓] Move  [Esc] Close")
            .style(Style::default().fg(Color::Gray))
            .render(hint_area, buf);
    }
}

/// Yes/no prompt before a message is deleted.
#[derive(Debug, Clone)]
pub struct ConfirmDelete {
    pub peer: Peer,
    pub message: FormattedMessage,
}

impl ConfirmDelete {
    fn handle_key(&self, key: KeyEvent, registry: &CommandRegistry) -> OverlayOutcome {
        match registry.find_action_in(key, &[Action::Confirm, Action::Deny]) {
            Some(Action::Confirm) => OverlayOutcome::Delete {
                peer: self.peer,
                message_id: self.message.id(),
            },
            Some(_) => OverlayOutcome::Close,
            None => OverlayOutcome::Keep,
        }
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        let popup = centered_rect(50, 30, area);
        Clear.render(popup, buf);
        let block = popup_block("Delete message?", Color::Red);
        let inner = block.inner(popup);
        block.render(popup, buf);

        let preview = sanitize(&self.message.preview(120));
        let text = vec![
            Line::from(Span::styled(
                self.message.sender().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(preview),
            Line::default(),
            Line::from(vec![
                Span::styled(" [y] ", Style::default().fg(Color::Black).bg(Color::Red)),
                Span::raw(" Delete   "),
                Span::styled(" [n] ", Style::default().fg(Color::Black).bg(Color::Gray)),
                Span::raw(" Keep"),
            ]),
        ];
        Paragraph::new(text)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}

/// Picks the destination of a forwarded message.
#[derive(Debug, Clone)]
pub struct ForwardPicker {
    from: Peer,
    message: FormattedMessage,
    candidates: Vec<SearchResult>,
    filter: TextInput,
    visible: Vec<SearchResult>,
    selected: usize,
}

impl ForwardPicker {
    #[must_use]
    pub fn new(from: Peer, message: FormattedMessage, candidates: Vec<SearchResult>) -> Self {
        let mut filter = TextInput::new(" Forward to ").placeholder("filter");
        filter.set_focused(true);
        Self {
            from,
            message,
            visible: candidates.clone(),
            candidates,
            filter,
            selected: 0,
        }
    }

    #[must_use]
    pub fn visible(&self) -> &[SearchResult] {
        &self.visible
    }

    fn refilter(&mut self) {
        let query = self.filter.value().trim();
        self.visible = if query.is_empty() {
            self.candidates.clone()
        } else {
            let ranker = FuzzyRanker::new();
            ranker
                .rank(self.candidates.clone(), query)
                .into_iter()
                .filter(|c| c.score != i64::MIN)
                .collect()
        };
        self.selected = 0;
    }

    fn handle_key(&mut self, key: KeyEvent) -> OverlayOutcome {
        match key.code {
            KeyCode::Up => {
                self.selected = move_selection(self.selected, self.visible.len(), false);
                OverlayOutcome::Keep
            }
            KeyCode::Down => {
                self.selected = move_selection(self.selected, self.visible.len(), true);
                OverlayOutcome::Keep
            }
            KeyCode::Enter => match self.visible.get(self.selected) {
                Some(target) => OverlayOutcome::Forward {
                    from: self.from,
                    to: target.peer,
                    message_id: self.message.id(),
                },
                None => OverlayOutcome::Keep,
            },
            _ => {
                if self.filter.handle_key(key) {
                    self.refilter();
                }
                OverlayOutcome::Keep
            }
        }
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        let popup = centered_rect(60, 60, area);
        Clear.render(popup, buf);
        let block = popup_block("Forward message", Color::Yellow);
        let inner = block.inner(popup);
        block.render(popup, buf);

        let [preview_area, input_area, list_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .areas(inner);

        Line::from(Span::styled(
            truncate(
                &sanitize(&self.message.preview(200)),
                usize::from(preview_area.width),
            ),
            Style::default().fg(Color::Gray),
        ))
        .render(preview_area, buf);
        self.filter.render(input_area, buf);
        render_results(&self.visible, self.selected, list_area, buf);
    }
}

/// Pages through a user's stories.
#[derive(Debug, Clone)]
pub struct StoryViewer {
    pub peer: Peer,
    owner: String,
    items: Vec<StoryItem>,
    index: usize,
    loading: bool,
}

impl StoryViewer {
    /// Viewer waiting for its stories to arrive.
    #[must_use]
    pub fn loading(peer: Peer, owner: impl Into<String>) -> Self {
        Self {
            peer,
            owner: owner.into(),
            items: Vec::new(),
            index: 0,
            loading: true,
        }
    }

    pub fn set_items(&mut self, items: Vec<StoryItem>) {
        self.items = items;
        self.index = 0;
        self.loading = false;
    }

    #[must_use]
    pub fn current(&self) -> Option<&StoryItem> {
        self.items.get(self.index)
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    fn handle_key(&mut self, key: KeyEvent, registry: &CommandRegistry) -> OverlayOutcome {
        match registry.find_action_in(key, &[Action::NavigateLeft, Action::NavigateRight]) {
            Some(Action::NavigateLeft) => self.index = self.index.saturating_sub(1),
            Some(_) if self.index + 1 < self.items.len() => self.index += 1,
            _ => {}
        }
        OverlayOutcome::Keep
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        let popup = centered_rect(60, 50, area);
        Clear.render(popup, buf);
        let title = format!("{} · stories", self.owner);
        let block = popup_block(&title, Color::Magenta);
        let inner = block.inner(popup);
        block.render(popup, buf);

        let lines = if self.loading {
            vec![Line::from("Loading stories…")]
        } else if let Some(story) = self.current() {
            let mut lines = vec![
                Line::from(Span::styled(
                    format!(
                        "{}/{}  {}",
                        self.index + 1,
                        self.items.len(),
                        story.posted_at.format("%Y-%m-%d %H:%M")
                    ),
                    Style::default().fg(Color::DarkGray),
                )),
                Line::default(),
            ];
            if let Some(media) = &story.media {
                lines.push(Line::from(Span::styled(
                    format!("[{media}]"),
                    Style::default().fg(Color::Cyan),
                )));
            }
            if story.caption.is_empty() {
                lines.push(Line::from(Span::styled(
                    "(no caption)",
                    Style::default().fg(Color::DarkGray),
                )));
            } else {
                lines.push(Line::from(sanitize(&story.caption)));
            }
            if story.expired {
                lines.push(Line::from(Span::styled(
                    "expired",
                    Style::default().fg(Color::Red),
                )));
            }
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                "[←/→] Browse  [Esc] Close",
                Style::default().fg(Color::Gray),
            )));
            lines
        } else {
            vec![Line::from("No active stories")]
        };

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}

/// Blocking error message; any dismiss key closes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorModal {
    pub title: String,
    pub message: String,
}

impl ErrorModal {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        let popup = centered_rect(50, 25, area);
        Clear.render(popup, buf);
        let block = popup_block(&self.title, Color::Red);
        let inner = block.inner(popup);
        block.render(popup, buf);

        Paragraph::new(vec![
            Line::from(sanitize(&self.message)),
            Line::default(),
            Line::from(Span::styled(
                "[Enter/Esc] Dismiss",
                Style::default().fg(Color::Gray),
            )),
        ])
        .wrap(Wrap { trim: true })
        .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ChannelInfo, ChatKind, UserInfo};
    use chrono::Utc;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(overlay: &mut Overlay, registry: &CommandRegistry, text: &str) -> OverlayOutcome {
        let mut last = OverlayOutcome::Keep;
        for c in text.chars() {
            last = overlay.handle_key(key(KeyCode::Char(c)), registry);
        }
        last
    }

    fn message() -> FormattedMessage {
        FormattedMessage::new(42, "Ann", "hello there", false, Utc::now())
    }

    #[test]
    fn test_escape_and_quit_close_every_overlay() {
        let registry = CommandRegistry::new();
        let peer = Peer::new(1, 0, ChatKind::User);
        let overlays = [
            Overlay::Search(SearchOverlay::new()),
            Overlay::ConfirmDelete(ConfirmDelete {
                peer,
                message: message(),
            }),
            Overlay::Forward(ForwardPicker::new(peer, message(), Vec::new())),
            Overlay::Stories(StoryViewer::loading(peer, "Ann")),
            Overlay::error("Error", "boom"),
        ];

        for mut overlay in overlays {
            assert_eq!(
                overlay.clone().handle_key(key(KeyCode::Esc), &registry),
                OverlayOutcome::Close
            );
            assert_eq!(
                overlay.handle_key(
                    KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
                    &registry
                ),
                OverlayOutcome::Close
            );
        }
    }

    #[test]
    fn test_search_typing_emits_queries() {
        let registry = CommandRegistry::new();
        let mut overlay = Overlay::Search(SearchOverlay::new());

        assert_eq!(
            type_text(&mut overlay, &registry, "an"),
            OverlayOutcome::Search("an".to_string())
        );
        assert_eq!(
            type_text(&mut overlay, &registry, "n"),
            OverlayOutcome::Search("ann".to_string())
        );
        assert_eq!(
            overlay.handle_key(key(KeyCode::Left), &registry),
            OverlayOutcome::Keep
        );
    }

    #[test]
    fn test_search_results_and_open() {
        let registry = CommandRegistry::new();
        let mut search = SearchOverlay::new();
        for c in "ann".chars() {
            search.handle_key(key(KeyCode::Char(c)));
        }

        let hits = SearchHits {
            users: vec![UserInfo::new(1, 5, "Ann", false)],
            channels: vec![ChannelInfo::group(2, 6, "Annals")],
        };
        assert!(!search.apply_results("an", hits.clone()));
        assert!(search.results().is_empty());
        assert!(search.apply_results("ann", hits));
        assert_eq!(search.results().len(), 2);

        let mut overlay = Overlay::Search(search);
        let OverlayOutcome::Open(entry) = overlay.handle_key(key(KeyCode::Enter), &registry)
        else {
            panic!("expected open");
        };
        assert!(matches!(entry, ChatEntry::User(_) | ChatEntry::Channel(_)));
    }

    #[test]
    fn test_short_query_clears_results() {
        let mut search = SearchOverlay::new();
        for c in "ann".chars() {
            search.handle_key(key(KeyCode::Char(c)));
        }
        search.apply_results(
            "ann",
            SearchHits {
                users: vec![UserInfo::new(1, 5, "Ann", false)],
                channels: Vec::new(),
            },
        );
        assert_eq!(search.results().len(), 1);

        search.handle_key(key(KeyCode::Backspace));
        assert!(search.results().is_empty());
    }

    #[test]
    fn test_confirm_delete_accelerators() {
        let registry = CommandRegistry::new();
        let peer = Peer::new(1, 0, ChatKind::User);
        let mut overlay = Overlay::ConfirmDelete(ConfirmDelete {
            peer,
            message: message(),
        });

        assert_eq!(
            overlay.handle_key(key(KeyCode::Char('x')), &registry),
            OverlayOutcome::Keep
        );
        assert_eq!(
            overlay.handle_key(key(KeyCode::Char('n')), &registry),
            OverlayOutcome::Close
        );
        assert_eq!(
            overlay.handle_key(key(KeyCode::Char('y')), &registry),
            OverlayOutcome::Delete {
                peer,
                message_id: MessageId(42),
            }
        );
    }

    #[test]
    fn test_forward_picker_filters_and_targets() {
        let registry = CommandRegistry::new();
        let from = Peer::new(1, 0, ChatKind::User);
        let bob = Peer::new(2, 0, ChatKind::User);
        let news = Peer::new(3, 0, ChatKind::Channel);
        let mut overlay = Overlay::Forward(ForwardPicker::new(
            from,
            message(),
            vec![SearchResult::new(bob, "Bob"), SearchResult::new(news, "News")],
        ));

        type_text(&mut overlay, &registry, "new");
        let Overlay::Forward(picker) = &overlay else {
            unreachable!()
        };
        assert_eq!(picker.visible().len(), 1);

        assert_eq!(
            overlay.handle_key(key(KeyCode::Enter), &registry),
            OverlayOutcome::Forward {
                from,
                to: news,
                message_id: MessageId(42),
            }
        );
    }

    #[test]
    fn test_story_viewer_navigation() {
        let registry = CommandRegistry::new();
        let peer = Peer::new(1, 0, ChatKind::User);
        let mut viewer = StoryViewer::loading(peer, "Ann");
        assert!(viewer.is_loading());

        let story = |id| StoryItem {
            id,
            caption: format!("s{id}"),
            posted_at: Utc::now(),
            expired: false,
            media: None,
        };
        viewer.set_items(vec![story(1), story(2)]);
        let mut overlay = Overlay::Stories(viewer);

        overlay.handle_key(key(KeyCode::Right), &registry);
        overlay.handle_key(key(KeyCode::Right), &registry);
        let Overlay::Stories(viewer) = &overlay else {
            unreachable!()
        };
        assert_eq!(viewer.current().map(|s| s.id), Some(2));

        overlay.handle_key(key(KeyCode::Left), &registry);
        let Overlay::Stories(viewer) = &overlay else {
            unreachable!()
        };
        assert_eq!(viewer.current().map(|s| s.id), Some(1));
    }

    #[test]
    fn test_error_modal_ignores_other_keys() {
        let registry = CommandRegistry::new();
        let mut overlay = Overlay::error("Error", "boom");
        assert_eq!(
            overlay.handle_key(key(KeyCode::Char('x')), &registry),
            OverlayOutcome::Keep
        );
        assert_eq!(
            overlay.handle_key(key(KeyCode::Enter), &registry),
            OverlayOutcome::Close
        );
    }
}
