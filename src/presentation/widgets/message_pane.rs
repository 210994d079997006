//! Message pane widget for the open conversation.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthChar;

use crate::application::services::ConversationBuffer;
use crate::domain::entities::FormattedMessage;
use crate::presentation::ui::utils::{sanitize, sender_color, truncate};

const REPLY_PREVIEW_CHARS: usize = 60;

pub struct MessagePaneStyle {
    pub border: Style,
    pub border_focused: Style,
    pub timestamp: Style,
    pub own_sender: Style,
    pub content: Style,
    pub reply: Style,
    pub media: Style,
    pub selected: Style,
    pub hint: Style,
    pub typing: Style,
}

impl Default for MessagePaneStyle {
    fn default() -> Self {
        Self {
            border: Style::default().fg(Color::DarkGray),
            border_focused: Style::default().fg(Color::Cyan),
            timestamp: Style::default().fg(Color::DarkGray),
            own_sender: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            content: Style::default(),
            reply: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
            media: Style::default().fg(Color::Magenta),
            selected: Style::default().bg(Color::Rgb(40, 44, 52)),
            hint: Style::default().fg(Color::DarkGray),
            typing: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        }
    }
}

/// Renders the conversation window, keeping the selected message in view.
pub struct MessagePane<'a> {
    buffer: &'a ConversationBuffer,
    title: Option<&'a str>,
    cursor: Option<usize>,
    timestamp_format: &'a str,
    typing: Option<String>,
    focused: bool,
    loading: bool,
    loading_older: bool,
    exhausted: bool,
    viewing_history: bool,
    style: MessagePaneStyle,
}

impl<'a> MessagePane<'a> {
    #[must_use]
    pub fn new(buffer: &'a ConversationBuffer) -> Self {
        Self {
            buffer,
            title: None,
            cursor: None,
            timestamp_format: "%H:%M",
            typing: None,
            focused: false,
            loading: false,
            loading_older: false,
            exhausted: false,
            viewing_history: false,
            style: MessagePaneStyle::default(),
        }
    }

    #[must_use]
    pub const fn title(mut self, title: Option<&'a str>) -> Self {
        self.title = title;
        self
    }

    #[must_use]
    pub const fn cursor(mut self, cursor: Option<usize>) -> Self {
        self.cursor = cursor;
        self
    }

    #[must_use]
    pub const fn timestamp_format(mut self, format: &'a str) -> Self {
        self.timestamp_format = format;
        self
    }

    #[must_use]
    pub fn typing(mut self, indicator: Option<String>) -> Self {
        self.typing = indicator;
        self
    }

    #[must_use]
    pub const fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    #[must_use]
    pub const fn loading(mut self, loading: bool, loading_older: bool) -> Self {
        self.loading = loading;
        self.loading_older = loading_older;
        self
    }

    #[must_use]
    pub const fn history(mut self, exhausted: bool, viewing_history: bool) -> Self {
        self.exhausted = exhausted;
        self.viewing_history = viewing_history;
        self
    }

    #[must_use]
    pub const fn style(mut self, style: MessagePaneStyle) -> Self {
        self.style = style;
        self
    }

    fn message_lines(&self, message: &FormattedMessage, width: usize) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        if let Some(parent) = message.reply_to() {
            let quote = format!(
                "┃ ↳ {}: {}",
                sanitize(parent.sender()),
                sanitize(&parent.preview(REPLY_PREVIEW_CHARS))
            );
            lines.push(Line::from(Span::styled(truncate(&quote, width), self.style.reply)));
        }

        let sender_style = if message.is_own() {
            self.style.own_sender
        } else {
            Style::default()
                .fg(sender_color(message.sender()))
                .add_modifier(Modifier::BOLD)
        };
        let timestamp = format!("{} ", message.format_timestamp(self.timestamp_format));
        let sender = format!("{}: ", sanitize(message.sender()));

        let mut head = vec![
            Span::styled(timestamp.clone(), self.style.timestamp),
            Span::styled(sender.clone(), sender_style),
        ];
        if let Some(media) = message.media() {
            head.push(Span::styled(format!("[{}] ", sanitize(media)), self.style.media));
        }

        let indent = timestamp.chars().count() + sender.chars().count();
        let body_width = width.saturating_sub(indent).max(1);
        let content = sanitize(message.content());
        let mut wrapped = content
            .lines()
            .flat_map(|line| wrap(line, body_width))
            .collect::<Vec<_>>()
            .into_iter();

        head.push(Span::styled(wrapped.next().unwrap_or_default(), self.style.content));
        lines.push(Line::from(head));
        for rest in wrapped {
            lines.push(Line::from(vec![
                Span::raw(" ".repeat(indent)),
                Span::styled(rest, self.style.content),
            ]));
        }
        lines
    }

    fn placeholder(&self) -> Option<&'static str> {
        if self.title.is_none() {
            Some("Select a conversation")
        } else if self.buffer.has_messages() {
            None
        } else if self.loading {
            Some("Loading messages…")
        } else {
            Some("No messages yet")
        }
    }
}

/// Splits `text` into chunks of at most `width` display columns.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width && !current.is_empty() {
            out.push(std::mem::take(&mut current));
            used = 0;
        }
        current.push(c);
        used += w;
    }
    out.push(current);
    out
}

impl Widget for MessagePane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = self
            .title
            .map_or_else(|| " Messages ".to_string(), |t| format!(" {} ", sanitize(t)));
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(if self.focused {
                self.style.border_focused
            } else {
                self.style.border
            });
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        if let Some(text) = self.placeholder() {
            Paragraph::new(Span::styled(text, self.style.hint)).render(inner, buf);
            return;
        }

        let width = usize::from(inner.width);
        let mut header: Vec<Line<'static>> = Vec::new();
        if self.loading_older {
            header.push(Line::from(Span::styled("Loading older messages…", self.style.hint)));
        } else if self.exhausted {
            header.push(Line::from(Span::styled("Beginning of conversation", self.style.hint)));
        }

        let mut footer: Vec<Line<'static>> = Vec::new();
        if let Some(typing) = &self.typing {
            footer.push(Line::from(Span::styled(typing.clone(), self.style.typing)));
        }
        if self.viewing_history {
            footer.push(Line::from(Span::styled(
                "Viewing older messages, press End for the latest",
                self.style.hint,
            )));
        }

        let mut body: Vec<Line<'static>> = Vec::new();
        let mut selected_start = None;
        for (index, message) in self.buffer.slots().enumerate() {
            if message.is_empty() {
                continue;
            }
            let lines = self.message_lines(message, width);
            if self.cursor == Some(index) {
                selected_start = Some(body.len());
                body.extend(lines.into_iter().map(|line| line.patch_style(self.style.selected)));
            } else {
                body.extend(lines);
            }
        }

        // Anchored to the newest line unless that hides the selection.
        let body_height = usize::from(inner.height)
            .saturating_sub(header.len() + footer.len())
            .max(1);
        let latest_start = body.len().saturating_sub(body_height);
        let start = selected_start
            .filter(|sel| *sel < latest_start)
            .unwrap_or(latest_start);
        let end = (start + body_height).min(body.len());

        let lines: Vec<Line<'static>> = header
            .into_iter()
            .chain(body[start..end].iter().cloned())
            .chain(footer)
            .collect();
        Paragraph::new(lines).render(inner, buf);
    }
}
