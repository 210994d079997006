use crate::presentation::ui::Mode;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

pub struct HeaderBarStyle {
    pub background: Style,
    pub app_name: Style,
    pub version: Style,
    pub tab: Style,
    pub tab_active: Style,
    pub status: Style,
}

impl Default for HeaderBarStyle {
    fn default() -> Self {
        Self {
            background: Style::default(),
            app_name: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            version: Style::default().fg(Color::DarkGray),
            tab: Style::default().fg(Color::Gray),
            tab_active: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            status: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        }
    }
}

/// Top line: app name, category tabs and a busy indicator.
pub struct HeaderBar<'a> {
    app_name: &'a str,
    version: &'a str,
    mode: Mode,
    status: Option<&'a str>,
    style: HeaderBarStyle,
}

impl<'a> HeaderBar<'a> {
    #[must_use]
    pub fn new(app_name: &'a str, version: &'a str) -> Self {
        Self {
            app_name,
            version,
            mode: Mode::default(),
            status: None,
            style: HeaderBarStyle::default(),
        }
    }

    #[must_use]
    pub const fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Text shown on the right while something is in flight.
    #[must_use]
    pub const fn status(mut self, status: Option<&'a str>) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub const fn style(mut self, style: HeaderBarStyle) -> Self {
        self.style = style;
        self
    }

    fn build_left_spans(&self) -> Vec<Span<'static>> {
        let mut spans = vec![
            Span::styled(format!(" {} ", self.app_name.to_uppercase()), self.style.app_name),
            Span::styled(format!("v{} ", self.version), self.style.version),
        ];
        for mode in Mode::ALL {
            let style = if mode == self.mode {
                self.style.tab_active
            } else {
                self.style.tab
            };
            spans.push(Span::raw(" "));
            spans.push(Span::styled(format!(" {} ", mode.title()), style));
        }
        spans
    }
}

impl Widget for HeaderBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        for x in area.left()..area.right() {
            buf[(x, area.y)]
                .set_char(' ')
                .set_style(self.style.background);
        }

        Paragraph::new(Line::from(self.build_left_spans())).render(area, buf);

        if let Some(status) = self.status {
            let text = format!(" ◐ {status} ");
            let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
            if width < area.width {
                let right_area = Rect::new(area.right() - width, area.y, width, 1);
                Paragraph::new(Span::styled(text, self.style.status)).render(right_area, buf);
            }
        }
    }
}
