//! Compositor: draws the main layout, then the open overlay on top.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    widgets::Widget,
};

use super::focus::{Focus, Mode};
use super::state::{ChatEntry, UiState};
use crate::application::services::format_typing_indicator;
use crate::domain::keybinding::Action;
use crate::presentation::widgets::{ConversationList, FooterBar, HeaderBar, MessagePane};
use crate::{NAME, VERSION};

const SIDEBAR_HINTS: [Action; 5] = [
    Action::Select,
    Action::OpenStories,
    Action::OpenSearch,
    Action::FocusNext,
    Action::Quit,
];

const MESSAGE_HINTS: [Action; 6] = [
    Action::Reply,
    Action::EditMessage,
    Action::DeleteMessage,
    Action::ForwardMessage,
    Action::LoadOlder,
    Action::FocusNext,
];

const INPUT_HINTS: [Action; 4] = [
    Action::SendMessage,
    Action::ToggleAttachmentPicker,
    Action::Cancel,
    Action::FocusNext,
];

const PICKER_HINTS: [Action; 3] = [Action::Select, Action::ToggleHidden, Action::Cancel];

/// Draws the whole UI for `state` into `buf`.
pub fn render(state: &mut UiState, area: Rect, buf: &mut Buffer) {
    let [header_area, body_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);
    let [sidebar_area, main_area] =
        Layout::horizontal([Constraint::Percentage(30), Constraint::Fill(1)]).areas(body_area);

    let status = header_status(state);
    HeaderBar::new(NAME, VERSION)
        .mode(state.mode())
        .status(status.as_deref())
        .render(header_area, buf);

    ConversationList::new(&state.sidebar, state.mode())
        .active(state.active.as_ref())
        .focused(state.focus() == Focus::Sidebar)
        .loading(state.loading_dialogs && state.sidebar.is_empty(state.mode()))
        .render(sidebar_area, buf);

    if let Some(picker) = state.file_picker.as_mut() {
        picker.render(main_area, buf, &state.registry);
    } else {
        let typing = typing_line(state);
        MessagePane::new(&state.buffer)
            .title(state.active.as_ref().map(ChatEntry::title))
            .cursor(state.message_cursor)
            .timestamp_format(&state.settings.timestamp_format)
            .typing(typing)
            .focused(state.focus() == Focus::MainView)
            .loading(state.loading, state.loading_older)
            .history(state.history_exhausted, state.viewing_history)
            .render(main_area, buf);
    }

    (&state.input).render(input_area, buf);

    let (label, hints) = if state.file_picker.is_some() {
        ("ATTACH", &PICKER_HINTS[..])
    } else {
        match state.focus() {
            Focus::Sidebar => (state.focus().display_name(), &SIDEBAR_HINTS[..]),
            Focus::MainView => (state.focus().display_name(), &MESSAGE_HINTS[..]),
            Focus::Input => (state.focus().display_name(), &INPUT_HINTS[..]),
        }
    };
    let keybinds = state.registry.keybinds(hints);
    FooterBar::new(&keybinds)
        .focus_label(label)
        .render(footer_area, buf);

    if let Some(overlay) = state.overlay.as_mut() {
        overlay.render(area, buf);
    }
}

fn header_status(state: &UiState) -> Option<String> {
    if let Some(uploading) = &state.uploading {
        Some(uploading.clone())
    } else if state.loading || state.loading_dialogs {
        Some("Loading".to_string())
    } else if state.loading_older {
        Some("Loading older".to_string())
    } else {
        None
    }
}

fn typing_line(state: &UiState) -> Option<String> {
    if !state.settings.show_typing {
        return None;
    }
    match state.active.as_ref()? {
        ChatEntry::User(user) if user.typing => format_typing_indicator(&[user.name.as_str()]),
        ChatEntry::User(_) => None,
        ChatEntry::Channel(channel) if state.mode() == Mode::Groups => {
            match state.typing.typing_count(channel.peer) {
                0 => None,
                1 => format_typing_indicator(&["Someone"]),
                n => Some(format!("{n} people are typing...")),
            }
        }
        ChatEntry::Channel(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ChatKind, UserInfo};
    use crate::domain::notification::Notification;
    use crate::domain::ports::DialogList;
    use crate::presentation::events::{AppEvent, BackendResult};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn draw(state: &mut UiState) -> Buffer {
        let area = Rect::new(0, 0, 100, 24);
        let mut buf = Buffer::empty(area);
        render(state, area, &mut buf);
        buf
    }

    fn loaded_state() -> UiState {
        let mut state = UiState::default();
        state.bootstrap();
        state.update(AppEvent::Backend(BackendResult::DialogsLoaded {
            kind: ChatKind::User,
            result: Ok(DialogList::Users(vec![UserInfo::new(1, 1, "Ann", false)])),
        }));
        state
    }

    fn text(buf: &Buffer) -> String {
        (0..buf.area.height)
            .map(|y| {
                (0..buf.area.width)
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_main_layout_renders_sidebar_and_placeholder() {
        let mut state = loaded_state();
        let screen = text(&draw(&mut state));
        assert!(screen.contains("TERMGRAM"));
        assert!(screen.contains("Ann"));
        assert!(screen.contains("Select a conversation"));
    }

    #[test]
    fn test_closing_overlay_restores_identical_frame() {
        let mut state = loaded_state();
        let before = draw(&mut state);

        state.update(AppEvent::Notification(Notification::Error {
            message: "boom".to_string(),
        }));
        let with_modal = draw(&mut state);
        assert_ne!(before, with_modal);
        assert!(text(&with_modal).contains("boom"));

        state.update(AppEvent::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)));
        assert_eq!(draw(&mut state), before);
    }

    #[test]
    fn test_typing_line_for_direct_chat() {
        let mut state = loaded_state();
        state.update(AppEvent::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
        let Some(ChatEntry::User(user)) = state.active.as_mut() else {
            panic!("conversation should be open");
        };
        user.typing = true;
        assert_eq!(typing_line(&state).as_deref(), Some("Ann is typing..."));

        state.settings.show_typing = false;
        assert_eq!(typing_line(&state), None);
    }
}
