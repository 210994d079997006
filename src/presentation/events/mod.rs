//! Events consumed by the UI dispatcher.

use crossterm::event::{Event, KeyEvent, KeyEventKind};

use crate::domain::entities::{ChatKind, FormattedMessage, MessageId, Peer, StoryItem};
use crate::domain::errors::MessengerError;
use crate::domain::notification::Notification;
use crate::domain::ports::DialogList;

/// Completion of an effect run in the background.
///
/// Every effect that talks to the backend posts exactly one of these.
#[derive(Debug)]
pub enum BackendResult {
    DialogsLoaded {
        kind: ChatKind,
        result: Result<DialogList, MessengerError>,
    },
    /// Latest page for a freshly opened conversation.
    HistoryLoaded {
        peer: Peer,
        result: Result<Vec<FormattedMessage>, MessengerError>,
    },
    /// Page older than `offset_id`.
    OlderHistoryLoaded {
        peer: Peer,
        offset_id: MessageId,
        result: Result<Vec<FormattedMessage>, MessengerError>,
    },
    Sent {
        peer: Peer,
        result: Result<FormattedMessage, MessengerError>,
    },
    Edited {
        peer: Peer,
        index: usize,
        message_id: MessageId,
        text: String,
        result: Result<bool, MessengerError>,
    },
    Deleted {
        peer: Peer,
        message_id: MessageId,
        result: Result<(), MessengerError>,
    },
    Forwarded {
        to: Peer,
        result: Result<(), MessengerError>,
    },
    MarkedRead {
        peer: Peer,
        result: Result<bool, MessengerError>,
    },
    StoriesLoaded {
        peer: Peer,
        result: Result<Vec<StoryItem>, MessengerError>,
    },
}

/// Anything that can change UI state.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize(u16, u16),
    /// Periodic housekeeping such as typing expiry.
    Tick,
    Notification(Notification),
    Backend(BackendResult),
}

impl AppEvent {
    /// Translates a terminal event. Key releases and mouse input are dropped.
    #[must_use]
    pub fn from_terminal(event: Event) -> Option<Self> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => Some(Self::Key(key)),
            Event::Resize(width, height) => Some(Self::Resize(width, height)),
            _ => None,
        }
    }
}

impl From<Notification> for AppEvent {
    fn from(notification: Notification) -> Self {
        Self::Notification(notification)
    }
}

impl From<BackendResult> for AppEvent {
    fn from(result: BackendResult) -> Self {
        Self::Backend(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    #[test]
    fn test_key_release_is_dropped() {
        let release = KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert!(AppEvent::from_terminal(Event::Key(release)).is_none());

        let press = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        assert!(matches!(
            AppEvent::from_terminal(Event::Key(press)),
            Some(AppEvent::Key(_))
        ));
    }

    #[test]
    fn test_resize_and_focus_events() {
        assert!(matches!(
            AppEvent::from_terminal(Event::Resize(80, 24)),
            Some(AppEvent::Resize(80, 24))
        ));
        assert!(AppEvent::from_terminal(Event::FocusGained).is_none());
    }
}
