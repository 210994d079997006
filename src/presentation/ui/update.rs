//! The dispatcher: applies one event to the state and returns the effects it asks for.

use crossterm::event::KeyEvent;
use tracing::{debug, error, info, trace, warn};

use super::effects::Effect;
use super::focus::{Focus, Mode};
use super::overlay::{ConfirmDelete, ForwardPicker, Overlay, OverlayOutcome, SearchOverlay, StoryViewer};
use super::state::{ChatEntry, PendingAction, UiState};
use crate::domain::entities::{ChatKind, FormattedMessage, Peer};
use crate::domain::errors::MessengerError;
use crate::domain::keybinding::Action;
use crate::domain::notification::Notification;
use crate::domain::ports::{DialogList, SendTextRequest};
use crate::domain::search::SearchResult;
use crate::presentation::events::{AppEvent, BackendResult};
use crate::presentation::widgets::FileExplorerAction;

const SIDEBAR_ACTIONS: [Action; 8] = [
    Action::NavigateUp,
    Action::NavigateDown,
    Action::SelectFirst,
    Action::SelectLast,
    Action::Select,
    Action::NavigateRight,
    Action::OpenStories,
    Action::Cancel,
];

const MESSAGE_ACTIONS: [Action; 10] = [
    Action::NavigateUp,
    Action::NavigateDown,
    Action::SelectFirst,
    Action::SelectLast,
    Action::LoadOlder,
    Action::Reply,
    Action::EditMessage,
    Action::DeleteMessage,
    Action::ForwardMessage,
    Action::Cancel,
];

const INPUT_ACTIONS: [Action; 3] = [Action::SendMessage, Action::Cancel, Action::ClearAttachment];

/// Body of a desktop notification when previews are off.
const GENERIC_NOTIFICATION_BODY: &str = "New message";

const NOTIFICATION_PREVIEW_CHARS: usize = 100;

impl UiState {
    /// Applies `event` and returns the effects to run.
    pub fn update(&mut self, event: AppEvent) -> Vec<Effect> {
        let mut effects = Vec::new();
        match event {
            AppEvent::Key(key) => self.handle_key(key, &mut effects),
            AppEvent::Resize(width, height) => self.size = (width, height),
            AppEvent::Tick => self.expire_typing(),
            AppEvent::Notification(notification) => {
                self.handle_notification(notification, &mut effects);
            }
            AppEvent::Backend(result) => self.handle_result(result, &mut effects),
        }
        self.router.ensure_valid(self.is_writable());
        self.refresh_input_chrome();
        effects
    }

    /// Effects to run once at startup.
    pub fn bootstrap(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.switch_mode(self.mode(), &mut effects);
        self.refresh_input_chrome();
        effects
    }

    fn handle_key(&mut self, key: KeyEvent, effects: &mut Vec<Effect>) {
        if let Some(mut overlay) = self.overlay.take() {
            let outcome = overlay.handle_key(key, &self.registry);
            self.apply_overlay_outcome(overlay, outcome, effects);
            return;
        }

        if let Some(action) = self.registry.find_action_in(key, &Action::GLOBAL) {
            self.handle_global(action, effects);
            return;
        }

        if self.file_picker.is_some() {
            self.handle_picker_key(key);
            return;
        }

        match self.focus() {
            Focus::Sidebar => self.handle_sidebar_key(key, effects),
            Focus::MainView => self.handle_messages_key(key, effects),
            Focus::Input => self.handle_input_key(key, effects),
        }
    }

    fn apply_overlay_outcome(
        &mut self,
        overlay: Overlay,
        outcome: OverlayOutcome,
        effects: &mut Vec<Effect>,
    ) {
        match outcome {
            OverlayOutcome::Keep => self.overlay = Some(overlay),
            OverlayOutcome::Close => debug!(overlay = ?overlay.kind(), "Overlay closed"),
            OverlayOutcome::Search(query) => {
                self.overlay = Some(overlay);
                effects.push(Effect::Search { query });
            }
            OverlayOutcome::Open(entry) => self.open_search_entry(entry, effects),
            OverlayOutcome::Delete { peer, message_id } => {
                debug!(peer = %peer, message_id = %message_id, "Delete confirmed");
                effects.push(Effect::Delete { peer, message_id });
            }
            OverlayOutcome::Forward {
                from,
                to,
                message_id,
            } => {
                debug!(from = %from, to = %to, message_id = %message_id, "Forward confirmed");
                effects.push(Effect::Forward {
                    from,
                    to,
                    message_ids: vec![message_id],
                });
            }
        }
    }

    fn handle_global(&mut self, action: Action, effects: &mut Vec<Effect>) {
        match action {
            Action::Quit => {
                info!("Quit requested");
                self.should_quit = true;
            }
            Action::ToggleAttachmentPicker => self.toggle_file_picker(),
            Action::OpenSearch => self.overlay = Some(Overlay::Search(SearchOverlay::new())),
            Action::FocusNext => {
                let writable = self.is_writable();
                self.router.focus_next(writable);
            }
            Action::FocusPrevious => {
                let writable = self.is_writable();
                self.router.focus_previous(writable);
            }
            other => {
                if let Some(mode) = Mode::from_action(other) {
                    self.switch_mode(mode, effects);
                }
            }
        }
    }

    fn switch_mode(&mut self, mode: Mode, effects: &mut Vec<Effect>) {
        self.file_picker = None;
        if self.router.switch_mode(mode) {
            debug!(mode = mode.title(), "Fetching conversation list");
            self.loading_dialogs = true;
            effects.push(Effect::FetchDialogs(mode.chat_kind()));
        }
    }

    fn toggle_file_picker(&mut self) {
        if self.file_picker.take().is_some() {
            return;
        }
        if self.active.is_none() || !self.is_writable() {
            debug!("Attachment picker needs a writable conversation");
            return;
        }
        self.file_picker = Some(crate::presentation::widgets::FileExplorerComponent::new());
    }

    fn handle_picker_key(&mut self, key: KeyEvent) {
        let Some(picker) = self.file_picker.as_mut() else {
            return;
        };
        match picker.handle_key(key, &self.registry) {
            FileExplorerAction::SelectFile(path) => {
                info!(path = %path.display(), "Attachment staged");
                self.attachment = Some(path);
                self.file_picker = None;
                self.router.set_focus(Focus::Input);
            }
            FileExplorerAction::Close => self.file_picker = None,
            FileExplorerAction::None => {}
        }
    }

    fn handle_sidebar_key(&mut self, key: KeyEvent, effects: &mut Vec<Effect>) {
        let mode = self.mode();
        let cursor = self.sidebar.cursor(mode);
        match self.registry.find_action_in(key, &SIDEBAR_ACTIONS) {
            Some(Action::NavigateUp) => self.sidebar.set_cursor(mode, cursor.saturating_sub(1)),
            Some(Action::NavigateDown) => self.sidebar.set_cursor(mode, cursor + 1),
            Some(Action::SelectFirst) => self.sidebar.set_cursor(mode, 0),
            Some(Action::SelectLast) => self.sidebar.set_cursor(mode, usize::MAX),
            Some(Action::Select | Action::NavigateRight) => {
                if let Some(entry) = self.sidebar.selected(mode) {
                    self.open_conversation(entry, effects);
                }
            }
            Some(Action::OpenStories) if matches!(mode, Mode::Users | Mode::Bots) => {
                if let Some(entry) = self.sidebar.selected(mode) {
                    let peer = entry.peer();
                    self.overlay = Some(Overlay::Stories(StoryViewer::loading(peer, entry.title())));
                    effects.push(Effect::FetchStories { peer });
                }
            }
            _ => {}
        }
    }

    fn open_conversation(&mut self, entry: ChatEntry, effects: &mut Vec<Effect>) {
        let peer = entry.peer();
        info!(peer = %peer, title = %entry.title(), "Opening conversation");

        self.active = Some(entry);
        self.buffer.reset();
        self.message_cursor = None;
        self.pending = PendingAction::None;
        self.attachment = None;
        self.file_picker = None;
        self.viewing_history = false;
        self.history_exhausted = false;
        self.loading_older = false;
        self.input.clear();
        self.loading = true;
        self.router.set_focus(Focus::MainView);

        effects.push(Effect::LoadHistory { peer });
    }

    fn open_search_entry(&mut self, entry: ChatEntry, effects: &mut Vec<Effect>) {
        let peer = entry.peer();
        let mode = Mode::from_kind(peer.kind);
        self.sidebar.insert(entry.clone());
        self.switch_mode(mode, effects);
        if let Some(position) = self.sidebar.position(peer) {
            self.sidebar.set_cursor(mode, position);
        }
        self.open_conversation(entry, effects);
    }

    fn handle_messages_key(&mut self, key: KeyEvent, effects: &mut Vec<Effect>) {
        let first = self.buffer.first_real_index();
        let last = self.buffer.last_real_index();

        match self.registry.find_action_in(key, &MESSAGE_ACTIONS) {
            Some(Action::NavigateUp) => match (self.message_cursor, first) {
                (Some(cursor), Some(first)) if cursor > first => {
                    self.message_cursor = Some(cursor - 1);
                }
                _ => self.request_older(effects),
            },
            Some(Action::NavigateDown) => {
                if let (Some(cursor), Some(last)) = (self.message_cursor, last)
                    && cursor < last
                {
                    self.message_cursor = Some(cursor + 1);
                }
            }
            Some(Action::SelectFirst) => self.message_cursor = first,
            Some(Action::SelectLast) => {
                if self.viewing_history {
                    self.reload_latest(effects);
                } else {
                    self.message_cursor = last;
                }
            }
            Some(Action::LoadOlder) => self.request_older(effects),
            Some(Action::Reply) => {
                if let Some((_, message)) = self.selected_message() {
                    self.pending = PendingAction::Reply {
                        message: message.clone(),
                    };
                    self.focus_input_if_writable();
                }
            }
            Some(Action::EditMessage) => {
                if let Some((index, message)) = self.selected_message()
                    && message.is_own()
                {
                    let content = message.content().to_string();
                    self.pending = PendingAction::Edit {
                        index,
                        message_id: message.id(),
                    };
                    self.input.set_value(content);
                    self.focus_input_if_writable();
                }
            }
            Some(Action::DeleteMessage) => {
                if let (Some(peer), Some((_, message))) = (self.active_peer(), self.selected_message())
                {
                    self.overlay = Some(Overlay::ConfirmDelete(ConfirmDelete {
                        peer,
                        message: message.clone(),
                    }));
                }
            }
            Some(Action::ForwardMessage) => self.open_forward_picker(),
            Some(Action::Cancel) => self.cancel_pending(),
            _ => {}
        }
    }

    fn focus_input_if_writable(&mut self) {
        if self.is_writable() {
            self.router.set_focus(Focus::Input);
        }
    }

    fn cancel_pending(&mut self) {
        if matches!(self.pending, PendingAction::Edit { .. }) {
            self.input.clear();
        }
        self.pending = PendingAction::None;
    }

    fn open_forward_picker(&mut self) {
        let (Some(from), Some((_, message))) = (self.active_peer(), self.selected_message()) else {
            return;
        };
        let message = message.clone();
        let candidates: Vec<SearchResult> = self
            .sidebar
            .all_entries()
            .iter()
            .filter(|entry| entry.is_writable() && entry.peer() != from)
            .map(SearchResult::from)
            .collect();
        self.overlay = Some(Overlay::Forward(ForwardPicker::new(from, message, candidates)));
    }

    fn request_older(&mut self, effects: &mut Vec<Effect>) {
        let (Some(peer), Some(offset_id)) = (self.active_peer(), self.buffer.oldest_id()) else {
            return;
        };
        if self.loading || self.loading_older || self.history_exhausted {
            return;
        }
        debug!(peer = %peer, offset_id = %offset_id, "Requesting older messages");
        self.loading_older = true;
        effects.push(Effect::LoadOlder { peer, offset_id });
    }

    fn reload_latest(&mut self, effects: &mut Vec<Effect>) {
        let Some(peer) = self.active_peer() else {
            return;
        };
        self.viewing_history = false;
        self.history_exhausted = false;
        self.loading = true;
        effects.push(Effect::LoadHistory { peer });
    }

    fn handle_input_key(&mut self, key: KeyEvent, effects: &mut Vec<Effect>) {
        match self.registry.find_action_in(key, &INPUT_ACTIONS) {
            Some(Action::SendMessage) => self.submit(effects),
            Some(Action::Cancel) => {
                if self.pending == PendingAction::None {
                    self.router.set_focus(Focus::MainView);
                } else {
                    self.cancel_pending();
                }
            }
            Some(Action::ClearAttachment) => self.attachment = None,
            _ => {
                if !self.is_writable() || !self.input.handle_key(key) {
                    return;
                }
                if self.settings.show_typing
                    && let Some(peer) = self.active_peer()
                {
                    effects.push(Effect::SetTyping { peer });
                }
            }
        }
    }

    fn submit(&mut self, effects: &mut Vec<Effect>) {
        let Some(peer) = self.active_peer() else {
            return;
        };
        if !self.is_writable() {
            return;
        }
        let text = self.input.value().to_string();

        match std::mem::take(&mut self.pending) {
            PendingAction::Edit { index, message_id } => {
                self.pending = PendingAction::Edit { index, message_id };
                if text.trim().is_empty() {
                    return;
                }
                effects.push(Effect::Edit {
                    peer,
                    index,
                    message_id,
                    text,
                });
            }
            pending => {
                let reply_to = match &pending {
                    PendingAction::Reply { message } => Some(message.id()),
                    _ => None,
                };
                if let Some(path) = self.attachment.take() {
                    let name = path
                        .file_name()
                        .map_or_else(|| "file".to_string(), |n| n.to_string_lossy().into_owned());
                    self.uploading = Some(format!("Uploading {name}…"));
                    effects.push(Effect::send_media(peer, path, text, reply_to));
                } else if text.trim().is_empty() {
                    self.pending = pending;
                    return;
                } else {
                    effects.push(Effect::SendText(SendTextRequest {
                        peer,
                        text,
                        reply_to,
                    }));
                }
            }
        }
        self.input.clear();
    }

    fn handle_result(&mut self, result: BackendResult, effects: &mut Vec<Effect>) {
        match result {
            BackendResult::DialogsLoaded { kind, result } => {
                let mode = Mode::from_kind(kind);
                self.loading_dialogs = false;
                match result {
                    Ok(list) => self.apply_dialogs(mode, list),
                    Err(e) => {
                        self.router.mark_failed(mode);
                        self.show_error(&e);
                    }
                }
            }
            BackendResult::HistoryLoaded { peer, result } => {
                if self.active_peer() != Some(peer) {
                    debug!(peer = %peer, "Dropping history for a closed conversation");
                    return;
                }
                self.loading = false;
                match result {
                    Ok(page) => self.apply_latest_page(peer, page, effects),
                    Err(e) => self.show_error(&e),
                }
            }
            BackendResult::OlderHistoryLoaded {
                peer,
                offset_id,
                result,
            } => {
                if self.active_peer() != Some(peer) {
                    return;
                }
                self.loading_older = false;
                match result {
                    Ok(page) => {
                        let placed = self.buffer.prepend_older(page);
                        debug!(peer = %peer, offset_id = %offset_id, placed, "Older messages loaded");
                        if placed == 0 {
                            self.history_exhausted = true;
                        } else {
                            self.viewing_history = true;
                            self.message_cursor =
                                self.buffer.first_real_index().map(|first| first + placed - 1);
                        }
                    }
                    Err(e) => self.show_error(&e),
                }
            }
            BackendResult::Sent { peer, result } => {
                self.uploading = None;
                match result {
                    Ok(message) => {
                        if self.active_peer() == Some(peer) && !self.viewing_history {
                            self.append_live(message);
                        }
                    }
                    Err(e) => self.show_error(&e),
                }
            }
            BackendResult::Edited {
                peer,
                index,
                message_id,
                text,
                result,
            } => {
                if matches!(self.pending, PendingAction::Edit { message_id: id, .. } if id == message_id)
                {
                    self.pending = PendingAction::None;
                }
                match result {
                    Ok(true) if self.active_peer() == Some(peer) => {
                        let replaced = self.buffer.replace_content(index, message_id, &text)
                            || self.buffer.position(message_id).is_some_and(|position| {
                                self.buffer.replace_content(position, message_id, &text)
                            });
                        debug!(message_id = %message_id, replaced, "Message edited");
                    }
                    Ok(true) => {}
                    Ok(false) => self.show_error(&MessengerError::edit("the message was not changed")),
                    Err(e) => self.show_error(&e),
                }
            }
            BackendResult::Deleted {
                peer,
                message_id,
                result,
            } => match result {
                Ok(()) => {
                    if self.active_peer() == Some(peer) && self.buffer.remove(message_id).is_some() {
                        if matches!(&self.pending, PendingAction::Edit { message_id: id, .. } if *id == message_id)
                            || matches!(&self.pending, PendingAction::Reply { message } if message.id() == message_id)
                        {
                            self.cancel_pending();
                        }
                        self.clamp_message_cursor();
                    }
                }
                Err(e) => self.show_error(&e),
            },
            BackendResult::Forwarded { to, result } => match result {
                Ok(()) => info!(to = %to, "Message forwarded"),
                Err(e) => {
                    error!(to = %to, error = %e, "Forward failed");
                    self.show_error(&e);
                }
            },
            BackendResult::MarkedRead { peer, result } => match result {
                Ok(true) => {
                    self.sidebar.update_unread(peer, |_| 0);
                    if let Some(active) = self.active.as_mut().filter(|a| a.peer() == peer) {
                        active.set_unread(0);
                    }
                }
                Ok(false) => {}
                Err(e) => self.show_error(&e),
            },
            BackendResult::StoriesLoaded { peer, result } => {
                let for_open_viewer =
                    matches!(&self.overlay, Some(Overlay::Stories(viewer)) if viewer.peer == peer);
                if !for_open_viewer {
                    debug!(peer = %peer, "Story viewer closed, dropping stories");
                    return;
                }
                match result {
                    Ok(items) => {
                        if let Some(Overlay::Stories(viewer)) = self.overlay.as_mut() {
                            viewer.set_items(items);
                        }
                    }
                    Err(e) => self.show_error(&e),
                }
            }
        }
    }

    fn apply_dialogs(&mut self, mode: Mode, list: DialogList) {
        info!(mode = mode.title(), count = list.len(), "Conversation list loaded");
        match (mode, list) {
            (Mode::Bots, DialogList::Users(users)) => self.sidebar.bots = users,
            (_, DialogList::Users(users)) => self.sidebar.users = users,
            (Mode::Groups, DialogList::Channels(channels)) => self.sidebar.groups = channels,
            (_, DialogList::Channels(channels)) => self.sidebar.channels = channels,
        }
        let cursor = self
            .active_peer()
            .and_then(|peer| self.sidebar.position(peer).filter(|_| Mode::from_kind(peer.kind) == mode))
            .unwrap_or_else(|| self.sidebar.cursor(mode));
        self.sidebar.set_cursor(mode, cursor);
    }

    fn apply_latest_page(&mut self, peer: Peer, page: Vec<FormattedMessage>, effects: &mut Vec<Effect>) {
        let empty = page.is_empty();
        self.buffer.merge(page);
        self.message_cursor = self.buffer.last_real_index();

        if empty && peer.kind == ChatKind::Bot && self.input.is_empty() {
            self.input.set_value("/start");
        }
        if self.active.as_ref().is_some_and(|entry| entry.unread() > 0) {
            effects.push(Effect::MarkRead { peer });
        }
    }

    /// Appends a live message; the cursor follows only if it was on the newest row.
    fn append_live(&mut self, message: FormattedMessage) {
        let follow = self.cursor_at_latest();
        if !self.buffer.push(message) {
            return;
        }
        if follow {
            self.message_cursor = self.buffer.last_real_index();
        } else {
            self.message_cursor = self.message_cursor.map(|c| c.saturating_sub(1));
            self.clamp_message_cursor();
        }
    }

    fn handle_notification(&mut self, notification: Notification, effects: &mut Vec<Effect>) {
        trace!(kind = notification.kind(), "Notification received");
        match notification {
            Notification::NewMessage { peer, message } => self.on_new_message(peer, message, effects),
            Notification::UserTyping { peer, user_id } => {
                if !self.settings.show_typing {
                    return;
                }
                self.typing.record(peer, user_id);
                if peer.kind.is_direct() {
                    self.set_user_typing(user_id, true);
                }
            }
            Notification::UserStatus {
                user_id,
                online,
                last_seen,
            } => {
                for user in self.sidebar.users_with_id(user_id) {
                    user.online = online;
                    user.last_seen.clone_from(&last_seen);
                }
                if let Some(ChatEntry::User(user)) = self.active.as_mut()
                    && user.peer.id == user_id
                {
                    user.online = online;
                    user.last_seen = last_seen;
                }
            }
            Notification::Error { message } => {
                warn!(message = %message, "Backend reported an error");
                self.overlay = Some(Overlay::error("Error", message));
            }
            Notification::SearchResult { query, hits } => {
                if let Some(Overlay::Search(search)) = self.overlay.as_mut() {
                    if !search.apply_results(&query, hits) {
                        debug!(query = %query, "Dropping stale search results");
                    }
                } else {
                    debug!(query = %query, "Search closed, dropping results");
                }
            }
        }
    }

    fn on_new_message(&mut self, peer: Peer, message: FormattedMessage, effects: &mut Vec<Effect>) {
        if let Some(detail) = message.sender_detail() {
            self.typing.clear_user(peer, detail.user_id);
        }
        if peer.kind.is_direct() {
            self.typing.clear_user(peer, peer.id);
            self.set_user_typing(peer.id, false);
        }

        if self.active_peer() == Some(peer) {
            if self.viewing_history {
                debug!(peer = %peer, "Scrolled back, live message not appended");
            } else {
                self.append_live(message);
            }
            return;
        }

        self.sidebar.update_unread(peer, |unread| unread.saturating_add(1));

        if self.settings.notifications_enabled && !message.is_own() {
            let body = if self.settings.notification_preview {
                message.preview(NOTIFICATION_PREVIEW_CHARS)
            } else {
                GENERIC_NOTIFICATION_BODY.to_string()
            };
            effects.push(Effect::DesktopNotify {
                title: message.sender().to_string(),
                body,
            });
        }
    }

    fn set_user_typing(&mut self, user_id: i64, typing: bool) {
        for user in self.sidebar.users_with_id(user_id) {
            user.typing = typing;
        }
        if let Some(ChatEntry::User(user)) = self.active.as_mut()
            && user.peer.id == user_id
        {
            user.typing = typing;
        }
    }

    fn expire_typing(&mut self) {
        for peer in self.typing.expire() {
            if peer.kind.is_direct() {
                self.set_user_typing(peer.id, false);
            }
        }
    }

    fn show_error(&mut self, e: &MessengerError) {
        error!(code = e.code(), error = %e, "Backend call failed");
        self.overlay = Some(Overlay::error(format!("Error · {}", e.code()), e.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use chrono::Utc;
    use crossterm::event::{KeyCode, KeyModifiers};

    use crate::application::services::{CONVERSATION_CAPACITY, TypingTracker};
    use crate::domain::entities::{ChannelInfo, MessageId, SenderDetail, UserInfo};
    use crate::domain::notification::SearchHits;
    use crate::presentation::ui::overlay::OverlayKind;
    use crate::presentation::ui::state::RenderState;

    fn press(state: &mut UiState, code: KeyCode) -> Vec<Effect> {
        state.update(AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn ctrl(state: &mut UiState, c: char) -> Vec<Effect> {
        state.update(AppEvent::Key(KeyEvent::new(
            KeyCode::Char(c),
            KeyModifiers::CONTROL,
        )))
    }

    fn type_text(state: &mut UiState, text: &str) -> Vec<Effect> {
        text.chars()
            .flat_map(|c| press(state, KeyCode::Char(c)))
            .collect()
    }

    fn message(id: i64, content: &str, own: bool) -> FormattedMessage {
        FormattedMessage::new(id, if own { "me" } else { "Ann" }, content, own, Utc::now())
    }

    fn ann() -> UserInfo {
        UserInfo::new(1, 11, "Ann", false)
    }

    fn bob() -> UserInfo {
        UserInfo::new(2, 22, "Bob", false)
    }

    /// State with users loaded and Ann's conversation open on `page`.
    fn open_chat(user: UserInfo, page: Vec<FormattedMessage>) -> UiState {
        let mut state = UiState::default();
        let bootstrap = state.bootstrap();
        assert_eq!(bootstrap, vec![Effect::FetchDialogs(ChatKind::User)]);
        state.update(AppEvent::Backend(BackendResult::DialogsLoaded {
            kind: ChatKind::User,
            result: Ok(DialogList::Users(vec![user.clone(), bob()])),
        }));

        let effects = press(&mut state, KeyCode::Enter);
        assert_eq!(effects, vec![Effect::LoadHistory { peer: user.peer }]);
        assert!(state.loading);

        state.update(AppEvent::Backend(BackendResult::HistoryLoaded {
            peer: user.peer,
            result: Ok(page),
        }));
        state
    }

    #[test]
    fn test_merge_moves_cursor_to_last_row() {
        let state = open_chat(ann(), vec![message(1, "a", false), message(2, "b", false)]);
        assert!(!state.loading);
        assert_eq!(state.buffer.len(), CONVERSATION_CAPACITY);
        assert_eq!(state.message_cursor, Some(CONVERSATION_CAPACITY - 1));
        assert_eq!(state.focus(), Focus::MainView);
    }

    #[test]
    fn test_bot_with_empty_history_prefills_start() {
        let mut state = UiState::default();
        state.bootstrap();
        ctrl(&mut state, 'b');
        let bot = UserInfo::new(5, 55, "helper", true);
        state.update(AppEvent::Backend(BackendResult::DialogsLoaded {
            kind: ChatKind::Bot,
            result: Ok(DialogList::Users(vec![bot.clone()])),
        }));
        press(&mut state, KeyCode::Enter);
        state.update(AppEvent::Backend(BackendResult::HistoryLoaded {
            peer: bot.peer,
            result: Ok(Vec::new()),
        }));

        assert_eq!(state.input.value(), "/start");
    }

    #[test]
    fn test_user_with_empty_history_keeps_input_empty() {
        let state = open_chat(ann(), Vec::new());
        assert!(state.input.is_empty());
    }

    #[test]
    fn test_mode_switch_from_input_forces_sidebar_and_fetches_once() {
        let mut state = open_chat(ann(), vec![message(1, "a", false)]);
        state.router.set_focus(Focus::Input);

        let effects = ctrl(&mut state, 'g');
        assert_eq!(effects, vec![Effect::FetchDialogs(ChatKind::Group)]);
        assert_eq!(state.focus(), Focus::Sidebar);
        assert_eq!(state.mode(), Mode::Groups);

        ctrl(&mut state, 'u');
        assert!(ctrl(&mut state, 'g').is_empty());
    }

    #[test]
    fn test_failed_dialog_fetch_is_retried_on_next_switch() {
        let mut state = UiState::default();
        state.bootstrap();
        let effects = ctrl(&mut state, 'n');
        assert_eq!(effects, vec![Effect::FetchDialogs(ChatKind::Channel)]);

        state.update(AppEvent::Backend(BackendResult::DialogsLoaded {
            kind: ChatKind::Channel,
            result: Err(MessengerError::fetch_history("offline")),
        }));
        assert_eq!(state.render_state(), RenderState::Overlay(OverlayKind::Error));
        press(&mut state, KeyCode::Esc);

        ctrl(&mut state, 'u');
        assert_eq!(
            ctrl(&mut state, 'n'),
            vec![Effect::FetchDialogs(ChatKind::Channel)]
        );
    }

    #[test]
    fn test_focus_ring_skips_input_in_read_only_channel() {
        let mut state = UiState::default();
        state.bootstrap();
        ctrl(&mut state, 'n');
        let news = ChannelInfo::channel(3, 33, "news", false);
        state.update(AppEvent::Backend(BackendResult::DialogsLoaded {
            kind: ChatKind::Channel,
            result: Ok(DialogList::Channels(vec![news])),
        }));
        press(&mut state, KeyCode::Enter);
        assert_eq!(state.focus(), Focus::MainView);

        press(&mut state, KeyCode::Tab);
        assert_eq!(state.focus(), Focus::Sidebar);
        press(&mut state, KeyCode::Tab);
        assert_eq!(state.focus(), Focus::MainView);
    }

    #[test]
    fn test_open_channel_stays_read_only_after_switching_to_users() {
        let mut state = UiState::default();
        state.bootstrap();
        ctrl(&mut state, 'n');
        state.update(AppEvent::Backend(BackendResult::DialogsLoaded {
            kind: ChatKind::Channel,
            result: Ok(DialogList::Channels(vec![ChannelInfo::channel(3, 33, "news", false)])),
        }));
        press(&mut state, KeyCode::Enter);

        ctrl(&mut state, 'u');
        assert_eq!(state.mode(), Mode::Users);
        assert!(!state.is_writable());

        press(&mut state, KeyCode::Tab);
        press(&mut state, KeyCode::Tab);
        assert_eq!(state.focus(), Focus::Sidebar);

        let mut effects = type_text(&mut state, "hi");
        effects.extend(press(&mut state, KeyCode::Enter));
        assert!(!effects.iter().any(|e| matches!(e, Effect::SendText(_) | Effect::SetTyping { .. })));
    }

    #[test]
    fn test_open_direct_chat_stays_writable_in_channel_mode() {
        let mut state = open_chat(ann(), vec![message(1, "a", false)]);
        ctrl(&mut state, 'n');
        assert_eq!(state.mode(), Mode::Channels);
        assert!(state.is_writable());

        press(&mut state, KeyCode::Tab);
        press(&mut state, KeyCode::Tab);
        assert_eq!(state.focus(), Focus::Input);
    }

    #[test]
    fn test_list_result_does_not_stop_history_spinner() {
        let mut state = UiState::default();
        state.bootstrap();
        assert!(state.loading_dialogs);
        state.update(AppEvent::Backend(BackendResult::DialogsLoaded {
            kind: ChatKind::User,
            result: Ok(DialogList::Users(vec![ann()])),
        }));
        assert!(!state.loading_dialogs);

        press(&mut state, KeyCode::Enter);
        ctrl(&mut state, 'g');
        assert!(state.loading);
        assert!(state.loading_dialogs);

        state.update(AppEvent::Backend(BackendResult::DialogsLoaded {
            kind: ChatKind::Group,
            result: Ok(DialogList::Channels(Vec::new())),
        }));
        assert!(state.loading);
        assert!(!state.loading_dialogs);

        state.update(AppEvent::Backend(BackendResult::HistoryLoaded {
            peer: ann().peer,
            result: Ok(vec![message(5, "a", false)]),
        }));
        assert!(!state.loading);
    }

    #[test]
    fn test_typing_effect_follows_toggle() {
        let mut state = open_chat(ann(), vec![message(1, "a", false)]);
        let peer = ann().peer;
        press(&mut state, KeyCode::Tab);
        assert_eq!(state.focus(), Focus::Input);

        let effects = type_text(&mut state, "hi");
        assert_eq!(effects, vec![Effect::SetTyping { peer }, Effect::SetTyping { peer }]);

        state.settings.show_typing = false;
        assert!(type_text(&mut state, "!").is_empty());
        assert_eq!(state.input.value(), "hi!");
    }

    #[test]
    fn test_send_text_with_reply() {
        let mut state = open_chat(ann(), vec![message(1, "question?", false)]);
        press(&mut state, KeyCode::Char('r'));
        assert_eq!(state.focus(), Focus::Input);

        state.settings.show_typing = false;
        type_text(&mut state, "answer");
        let effects = press(&mut state, KeyCode::Enter);

        assert_eq!(
            effects,
            vec![Effect::SendText(SendTextRequest {
                peer: ann().peer,
                text: "answer".to_string(),
                reply_to: Some(MessageId(1)),
            })]
        );
        assert!(state.input.is_empty());
        assert_eq!(state.pending, PendingAction::None);
    }

    #[test]
    fn test_blank_input_sends_nothing() {
        let mut state = open_chat(ann(), vec![message(1, "a", false)]);
        press(&mut state, KeyCode::Tab);
        state.settings.show_typing = false;
        type_text(&mut state, "   ");
        assert!(press(&mut state, KeyCode::Enter).is_empty());
    }

    #[test]
    fn test_sent_message_is_appended_once() {
        let mut state = open_chat(ann(), vec![message(1, "a", false)]);
        for _ in 0..2 {
            state.update(AppEvent::Backend(BackendResult::Sent {
                peer: ann().peer,
                result: Ok(message(2, "mine", true)),
            }));
        }
        assert_eq!(state.buffer.real_len(), 2);
        assert_eq!(state.message_cursor, state.buffer.last_real_index());
    }

    #[test]
    fn test_send_failure_opens_error_modal() {
        let mut state = open_chat(ann(), vec![message(1, "a", false)]);
        state.uploading = Some("Uploading cat.png…".to_string());
        state.update(AppEvent::Backend(BackendResult::Sent {
            peer: ann().peer,
            result: Err(MessengerError::send("flood wait")),
        }));

        assert!(state.uploading.is_none());
        let Some(Overlay::Error(modal)) = &state.overlay else {
            panic!("expected error modal");
        };
        assert!(modal.message.contains("flood wait"));
    }

    #[test]
    fn test_staged_attachment_sends_media_with_caption() {
        let mut state = open_chat(ann(), vec![message(1, "a", false)]);
        state.attachment = Some("/tmp/cat.png".into());
        press(&mut state, KeyCode::Tab);
        state.settings.show_typing = false;
        type_text(&mut state, "look");

        let effects = press(&mut state, KeyCode::Enter);
        assert_eq!(
            effects,
            vec![Effect::send_media(
                ann().peer,
                "/tmp/cat.png".into(),
                "look".to_string(),
                None
            )]
        );
        assert!(state.attachment.is_none());
        assert_eq!(state.uploading.as_deref(), Some("Uploading cat.png…"));

        state.update(AppEvent::Backend(BackendResult::Sent {
            peer: ann().peer,
            result: Ok(message(2, "look", true).with_media("photo")),
        }));
        assert!(state.uploading.is_none());
        assert_eq!(state.buffer.real_len(), 2);
    }

    #[test]
    fn test_clear_attachment_in_input() {
        let mut state = open_chat(ann(), vec![message(1, "a", false)]);
        state.attachment = Some("/tmp/cat.png".into());
        press(&mut state, KeyCode::Tab);
        ctrl(&mut state, 'x');
        assert!(state.attachment.is_none());
    }

    #[test]
    fn test_edit_replaces_content_in_place() {
        let mut state = open_chat(ann(), vec![message(1, "a", false), message(2, "hello", true)]);
        let before_len = state.buffer.real_len();

        press(&mut state, KeyCode::Char('e'));
        assert_eq!(state.input.value(), "hello");
        assert_eq!(state.focus(), Focus::Input);
        let PendingAction::Edit { index, message_id } = state.pending.clone() else {
            panic!("expected edit pending");
        };
        assert_eq!(message_id, MessageId(2));

        state.input.set_value("hi");
        let effects = press(&mut state, KeyCode::Enter);
        assert_eq!(
            effects,
            vec![Effect::Edit {
                peer: ann().peer,
                index,
                message_id,
                text: "hi".to_string(),
            }]
        );

        state.update(AppEvent::Backend(BackendResult::Edited {
            peer: ann().peer,
            index,
            message_id,
            text: "hi".to_string(),
            result: Ok(true),
        }));

        assert_eq!(state.buffer.get(index).map(FormattedMessage::content), Some("hi"));
        assert_eq!(state.pending, PendingAction::None);
        assert_eq!(state.buffer.real_len(), before_len);
    }

    #[test]
    fn test_edit_is_only_offered_for_own_messages() {
        let mut state = open_chat(ann(), vec![message(1, "theirs", false)]);
        press(&mut state, KeyCode::Char('e'));
        assert_eq!(state.pending, PendingAction::None);
        assert!(state.input.is_empty());
    }

    #[test]
    fn test_rejected_edit_opens_error_modal() {
        let mut state = open_chat(ann(), vec![message(2, "hello", true)]);
        state.update(AppEvent::Backend(BackendResult::Edited {
            peer: ann().peer,
            index: CONVERSATION_CAPACITY - 1,
            message_id: MessageId(2),
            text: "hi".to_string(),
            result: Ok(false),
        }));
        assert_eq!(state.render_state(), RenderState::Overlay(OverlayKind::Error));
        assert_eq!(state.buffer.get(CONVERSATION_CAPACITY - 1).map(FormattedMessage::content), Some("hello"));
    }

    #[test]
    fn test_escape_cancels_edit() {
        let mut state = open_chat(ann(), vec![message(2, "hello", true)]);
        press(&mut state, KeyCode::Char('e'));
        press(&mut state, KeyCode::Esc);
        assert_eq!(state.pending, PendingAction::None);
        assert!(state.input.is_empty());
        assert_eq!(state.focus(), Focus::Input);

        press(&mut state, KeyCode::Esc);
        assert_eq!(state.focus(), Focus::MainView);
    }

    #[test]
    fn test_delete_confirm_no_changes_nothing() {
        let mut state = open_chat(ann(), vec![message(1, "a", false), message(2, "b", true)]);
        let slots_before: Vec<FormattedMessage> = state.buffer.slots().cloned().collect();
        let cursor_before = state.message_cursor;

        press(&mut state, KeyCode::Char('d'));
        assert_eq!(state.render_state(), RenderState::Overlay(OverlayKind::ConfirmDelete));

        let effects = press(&mut state, KeyCode::Char('n'));
        assert!(effects.is_empty());
        assert_eq!(state.render_state(), RenderState::Main);
        assert_eq!(state.buffer.slots().cloned().collect::<Vec<_>>(), slots_before);
        assert_eq!(state.message_cursor, cursor_before);
    }

    #[test]
    fn test_delete_confirm_yes_removes_on_success() {
        let mut state = open_chat(ann(), vec![message(1, "a", false), message(2, "b", true)]);

        press(&mut state, KeyCode::Char('d'));
        let effects = press(&mut state, KeyCode::Char('y'));
        assert_eq!(
            effects,
            vec![Effect::Delete {
                peer: ann().peer,
                message_id: MessageId(2),
            }]
        );

        state.update(AppEvent::Backend(BackendResult::Deleted {
            peer: ann().peer,
            message_id: MessageId(2),
            result: Ok(()),
        }));
        assert!(!state.buffer.contains(MessageId(2)));
        assert_eq!(state.buffer.len(), CONVERSATION_CAPACITY);
        assert_eq!(state.message_cursor, state.buffer.last_real_index());
    }

    #[test]
    fn test_forward_failure_opens_error_modal() {
        let mut state = open_chat(ann(), vec![message(1, "a", false)]);

        press(&mut state, KeyCode::Char('f'));
        assert_eq!(state.render_state(), RenderState::Overlay(OverlayKind::Forward));
        let effects = press(&mut state, KeyCode::Enter);
        assert_eq!(
            effects,
            vec![Effect::Forward {
                from: ann().peer,
                to: bob().peer,
                message_ids: vec![MessageId(1)],
            }]
        );

        state.update(AppEvent::Backend(BackendResult::Forwarded {
            to: bob().peer,
            result: Err(MessengerError::forward("not allowed")),
        }));
        assert_eq!(state.render_state(), RenderState::Overlay(OverlayKind::Error));
    }

    #[test]
    fn test_history_failure_stops_spinner() {
        let mut state = UiState::default();
        state.bootstrap();
        state.update(AppEvent::Backend(BackendResult::DialogsLoaded {
            kind: ChatKind::User,
            result: Ok(DialogList::Users(vec![ann()])),
        }));
        press(&mut state, KeyCode::Enter);
        assert!(state.loading);

        state.update(AppEvent::Backend(BackendResult::HistoryLoaded {
            peer: ann().peer,
            result: Err(MessengerError::fetch_history("timeout")),
        }));
        assert!(!state.loading);
        assert_eq!(state.render_state(), RenderState::Overlay(OverlayKind::Error));
    }

    #[test]
    fn test_unread_conversation_is_marked_read() {
        let ann = ann().with_unread(3);
        let mut state = UiState::default();
        state.bootstrap();
        state.update(AppEvent::Backend(BackendResult::DialogsLoaded {
            kind: ChatKind::User,
            result: Ok(DialogList::Users(vec![ann.clone()])),
        }));
        press(&mut state, KeyCode::Enter);
        let effects = state.update(AppEvent::Backend(BackendResult::HistoryLoaded {
            peer: ann.peer,
            result: Ok(vec![message(1, "a", false)]),
        }));
        assert_eq!(effects, vec![Effect::MarkRead { peer: ann.peer }]);

        state.update(AppEvent::Backend(BackendResult::MarkedRead {
            peer: ann.peer,
            result: Ok(true),
        }));
        assert_eq!(state.sidebar.users[0].unread, 0);
        assert_eq!(state.active.as_ref().map(ChatEntry::unread), Some(0));
    }

    #[test]
    fn test_live_message_for_open_chat_follows_cursor() {
        let mut state = open_chat(ann(), vec![message(1, "a", false)]);
        let effects = state.update(AppEvent::Notification(Notification::NewMessage {
            peer: ann().peer,
            message: message(2, "b", false),
        }));

        assert!(effects.is_empty());
        assert_eq!(state.buffer.real_len(), 2);
        assert_eq!(state.message_cursor, state.buffer.last_real_index());
    }

    #[test]
    fn test_live_message_keeps_cursor_when_scrolled_up() {
        let mut state = open_chat(ann(), vec![message(1, "a", false), message(2, "b", false)]);
        press(&mut state, KeyCode::Up);
        let selected = state.selected_message().map(|(_, m)| m.id());
        assert_eq!(selected, Some(MessageId(1)));

        state.update(AppEvent::Notification(Notification::NewMessage {
            peer: ann().peer,
            message: message(3, "c", false),
        }));
        assert_eq!(state.selected_message().map(|(_, m)| m.id()), Some(MessageId(1)));
    }

    #[test]
    fn test_message_elsewhere_bumps_unread_and_notifies() {
        let mut state = open_chat(ann(), vec![message(1, "a", false)]);
        let incoming = FormattedMessage::new(7, "Bob", "see you at 5", false, Utc::now());

        let effects = state.update(AppEvent::Notification(Notification::NewMessage {
            peer: bob().peer,
            message: incoming.clone(),
        }));
        assert_eq!(state.sidebar.users[1].unread, 1);
        assert_eq!(
            effects,
            vec![Effect::DesktopNotify {
                title: "Bob".to_string(),
                body: "see you at 5".to_string(),
            }]
        );

        state.settings.notification_preview = false;
        let effects = state.update(AppEvent::Notification(Notification::NewMessage {
            peer: bob().peer,
            message: FormattedMessage::new(8, "Bob", "secret", false, Utc::now()),
        }));
        assert_eq!(
            effects,
            vec![Effect::DesktopNotify {
                title: "Bob".to_string(),
                body: GENERIC_NOTIFICATION_BODY.to_string(),
            }]
        );

        state.settings.notifications_enabled = false;
        let effects = state.update(AppEvent::Notification(Notification::NewMessage {
            peer: bob().peer,
            message: FormattedMessage::new(9, "Bob", "again", false, Utc::now()),
        }));
        assert!(effects.is_empty());
        assert_eq!(state.sidebar.users[1].unread, 3);
    }

    #[test]
    fn test_typing_and_status_updates() {
        let mut state = open_chat(ann(), vec![message(1, "a", false)]);
        state.typing = TypingTracker::with_timeout(Duration::ZERO);

        state.update(AppEvent::Notification(Notification::UserTyping {
            peer: bob().peer,
            user_id: bob().peer.id,
        }));
        assert!(state.sidebar.users[1].typing);

        state.update(AppEvent::Notification(Notification::UserStatus {
            user_id: 2,
            online: true,
            last_seen: "now".to_string(),
        }));
        assert!(state.sidebar.users[1].online);

        state.update(AppEvent::Tick);
        assert!(!state.sidebar.users[1].typing);
    }

    #[test]
    fn test_new_message_clears_typing_flag() {
        let mut state = open_chat(ann(), vec![message(1, "a", false)]);
        state.update(AppEvent::Notification(Notification::UserTyping {
            peer: ann().peer,
            user_id: 1,
        }));
        assert!(matches!(&state.active, Some(ChatEntry::User(u)) if u.typing));

        state.update(AppEvent::Notification(Notification::NewMessage {
            peer: ann().peer,
            message: message(2, "done", false).with_sender_detail(SenderDetail {
                user_id: 1,
                username: None,
                is_bot: false,
            }),
        }));
        assert!(matches!(&state.active, Some(ChatEntry::User(u)) if !u.typing));
        assert!(!state.typing.is_typing(ann().peer));
    }

    #[test]
    fn test_overlay_close_restores_background() {
        let mut state = open_chat(ann(), vec![message(1, "a", false), message(2, "b", false)]);
        press(&mut state, KeyCode::Up);
        let focus = state.focus();
        let mode = state.mode();
        let cursor = state.message_cursor;
        let slots: Vec<FormattedMessage> = state.buffer.slots().cloned().collect();

        ctrl(&mut state, 'f');
        assert_eq!(state.render_state(), RenderState::Overlay(OverlayKind::Search));
        let effects = type_text(&mut state, "bo");
        assert_eq!(effects.len(), 2);
        press(&mut state, KeyCode::Esc);

        assert_eq!(state.render_state(), RenderState::Main);
        assert_eq!(state.focus(), focus);
        assert_eq!(state.mode(), mode);
        assert_eq!(state.message_cursor, cursor);
        assert_eq!(state.buffer.slots().cloned().collect::<Vec<_>>(), slots);
        assert!(state.input.is_empty());
    }

    #[test]
    fn test_search_result_opens_conversation_in_its_mode() {
        let mut state = open_chat(ann(), vec![message(1, "a", false)]);
        ctrl(&mut state, 'f');
        let effects = type_text(&mut state, "fri");
        assert_eq!(
            effects.last(),
            Some(&Effect::Search {
                query: "fri".to_string()
            })
        );

        let friends = ChannelInfo::group(4, 44, "friends");
        state.update(AppEvent::Notification(Notification::SearchResult {
            query: "fri".to_string(),
            hits: SearchHits {
                users: Vec::new(),
                channels: vec![friends.clone()],
            },
        }));

        let effects = press(&mut state, KeyCode::Enter);
        assert_eq!(
            effects,
            vec![
                Effect::FetchDialogs(ChatKind::Group),
                Effect::LoadHistory { peer: friends.peer },
            ]
        );
        assert_eq!(state.mode(), Mode::Groups);
        assert_eq!(state.active_peer(), Some(friends.peer));
        assert_eq!(state.render_state(), RenderState::Main);
        assert_eq!(state.sidebar.groups.len(), 1);
    }

    #[test]
    fn test_search_result_without_overlay_is_ignored() {
        let mut state = UiState::default();
        state.update(AppEvent::Notification(Notification::SearchResult {
            query: "ann".to_string(),
            hits: SearchHits::default(),
        }));
        assert_eq!(state.render_state(), RenderState::Main);
    }

    #[test]
    fn test_scrolling_past_top_loads_older_page() {
        let mut state = open_chat(ann(), vec![message(10, "a", false), message(11, "b", false)]);
        press(&mut state, KeyCode::Up);
        let effects = press(&mut state, KeyCode::Up);
        assert_eq!(
            effects,
            vec![Effect::LoadOlder {
                peer: ann().peer,
                offset_id: MessageId(10),
            }]
        );
        assert!(press(&mut state, KeyCode::Up).is_empty());

        state.update(AppEvent::Backend(BackendResult::OlderHistoryLoaded {
            peer: ann().peer,
            offset_id: MessageId(10),
            result: Ok(vec![message(8, "x", false), message(9, "y", false)]),
        }));
        assert!(state.viewing_history);
        assert_eq!(state.buffer.real_len(), 4);
        assert_eq!(state.selected_message().map(|(_, m)| m.id()), Some(MessageId(9)));

        let effects = press(&mut state, KeyCode::End);
        assert_eq!(effects, vec![Effect::LoadHistory { peer: ann().peer }]);
        assert!(!state.viewing_history);
    }

    #[test]
    fn test_stories_overlay_receives_items() {
        let mut state = UiState::default();
        state.bootstrap();
        state.update(AppEvent::Backend(BackendResult::DialogsLoaded {
            kind: ChatKind::User,
            result: Ok(DialogList::Users(vec![ann()])),
        }));

        let effects = press(&mut state, KeyCode::Char('s'));
        assert_eq!(effects, vec![Effect::FetchStories { peer: ann().peer }]);

        state.update(AppEvent::Backend(BackendResult::StoriesLoaded {
            peer: ann().peer,
            result: Ok(vec![crate::domain::entities::StoryItem {
                id: 1,
                caption: "beach".to_string(),
                posted_at: Utc::now(),
                expired: false,
                media: None,
            }]),
        }));
        let Some(Overlay::Stories(viewer)) = &state.overlay else {
            panic!("expected story viewer");
        };
        assert!(!viewer.is_loading());
        assert_eq!(viewer.current().map(|s| s.caption.as_str()), Some("beach"));
    }

    #[test]
    fn test_backend_error_notification_opens_modal() {
        let mut state = UiState::default();
        state.update(AppEvent::Notification(Notification::Error {
            message: "session revoked".to_string(),
        }));
        assert_eq!(state.render_state(), RenderState::Overlay(OverlayKind::Error));
        ctrl(&mut state, 'c');
        assert_eq!(state.render_state(), RenderState::Main);
        assert!(!state.should_quit);

        ctrl(&mut state, 'c');
        assert!(state.should_quit);
    }
}
