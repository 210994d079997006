//! Side effects requested by the dispatcher and the runner that performs them.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::application::services::{
    CONVERSATION_CAPACITY, CachedPage, DEFAULT_PAGE_CACHE_SIZE, DEFAULT_PAGE_TTL, PaginationCache,
    SearchDebouncer,
};
use crate::domain::entities::{ChatKind, MessageId, Peer};
use crate::domain::notification::Notification;
use crate::domain::ports::{MessengerPort, NotificationPort, SendMediaRequest, SendTextRequest};
use crate::presentation::events::{AppEvent, BackendResult};

/// Pause before a typing action is sent, so a burst of keys costs one call.
pub const TYPING_ACTION_DELAY: Duration = Duration::from_millis(250);

/// Work the dispatcher asks for. State is never touched here; results come
/// back as [`AppEvent`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchDialogs(ChatKind),
    LoadHistory {
        peer: Peer,
    },
    LoadOlder {
        peer: Peer,
        offset_id: MessageId,
    },
    SendText(SendTextRequest),
    SendMedia(SendMediaRequest),
    Edit {
        peer: Peer,
        index: usize,
        message_id: MessageId,
        text: String,
    },
    Delete {
        peer: Peer,
        message_id: MessageId,
    },
    Forward {
        from: Peer,
        to: Peer,
        message_ids: Vec<MessageId>,
    },
    MarkRead {
        peer: Peer,
    },
    SetTyping {
        peer: Peer,
    },
    Search {
        query: String,
    },
    FetchStories {
        peer: Peer,
    },
    DesktopNotify {
        title: String,
        body: String,
    },
}

impl Effect {
    pub fn send_media(peer: Peer, path: PathBuf, caption: String, reply_to: Option<MessageId>) -> Self {
        Self::SendMedia(SendMediaRequest {
            peer,
            path,
            caption,
            reply_to,
        })
    }
}

/// Spawns one task per effect and posts its completion back to the loop.
pub struct EffectRunner {
    messenger: Arc<dyn MessengerPort>,
    notifier: Arc<dyn NotificationPort>,
    page_cache: Arc<PaginationCache>,
    events: mpsc::UnboundedSender<AppEvent>,
    debouncer: SearchDebouncer,
}

impl EffectRunner {
    #[must_use]
    pub fn new(
        messenger: Arc<dyn MessengerPort>,
        notifier: Arc<dyn NotificationPort>,
        events: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            messenger,
            notifier,
            page_cache: Arc::new(PaginationCache::new(DEFAULT_PAGE_CACHE_SIZE, DEFAULT_PAGE_TTL)),
            events,
            debouncer: SearchDebouncer::default(),
        }
    }

    #[must_use]
    pub fn page_cache(&self) -> &PaginationCache {
        &self.page_cache
    }

    pub fn run_all(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            self.run(effect);
        }
    }

    pub fn run(&mut self, effect: Effect) {
        let messenger = Arc::clone(&self.messenger);
        match effect {
            Effect::FetchDialogs(kind) => self.spawn(async move {
                let result = messenger.get_dialogs(kind).await;
                BackendResult::DialogsLoaded { kind, result }
            }),
            Effect::LoadHistory { peer } => self.spawn(async move {
                let result = messenger
                    .get_history(peer, CONVERSATION_CAPACITY, MessageId::EMPTY)
                    .await;
                BackendResult::HistoryLoaded { peer, result }
            }),
            Effect::LoadOlder { peer, offset_id } => self.load_older(peer, offset_id),
            Effect::SendText(request) => self.spawn(async move {
                let peer = request.peer;
                let result = messenger.send_text(request).await;
                BackendResult::Sent { peer, result }
            }),
            Effect::SendMedia(request) => self.spawn(async move {
                let peer = request.peer;
                let result = messenger.send_media(request).await;
                BackendResult::Sent { peer, result }
            }),
            Effect::Edit {
                peer,
                index,
                message_id,
                text,
            } => {
                let cache = Arc::clone(&self.page_cache);
                self.spawn(async move {
                    let result = messenger.edit_message(peer, message_id, text.clone()).await;
                    if matches!(result, Ok(true)) {
                        cache.invalidate(&peer.cache_key());
                    }
                    BackendResult::Edited {
                        peer,
                        index,
                        message_id,
                        text,
                        result,
                    }
                });
            }
            Effect::Delete { peer, message_id } => {
                let cache = Arc::clone(&self.page_cache);
                self.spawn(async move {
                    let result = messenger.delete_message(peer, message_id).await;
                    if result.is_ok() {
                        cache.invalidate(&peer.cache_key());
                    }
                    BackendResult::Deleted {
                        peer,
                        message_id,
                        result,
                    }
                });
            }
            Effect::Forward {
                from,
                to,
                message_ids,
            } => self.spawn(async move {
                let result = messenger.forward_messages(from, to, message_ids).await;
                BackendResult::Forwarded { to, result }
            }),
            Effect::MarkRead { peer } => self.spawn(async move {
                let result = messenger.mark_read(peer).await;
                BackendResult::MarkedRead { peer, result }
            }),
            Effect::SetTyping { peer } => {
                tokio::spawn(async move {
                    tokio::time::sleep(TYPING_ACTION_DELAY).await;
                    if let Err(e) = messenger.set_typing(peer).await {
                        debug!(peer = %peer, error = %e, "Typing action failed");
                    }
                });
            }
            Effect::Search { query } => self.search(query),
            Effect::FetchStories { peer } => self.spawn(async move {
                let result = messenger.get_stories(peer).await;
                BackendResult::StoriesLoaded { peer, result }
            }),
            Effect::DesktopNotify { title, body } => self.notifier.send(&title, &body),
        }
    }

    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = BackendResult> + Send + 'static,
    {
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = task.await;
            post(&events, result.into());
        });
    }

    fn load_older(&self, peer: Peer, offset_id: MessageId) {
        let key = peer.cache_key();
        if let Some(page) = self.page_cache.get(&key).filter(|p| p.offset_id == offset_id) {
            debug!(peer = %peer, offset_id = %offset_id, "Serving older page from cache");
            post(
                &self.events,
                BackendResult::OlderHistoryLoaded {
                    peer,
                    offset_id,
                    result: Ok(page.messages),
                }
                .into(),
            );
            return;
        }

        let messenger = Arc::clone(&self.messenger);
        let cache = Arc::clone(&self.page_cache);
        self.spawn(async move {
            let result = messenger
                .get_history(peer, CONVERSATION_CAPACITY, offset_id)
                .await;
            if let Ok(messages) = &result
                && !messages.is_empty()
            {
                cache.put(
                    key,
                    CachedPage {
                        offset_id,
                        messages: messages.clone(),
                    },
                );
            }
            BackendResult::OlderHistoryLoaded {
                peer,
                offset_id,
                result,
            }
        });
    }

    fn search(&mut self, query: String) {
        if !SearchDebouncer::qualifies(&query) {
            self.debouncer.cancel();
            return;
        }
        let messenger = Arc::clone(&self.messenger);
        let events = self.events.clone();
        self.debouncer.schedule(query, move |query| async move {
            let notification = match messenger.search(query.clone()).await {
                Ok(hits) => Notification::SearchResult { query, hits },
                Err(e) => {
                    warn!(query = %query, error = %e, "Search failed");
                    Notification::Error {
                        message: format!("Search failed: {e}"),
                    }
                }
            };
            post(&events, notification.into());
        });
    }
}

fn post(events: &mpsc::UnboundedSender<AppEvent>, event: AppEvent) {
    if events.send(event).is_err() {
        debug!("Event loop gone, dropping event");
    }
}
