//! Fixed-size window over the open conversation.

use std::collections::{HashSet, VecDeque};

use crate::domain::entities::{FormattedMessage, MessageId};

/// Number of slots in the conversation window.
pub const CONVERSATION_CAPACITY: usize = 50;

/// Fixed-capacity, oldest-first window of messages.
///
/// The window always holds exactly [`CONVERSATION_CAPACITY`] slots. Slots
/// without a real message hold the empty placeholder, and real messages are
/// always contiguous at the tail so the newest message sits in the last slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationBuffer {
    slots: VecDeque<FormattedMessage>,
}

impl ConversationBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: std::iter::repeat_with(FormattedMessage::empty)
                .take(CONVERSATION_CAPACITY)
                .collect(),
        }
    }

    /// Always [`CONVERSATION_CAPACITY`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        CONVERSATION_CAPACITY
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&FormattedMessage> {
        self.slots.get(index)
    }

    /// All slots including placeholders.
    pub fn slots(&self) -> impl Iterator<Item = &FormattedMessage> {
        self.slots.iter()
    }

    /// Real messages, oldest first.
    pub fn messages(&self) -> impl Iterator<Item = &FormattedMessage> {
        self.slots.iter().filter(|m| !m.is_empty())
    }

    /// Number of real messages.
    #[must_use]
    pub fn real_len(&self) -> usize {
        self.messages().count()
    }

    #[must_use]
    pub fn has_messages(&self) -> bool {
        self.slots.back().is_some_and(|m| !m.is_empty())
    }

    /// Index of the oldest real message.
    #[must_use]
    pub fn first_real_index(&self) -> Option<usize> {
        self.slots.iter().position(|m| !m.is_empty())
    }

    /// Index of the newest real message.
    #[must_use]
    pub fn last_real_index(&self) -> Option<usize> {
        self.has_messages().then(|| self.slots.len() - 1)
    }

    #[must_use]
    pub fn oldest_id(&self) -> Option<MessageId> {
        self.messages().next().map(FormattedMessage::id)
    }

    #[must_use]
    pub fn position(&self, id: MessageId) -> Option<usize> {
        if id.is_empty() {
            return None;
        }
        self.slots.iter().position(|m| m.id() == id)
    }

    #[must_use]
    pub fn contains(&self, id: MessageId) -> bool {
        self.position(id).is_some()
    }

    /// Drops all content.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Reconciles a freshly fetched page with the current content.
    ///
    /// A page of at least capacity size replaces the window with its first
    /// [`CONVERSATION_CAPACITY`] messages. A shorter page of `k` messages is
    /// appended after the oldest `capacity - k` messages already shown.
    /// Messages of the page that are already shown are not duplicated.
    pub fn merge(&mut self, page: Vec<FormattedMessage>) {
        let page: Vec<FormattedMessage> = page.into_iter().filter(|m| !m.is_empty()).collect();

        if page.len() >= CONVERSATION_CAPACITY {
            self.fill(page.into_iter().take(CONVERSATION_CAPACITY).collect());
            return;
        }

        let incoming: HashSet<MessageId> = page.iter().map(FormattedMessage::id).collect();
        let keep = CONVERSATION_CAPACITY - page.len();
        let mut combined: Vec<FormattedMessage> = self
            .messages()
            .filter(|m| !incoming.contains(&m.id()))
            .take(keep)
            .cloned()
            .collect();
        combined.extend(page);
        self.fill(combined);
    }

    /// Appends a live message, sliding the oldest slot out.
    ///
    /// Returns `false` if the message is already shown.
    pub fn push(&mut self, message: FormattedMessage) -> bool {
        if message.is_empty() || self.contains(message.id()) {
            return false;
        }
        self.slots.pop_front();
        self.slots.push_back(message);
        true
    }

    /// Places an older page in front of the current content.
    ///
    /// The oldest messages overall are kept when the result exceeds the
    /// capacity. Returns how many of the page's messages were placed.
    pub fn prepend_older(&mut self, page: Vec<FormattedMessage>) -> usize {
        let known: HashSet<MessageId> = self.messages().map(FormattedMessage::id).collect();
        let older: Vec<FormattedMessage> = page
            .into_iter()
            .filter(|m| !m.is_empty() && !known.contains(&m.id()))
            .collect();
        let placed = older.len().min(CONVERSATION_CAPACITY);

        let combined: Vec<FormattedMessage> = older
            .into_iter()
            .chain(self.messages().cloned())
            .take(CONVERSATION_CAPACITY)
            .collect();
        self.fill(combined);
        placed
    }

    /// Replaces the text of the message at `index` if it still has `id`.
    pub fn replace_content(&mut self, index: usize, id: MessageId, content: &str) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) if !id.is_empty() && slot.id() == id => {
                *slot = slot.with_content(content);
                true
            }
            _ => false,
        }
    }

    /// Removes a message, re-padding at the front. Returns its former index.
    pub fn remove(&mut self, id: MessageId) -> Option<usize> {
        let index = self.position(id)?;
        self.slots.remove(index);
        self.slots.push_front(FormattedMessage::empty());
        Some(index)
    }

    fn fill(&mut self, messages: Vec<FormattedMessage>) {
        let padding = CONVERSATION_CAPACITY.saturating_sub(messages.len());
        self.slots = std::iter::repeat_with(FormattedMessage::empty)
            .take(padding)
            .chain(messages)
            .collect();
    }
}

impl Default for ConversationBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use test_case::test_case;

    fn message(id: i64) -> FormattedMessage {
        FormattedMessage::new(id, "alice", format!("message {id}"), false, Utc::now())
    }

    fn page(ids: std::ops::Range<i64>) -> Vec<FormattedMessage> {
        ids.map(message).collect()
    }

    fn real_ids(buffer: &ConversationBuffer) -> Vec<i64> {
        buffer.messages().map(|m| m.id().as_i64()).collect()
    }

    fn assert_tail_contiguous(buffer: &ConversationBuffer) {
        let first = buffer.first_real_index().unwrap_or(buffer.len());
        assert!(buffer.slots().take(first).all(FormattedMessage::is_empty));
        assert!(buffer.slots().skip(first).all(|m| !m.is_empty()));
    }

    #[test]
    fn test_new_buffer_is_all_placeholders() {
        let buffer = ConversationBuffer::new();
        assert_eq!(buffer.len(), CONVERSATION_CAPACITY);
        assert_eq!(buffer.real_len(), 0);
        assert_eq!(buffer.last_real_index(), None);
    }

    #[test_case(0, 0 ; "empty page into empty buffer")]
    #[test_case(0, 10 ; "short page into empty buffer")]
    #[test_case(20, 10 ; "short page into partial buffer")]
    #[test_case(45, 10 ; "overflowing short page")]
    #[test_case(50, 49 ; "almost full page")]
    #[test_case(10, 50 ; "exactly full page")]
    #[test_case(30, 80 ; "oversized page")]
    fn test_merge_keeps_capacity(existing: i64, incoming: i64) {
        let mut buffer = ConversationBuffer::new();
        buffer.merge(page(1..existing + 1));
        assert_eq!(buffer.len(), CONVERSATION_CAPACITY);

        buffer.merge(page(1000..1000 + incoming));
        assert_eq!(buffer.len(), CONVERSATION_CAPACITY);
        assert_tail_contiguous(&buffer);
    }

    #[test]
    fn test_full_page_replaces_verbatim() {
        let mut buffer = ConversationBuffer::new();
        buffer.merge(page(1..21));

        let incoming = page(100..170);
        buffer.merge(incoming.clone());

        let expected: Vec<i64> = (100..150).collect();
        assert_eq!(real_ids(&buffer), expected);
        assert_eq!(buffer.get(0), incoming.first());
    }

    #[test_case(30, 5 ; "plenty of room")]
    #[test_case(50, 10 ; "full buffer")]
    #[test_case(48, 49 ; "one kept")]
    fn test_short_page_keeps_oldest_existing(existing: i64, k: i64) {
        let mut buffer = ConversationBuffer::new();
        buffer.merge(page(1..existing + 1));

        buffer.merge(page(1000..1000 + k));

        let keep = (50 - k).min(existing);
        let mut expected: Vec<i64> = (1..=keep).collect();
        expected.extend(1000..1000 + k);
        assert_eq!(real_ids(&buffer), expected);
    }

    #[test]
    fn test_merge_skips_already_shown() {
        let mut buffer = ConversationBuffer::new();
        buffer.merge(page(1..4));
        buffer.merge(page(3..6));
        assert_eq!(real_ids(&buffer), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_merge_ignores_placeholders_in_page() {
        let mut buffer = ConversationBuffer::new();
        buffer.merge(vec![FormattedMessage::empty(), message(7)]);
        assert_eq!(real_ids(&buffer), vec![7]);
    }

    #[test]
    fn test_push_slides_window() {
        let mut buffer = ConversationBuffer::new();
        buffer.merge(page(1..51));

        assert!(buffer.push(message(51)));

        assert_eq!(buffer.len(), CONVERSATION_CAPACITY);
        assert_eq!(buffer.oldest_id(), Some(MessageId(2)));
        assert_eq!(buffer.get(49).map(FormattedMessage::id), Some(MessageId(51)));
    }

    #[test]
    fn test_push_rejects_duplicate() {
        let mut buffer = ConversationBuffer::new();
        buffer.merge(page(1..3));
        assert!(!buffer.push(message(2)));
        assert_eq!(buffer.real_len(), 2);
    }

    #[test]
    fn test_prepend_older() {
        let mut buffer = ConversationBuffer::new();
        buffer.merge(page(10..20));

        let placed = buffer.prepend_older(page(5..10));

        assert_eq!(placed, 5);
        assert_eq!(real_ids(&buffer), (5..20).collect::<Vec<_>>());
        assert_tail_contiguous(&buffer);
    }

    #[test]
    fn test_prepend_older_keeps_oldest_when_full() {
        let mut buffer = ConversationBuffer::new();
        buffer.merge(page(100..140));

        buffer.prepend_older(page(80..100));

        assert_eq!(buffer.real_len(), CONVERSATION_CAPACITY);
        assert_eq!(buffer.oldest_id(), Some(MessageId(80)));
        assert_eq!(buffer.get(49).map(FormattedMessage::id), Some(MessageId(129)));
    }

    #[test]
    fn test_replace_content_checks_identity() {
        let mut buffer = ConversationBuffer::new();
        buffer.merge(page(1..4));
        let index = buffer.position(MessageId(2)).unwrap();

        assert!(!buffer.replace_content(index, MessageId(3), "wrong"));
        assert!(buffer.replace_content(index, MessageId(2), "edited"));

        assert_eq!(buffer.get(index).unwrap().content(), "edited");
        assert_eq!(buffer.real_len(), 3);
    }

    #[test]
    fn test_remove_repads_front() {
        let mut buffer = ConversationBuffer::new();
        buffer.merge(page(1..4));

        let removed = buffer.remove(MessageId(2));

        assert_eq!(removed, Some(48));
        assert_eq!(real_ids(&buffer), vec![1, 3]);
        assert_eq!(buffer.len(), CONVERSATION_CAPACITY);
        assert_tail_contiguous(&buffer);
        assert_eq!(buffer.remove(MessageId(2)), None);
    }

    #[test]
    fn test_placeholder_id_never_matches() {
        let buffer = ConversationBuffer::new();
        assert_eq!(buffer.position(MessageId::EMPTY), None);
    }
}
