//! Application services.

mod conversation_buffer;
mod notification_bridge;
mod pagination_cache;
mod search_debouncer;
mod typing_tracker;

pub use conversation_buffer::{CONVERSATION_CAPACITY, ConversationBuffer};
pub use notification_bridge::{DEFAULT_BRIDGE_CAPACITY, NotificationBridge};
pub use pagination_cache::{
    CacheStats, CachedPage, DEFAULT_PAGE_CACHE_SIZE, DEFAULT_PAGE_TTL, PaginationCache,
};
pub use search_debouncer::{MIN_QUERY_CHARS, SEARCH_DEBOUNCE, SearchDebouncer};
pub use typing_tracker::{TYPING_TIMEOUT, TypingTracker, format_typing_indicator};
