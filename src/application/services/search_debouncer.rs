//! Quiet-period scheduling for remote search.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::trace;

/// Quiet period before a search is issued.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Shortest query worth sending to the backend.
pub const MIN_QUERY_CHARS: usize = 3;

/// Runs at most one search per burst of keystrokes.
///
/// Each scheduled query replaces the pending one, so only the text typed
/// last before a full quiet period reaches the backend.
pub struct SearchDebouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl SearchDebouncer {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Whether `query` is long enough to be searched.
    #[must_use]
    pub fn qualifies(query: &str) -> bool {
        query.trim().chars().count() >= MIN_QUERY_CHARS
    }

    /// Schedules `run(query)` after the quiet period, cancelling any pending one.
    pub fn schedule<F, Fut>(&mut self, query: String, run: F)
    where
        F: FnOnce(String) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let deadline = Instant::now() + self.delay;
        trace!(query = %query, "Search scheduled");
        self.pending = Some(tokio::spawn(async move {
            sleep_until(deadline).await;
            run(query).await;
        }));
    }

    /// Drops the pending search, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
