//! Search Debouncer
//!
//! Defers search input until the user stops typing.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Default quiet period before a search is applied.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

// == Search Debouncer ==
/// Cancellable deferred delivery of search text.
///
/// Each `schedule` aborts the pending delivery, if any, and starts a new
/// timer. When a timer completes its text is sent on the channel returned by
/// `new`; the owner of the session controller drains that channel into
/// `on_search`. Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct SearchDebouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<String>,
}

impl SearchDebouncer {
    /// Creates a debouncer and the receiver its settled searches arrive on.
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let debouncer = Self {
            delay,
            pending: None,
            tx,
        };
        (debouncer, rx)
    }

    // == Schedule ==
    /// Replaces any pending search with `text`, due after the quiet period.
    pub fn schedule(&mut self, text: impl Into<String>) {
        self.cancel();

        let text = text.into();
        let tx = self.tx.clone();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            debug!(search = %text, "debounced search settled");
            // Receiver gone means nobody wants the result any more
            let _ = tx.send(text);
        }));
    }

    // == Cancel ==
    /// Drops the pending search without delivering it.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// True while a scheduled search has not been delivered yet.
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
