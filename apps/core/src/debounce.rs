use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheduled {
    /// Empty input: nothing scheduled, results should be cleared now.
    Cleared,
    Pending(u64),
}

/// Delays search dispatch until typing pauses. Every call supersedes the
/// previous one; a generation number identifies the intent that may still
/// apply its results.
pub struct QueryDebouncer {
    delay: Duration,
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

impl QueryDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            pending: None,
        }
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Cancels any pending intent and, for non-empty text, spawns a new one
    /// that runs `dispatch(generation)` once the delay has elapsed.
    pub fn on_input<F, Fut>(&mut self, text: &str, dispatch: F) -> Scheduled
    where
        F: FnOnce(u64) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.cancel();

        if text.is_empty() {
            return Scheduled::Cleared;
        }

        let generation = self.generation;
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            dispatch(generation).await;
        }));
        Scheduled::Pending(generation)
    }

    pub fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

impl Default for QueryDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Drop for QueryDebouncer {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}
