//! Trailing-edge debouncing on the tokio timer.
//!
//! Each call replaces the pending callback, so a burst of calls runs only
//! the last callback once the burst has been quiet for `delay`.

use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Default quiet window before the review table is refreshed.
pub const DEFAULT_THROTTLE_MS: u64 = 300;

pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `f` after the quiet window, dropping any callback that is
    /// still waiting. Must be called from within a tokio runtime.
    pub fn call<F>(&mut self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.cancel() {
            debug!("Debounced callback superseded");
        }

        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            f();
        }));
    }

    /// Drop the pending callback. Returns whether one was waiting.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
