//! Cancellable-timer debouncing.
//!
//! Every [`Debouncer::trigger`] (re)starts a fixed-delay timer carrying the
//! newest event. Only an event that survives a full quiet period is
//! delivered, exactly once, on the receiver returned by [`Debouncer::new`].

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Coalesces bursts of events into the last one.
///
/// Must be used from within a tokio runtime.
pub struct Debouncer<T> {
    delay: Duration,
    sender: mpsc::UnboundedSender<T>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Create a debouncer and the receiver for its settled events.
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Self {
                delay,
                sender,
                pending: None,
            },
            receiver,
        )
    }

    /// Schedule `event`, cancelling any event still waiting.
    pub fn trigger(&mut self, event: T) {
        if self.cancel() {
            tracing::trace!("Debounce timer restarted");
        }
        let delay = self.delay;
        let sender = self.sender.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = sender.send(event);
        }));
    }

    /// Drop the waiting event, if any. Returns whether one was cancelled.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    /// Whether an event is waiting for its deadline.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
