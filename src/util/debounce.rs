//! Trailing-edge debounce.
//!
//! Each call cancels the pending timer and starts a new one; the wrapped
//! function runs once, `wait` after the last call, with the last argument.
//! Requires a tokio runtime.

#[cfg(test)]
#[path = "debounce_test.rs"]
mod debounce_test;

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

pub struct Debouncer<A> {
    func: Arc<dyn Fn(A) + Send + Sync>,
    wait: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<A: Send + 'static> Debouncer<A> {
    #[must_use]
    pub fn new(func: impl Fn(A) + Send + Sync + 'static, wait: Duration) -> Self {
        Self { func: Arc::new(func), wait, pending: Mutex::new(None) }
    }

    /// Schedule `func(arg)`, superseding any call still waiting.
    pub fn call(&self, arg: A) {
        let func = Arc::clone(&self.func);
        let wait = self.wait;
        let task = tokio::spawn(async move {
            tokio::time::sleep(wait).await;
            func(arg);
        });
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.replace(task) {
            previous.abort();
        }
    }

    /// Drop the pending call, if any.
    pub fn cancel(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.take() {
            previous.abort();
        }
    }
}

impl<A> Drop for Debouncer<A> {
    fn drop(&mut self) {
        let pending = self.pending.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(task) = pending.take() {
            task.abort();
        }
    }
}

/// Shorthand for [`Debouncer::new`].
#[must_use]
pub fn debounce<A: Send + 'static>(func: impl Fn(A) + Send + Sync + 'static, wait: Duration) -> Debouncer<A> {
    Debouncer::new(func, wait)
}
