//! Periodic task runner shared by the polling coordinators.

#[cfg(test)]
#[path = "poller_test.rs"]
mod poller_test;

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

/// Owns a coordinator's background task. Dropping the handle stops it.
///
/// Only the timer is torn down. Each tick runs as its own task, so a fetch
/// in flight at teardown still runs to completion and writes its result.
#[derive(Debug)]
pub struct CoordinatorHandle {
    name: &'static str,
    task: JoinHandle<()>,
}

impl CoordinatorHandle {
    pub(crate) fn new(name: &'static str, task: JoinHandle<()>) -> Self {
        Self { name, task }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the task now. Equivalent to dropping the handle.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for CoordinatorHandle {
    fn drop(&mut self) {
        debug!(coordinator = self.name, "coordinator stopped");
        self.task.abort();
    }
}

/// Run `tick` every `period`, first at `now + period` (or immediately as
/// well when `run_first`). Ticks missed while a fetch runs are skipped,
/// not bunched.
///
/// The loop waits for each tick before arming the next one, but the tick
/// itself is spawned: aborting the loop detaches it instead of cancelling it.
pub(crate) fn spawn_poller<F, Fut>(name: &'static str, period: Duration, run_first: bool, mut tick: F) -> CoordinatorHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        if run_first {
            run_detached(name, tick()).await;
        }
        loop {
            ticker.tick().await;
            run_detached(name, tick()).await;
        }
    });
    CoordinatorHandle::new(name, task)
}

async fn run_detached<Fut>(name: &'static str, fut: Fut)
where
    Fut: Future<Output = ()> + Send + 'static,
{
    if let Err(e) = tokio::spawn(fut).await {
        debug!(coordinator = name, error = %e, "poll tick did not complete");
    }
}
