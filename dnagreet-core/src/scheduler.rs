//! Repeating timers with explicit cancellation
//!
//! A [`RepeatingTask`] owns a tokio task that fires every `period`, first
//! firing one full period after it is spawned. Cancelling (or dropping) the
//! handle aborts the task, so nothing keeps recomputing after the view that
//! started it is gone.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Handle to a periodic task. Must be created inside a tokio runtime.
#[derive(Debug)]
pub struct RepeatingTask {
    name: &'static str,
    handle: Option<JoinHandle<()>>,
    ticks: Arc<AtomicU64>,
}

impl RepeatingTask {
    /// Run `task` every `period` until cancelled.
    pub fn spawn<F>(name: &'static str, period: Duration, mut task: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let ticks = Arc::new(AtomicU64::new(0));
        let counter = ticks.clone();

        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                task();
                counter.fetch_add(1, Ordering::Relaxed);
            }
        });

        tracing::debug!(task = name, period_ms = period.as_millis() as u64, "Timer started");

        Self {
            name,
            handle: Some(handle),
            ticks,
        }
    }

    /// Stop the task. Idempotent.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::debug!(task = self.name, ticks = self.ticks(), "Timer cancelled");
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// How many times the task has run.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }
}

impl Drop for RepeatingTask {
    fn drop(&mut self) {
        self.cancel();
    }
}
