//! Greeting sessions
//!
//! A [`GreetingSession`] is one "page load": it records the visit exactly
//! once when started, then recomputes the greeting whenever it is ticked.
//! [`LiveGreeting`] drives a session with two timers (the clock refresh and
//! the status poll) and hands every fresh [`GreetingView`] to a render
//! callback until stopped.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Utc};

use crate::clock::Clock;
use crate::format::clock_time;
use crate::greeting::{compute_greeting, dynamic_status};
use crate::random::RandomSource;
use crate::scheduler::RepeatingTask;
use crate::store::KeyValueStore;
use crate::types::{GreetingResult, GreetingView, VisitorContext};
use crate::visits::record_visit;

/// Greeting state for one page load.
pub struct GreetingSession {
    clock: Arc<dyn Clock>,
    rng: Box<dyn RandomSource>,
    visitor: VisitorContext,
    display_time: DateTime<FixedOffset>,
    greeting: GreetingResult,
}

impl GreetingSession {
    /// Register the page load in `store`, then compute the first greeting.
    ///
    /// This is the only place a session writes to the store.
    pub fn start(
        store: &dyn KeyValueStore,
        clock: Arc<dyn Clock>,
        rng: Box<dyn RandomSource>,
        referrer: Option<String>,
    ) -> Self {
        let now = clock.now();
        let visitor = record_visit(store, now.with_timezone(&Utc), referrer);
        Self::with_visitor(visitor, clock, rng)
    }

    /// Build a session for an already known visitor, without any storage.
    pub fn with_visitor(
        visitor: VisitorContext,
        clock: Arc<dyn Clock>,
        mut rng: Box<dyn RandomSource>,
    ) -> Self {
        let display_time = clock.now();
        let greeting = compute_greeting(&display_time, &visitor, rng.as_mut());
        Self {
            clock,
            rng,
            visitor,
            display_time,
            greeting,
        }
    }

    /// Clock tick: re-read the time and recompute. Never touches the store.
    pub fn tick(&mut self) {
        self.display_time = self.clock.now();
        self.greeting = compute_greeting(&self.display_time, &self.visitor, self.rng.as_mut());
    }

    pub fn visitor(&self) -> &VisitorContext {
        &self.visitor
    }

    pub fn greeting(&self) -> &GreetingResult {
        &self.greeting
    }

    /// Instant of the last tick (or of the start).
    pub fn display_time(&self) -> DateTime<FixedOffset> {
        self.display_time
    }

    /// Flat view for rendering.
    ///
    /// The status bucket is chosen from a fresh clock read, not from the
    /// display time, so it keeps rotating between ticks.
    pub fn view(&self) -> GreetingView {
        let sampled_at = self.clock.now();
        GreetingView {
            greeting: self.greeting.clone(),
            dynamic_status: dynamic_status(&self.greeting, &self.display_time, &sampled_at),
            visitor_context: self.visitor.clone(),
            current_time: clock_time(&self.display_time),
        }
    }
}

/// Timer settings for a [`LiveGreeting`].
#[derive(Debug, Clone, Copy)]
pub struct LiveTimers {
    /// Clock refresh (recomputes the greeting)
    pub refresh_interval: Duration,
    /// Re-render only, so the status rotates
    pub status_poll: Duration,
}

impl Default for LiveTimers {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(60),
            status_poll: Duration::from_secs(10),
        }
    }
}

impl From<&crate::config::GreetingConfig> for LiveTimers {
    fn from(config: &crate::config::GreetingConfig) -> Self {
        Self {
            refresh_interval: config.refresh_interval(),
            status_poll: config.status_poll(),
        }
    }
}

/// A session kept up to date by timers.
pub struct LiveGreeting {
    session: Arc<Mutex<GreetingSession>>,
    refresh: Option<RepeatingTask>,
    status: Option<RepeatingTask>,
}

fn lock(session: &Mutex<GreetingSession>) -> MutexGuard<'_, GreetingSession> {
    session.lock().unwrap_or_else(|e| e.into_inner())
}

impl LiveGreeting {
    /// Render once immediately, then keep rendering on both timers.
    ///
    /// Must be called inside a tokio runtime.
    pub fn start<R>(session: GreetingSession, timers: LiveTimers, render: R) -> Self
    where
        R: Fn(&GreetingView) + Send + Sync + 'static,
    {
        let session = Arc::new(Mutex::new(session));
        let render = Arc::new(render);

        let initial = lock(&session).view();
        render(&initial);

        let refresh = {
            let session = session.clone();
            let render = render.clone();
            RepeatingTask::spawn("greeting-refresh", timers.refresh_interval, move || {
                let view = {
                    let mut guard = lock(&session);
                    guard.tick();
                    guard.view()
                };
                render(&view);
            })
        };

        let status = {
            let session = session.clone();
            let render = render.clone();
            RepeatingTask::spawn("status-poll", timers.status_poll, move || {
                let view = lock(&session).view();
                render(&view);
            })
        };

        tracing::info!(
            refresh_secs = timers.refresh_interval.as_secs(),
            status_poll_secs = timers.status_poll.as_secs(),
            "Live greeting started"
        );

        Self {
            session,
            refresh: Some(refresh),
            status: Some(status),
        }
    }

    /// Current view, computed on demand.
    pub fn view(&self) -> GreetingView {
        lock(&self.session).view()
    }

    /// Number of clock refreshes so far.
    pub fn refresh_count(&self) -> u64 {
        self.refresh.as_ref().map(|t| t.ticks()).unwrap_or(0)
    }

    pub fn is_running(&self) -> bool {
        self.refresh.as_ref().is_some_and(|t| t.is_active())
            || self.status.as_ref().is_some_and(|t| t.is_active())
    }

    /// Cancel both timers. Idempotent.
    pub fn stop(&mut self) {
        let was_running = self.refresh.is_some() || self.status.is_some();
        if let Some(mut task) = self.refresh.take() {
            task.cancel();
        }
        if let Some(mut task) = self.status.take() {
            task.cancel();
        }
        if was_running {
            tracing::info!("Live greeting stopped");
        }
    }
}

impl Drop for LiveGreeting {
    fn drop(&mut self) {
        self.stop();
    }
}
