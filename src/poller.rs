//! Scheduled refresh task with an explicit start/stop lifecycle.
//!
//! DESIGN
//! ======
//! A poller owns one background task that runs its job immediately and then
//! once per interval. Ticks are serialized: the loop awaits each job before
//! waiting for the next tick, and ticks missed while a slow job was in flight
//! are skipped rather than bursted. Two fetches from the same poller never
//! overlap, so responses cannot land out of issue order.
//!
//! The owning view calls [`Poller::stop`] on teardown; dropping the poller
//! stops it too, so a forgotten poller cannot outlive its view.

#[cfg(test)]
#[path = "poller_test.rs"]
mod poller_test;

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

const MIN_INTERVAL: Duration = Duration::from_millis(1);

pub struct Poller {
    name: &'static str,
    interval: Duration,
    handle: Option<JoinHandle<()>>,
}

impl Poller {
    /// Spawn the polling task with the first run immediately. Must be called
    /// inside a Tokio runtime.
    pub fn start<F, Fut>(name: &'static str, interval: Duration, job: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self::spawn(name, interval, Instant::now(), job)
    }

    /// Like [`Poller::start`], for callers that already fetched on mount:
    /// the first run waits one full interval.
    pub fn start_after_interval<F, Fut>(name: &'static str, interval: Duration, job: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let interval = interval.max(MIN_INTERVAL);
        Self::spawn(name, interval, Instant::now() + interval, job)
    }

    fn spawn<F, Fut>(name: &'static str, interval: Duration, first_run: Instant, mut job: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let interval = interval.max(MIN_INTERVAL);
        let interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        info!(poller = name, interval_ms, "poller started");
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(first_run, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                job().await;
            }
        });
        Self { name, interval, handle: Some(handle) }
    }

    /// Cancel the timer. Idempotent.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!(poller = self.name, "poller stopped");
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}
