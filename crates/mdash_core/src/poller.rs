//! Periodic fetch driver.
//!
//! A [`Poller`] invokes a fetch immediately, then once per interval, and
//! feeds each outcome to a [`Presenter`]. Invocations are not suppressed
//! while an earlier one is still pending, so results can arrive out of
//! order. Every invocation takes the next sequence number, and a result
//! only reaches the presenter if nothing newer has been applied already.
//! A fetch slower than the interval still lands; one that resolves after a
//! newer result is dropped.
//!
//! Stopping cancels the timer, aborts in-flight fetches and shuts the apply
//! gate: once [`PollHandle::stop`] returns, the presenter is never touched
//! again by this poller.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::presenter::Presenter;
use crate::source::SourceResult;

/// Shortest accepted interval.
pub const MIN_INTERVAL: Duration = Duration::from_millis(100);

/// Poll schedule for one panel.
#[derive(Debug, Clone)]
pub struct Poller {
    name: String,
    interval: Duration,
}

impl Poller {
    pub fn new(name: impl Into<String>, interval: Duration) -> Self {
        let name = name.into();
        let interval = if interval < MIN_INTERVAL {
            warn!(
                poller = %name,
                requested_ms = interval.as_millis() as u64,
                "Poll interval too short, using {}ms",
                MIN_INTERVAL.as_millis()
            );
            MIN_INTERVAL
        } else {
            interval
        };
        Self { name, interval }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start polling. Must be called inside a Tokio runtime.
    pub fn start<T, F, Fut>(&self, fetch: F, presenter: Arc<Presenter<T>>) -> PollHandle
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = SourceResult<T>> + Send + 'static,
    {
        let state = Arc::new(PollState {
            name: self.name.clone(),
            issued: AtomicU64::new(0),
            applied: AtomicU64::new(0),
            active: AtomicBool::new(true),
            gate: Mutex::new(()),
            in_flight: Mutex::new(JoinSet::new()),
        });

        let issue: Arc<dyn Fn() + Send + Sync> = {
            let state = Arc::clone(&state);
            Arc::new(move || {
                if !state.active.load(Ordering::SeqCst) {
                    return;
                }
                let seq = state.issued.fetch_add(1, Ordering::SeqCst) + 1;
                let pending = fetch();
                let presenter = Arc::clone(&presenter);
                let task_state = Arc::clone(&state);

                let mut in_flight = state.in_flight.lock();
                while in_flight.try_join_next().is_some() {}
                in_flight.spawn(async move {
                    let result = pending.await;
                    task_state.apply(seq, result, &presenter);
                });
            })
        };

        let timer = {
            let issue = Arc::clone(&issue);
            let interval = self.interval;
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(interval);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    // First tick completes immediately
                    ticker.tick().await;
                    issue();
                }
            })
        };

        info!(
            poller = %self.name,
            interval_ms = self.interval.as_millis() as u64,
            "Poller started"
        );

        PollHandle {
            state,
            issue,
            timer,
        }
    }
}

struct PollState {
    name: String,
    /// Sequence number of the latest invocation.
    issued: AtomicU64,
    /// Sequence number of the newest result handed to the presenter.
    applied: AtomicU64,
    active: AtomicBool,
    /// Held across the freshness check and the presenter update.
    gate: Mutex<()>,
    in_flight: Mutex<JoinSet<()>>,
}

impl PollState {
    fn apply<T>(&self, seq: u64, result: SourceResult<T>, presenter: &Presenter<T>)
    where
        T: Send + Sync + 'static,
    {
        let _gate = self.gate.lock();
        if !self.active.load(Ordering::SeqCst) {
            debug!(poller = %self.name, seq, "Discarding result after stop");
            return;
        }
        let applied = self.applied.load(Ordering::SeqCst);
        if seq <= applied {
            debug!(poller = %self.name, seq, applied, "Discarding out-of-order result");
            return;
        }
        self.applied.store(seq, Ordering::SeqCst);
        presenter.apply(result);
    }
}

/// Control for a running poller. Dropping it stops the poller.
pub struct PollHandle {
    state: Arc<PollState>,
    issue: Arc<dyn Fn() + Send + Sync>,
    timer: JoinHandle<()>,
}

impl PollHandle {
    pub fn name(&self) -> &str {
        &self.state.name
    }

    /// Invocations issued so far.
    pub fn issued(&self) -> u64 {
        self.state.issued.load(Ordering::SeqCst)
    }

    pub fn is_active(&self) -> bool {
        self.state.active.load(Ordering::SeqCst)
    }

    /// Issue the fetch now, outside the schedule. No-op once stopped.
    pub fn refresh(&self) {
        debug!(poller = %self.state.name, "Manual refresh");
        (self.issue)();
    }

    /// Stop polling. Idempotent.
    pub fn stop(&self) {
        {
            let _gate = self.state.gate.lock();
            if !self.state.active.swap(false, Ordering::SeqCst) {
                return;
            }
        }
        self.timer.abort();
        self.state.in_flight.lock().abort_all();
        info!(poller = %self.state.name, issued = self.issued(), "Poller stopped");
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
