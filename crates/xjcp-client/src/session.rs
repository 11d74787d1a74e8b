//! Shared session liveness state.
//!
//! Three fields cross task boundaries: the last-request clock (written by
//! the dispatcher worker, read by the watchdog), the keep-alive interval
//! (written by the caller, read by the watchdog), and the authenticated
//! flag (written once by the worker on login). Each has at most one
//! writer, and readers tolerate slightly stale values, so plain atomics
//! cover the visibility requirement without any lock. The session id
//! string itself never leaves the dispatcher worker.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

// tokio's Instant, not std's: the watchdog sleeps on the tokio clock, and
// idle measurement must follow the same clock.
use tokio::time::Instant;

/// Liveness state shared between the dispatcher worker and the watchdog.
#[derive(Debug)]
pub(crate) struct SessionState {
    /// Engine creation time; the atomics below are offsets from it.
    epoch: Instant,
    /// Milliseconds from `epoch` of the most recent send attempt.
    last_request_ms: AtomicU64,
    /// Keep-alive interval in milliseconds; strictly positive.
    keep_alive_ms: AtomicU64,
    /// Set once, by the worker, when a login response grants a session id.
    authenticated: AtomicBool,
}

impl SessionState {
    pub(crate) fn new(keep_alive: Duration) -> Self {
        Self {
            epoch: Instant::now(),
            last_request_ms: AtomicU64::new(0),
            keep_alive_ms: AtomicU64::new(duration_to_ms(keep_alive)),
            authenticated: AtomicBool::new(false),
        }
    }

    /// Record "a request is being sent now".
    ///
    /// `fetch_max` keeps the clock monotonic even if wakeups interleave.
    pub(crate) fn touch(&self) {
        let _ = self.last_request_ms.fetch_max(self.now_ms(), Ordering::Relaxed);
    }

    /// Time since the most recent send attempt.
    pub(crate) fn idle(&self) -> Duration {
        let last = self.last_request_ms.load(Ordering::Relaxed);
        Duration::from_millis(self.now_ms().saturating_sub(last))
    }

    pub(crate) fn keep_alive_interval(&self) -> Duration {
        Duration::from_millis(self.keep_alive_ms.load(Ordering::Relaxed))
    }

    /// Caller-facing setter; the caller validates positivity.
    pub(crate) fn set_keep_alive_interval(&self, interval: Duration) {
        self.keep_alive_ms
            .store(duration_to_ms(interval), Ordering::Relaxed);
    }

    pub(crate) fn set_authenticated(&self) {
        self.authenticated.store(true, Ordering::Relaxed);
    }

    pub(crate) fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::Relaxed)
    }

    fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }
}

fn duration_to_ms(duration: Duration) -> u64 {
    duration.as_millis().max(1) as u64
}
