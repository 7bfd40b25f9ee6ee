use parking_lot::{Condvar, Mutex};
use std::fmt;
use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Internal cancellation state, shared via [`Arc`]. The condvar exists so
/// that `cancel()` wakes any thread parked inside
/// [`CancelToken::sleep_cancellable`] right away instead of letting it run
/// out its pause.
struct CancelState {
    cancelled: AtomicBool,
    lock: Mutex<()>,
    sleepers: Condvar,
}

/// Cooperative cancellation token.
///
/// A `CancelToken` can be cloned cheaply and checked at any time. One root
/// token fans out to every worker of a runtime; cancelling it stops them all.
#[derive(Clone)]
pub struct CancelToken {
    state: Arc<CancelState>,
}

impl Debug for CancelToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelToken")
            .field("is_cancelled", &self.is_cancelled())
            .finish()
    }
}

impl CancelToken {
    /// Create a new, not-yet-cancelled token.
    pub fn new() -> Self {
        Self {
            state: Arc::new(CancelState {
                cancelled: AtomicBool::new(false),
                lock: Mutex::new(()),
                sleepers: Condvar::new(),
            }),
        }
    }

    /// Cancel this token and wake every sleeper immediately.
    pub fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::Release);
        let _guard = self.state.lock.lock();
        self.state.sleepers.notify_all();
    }

    /// Check whether the token has been cancelled.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::Acquire)
    }

    /// Sleep for `total`, or less if the token is cancelled meanwhile.
    /// Returns true if the full pause elapsed, false on cancellation.
    pub fn sleep_cancellable(&self, total: Duration) -> bool {
        let deadline = Instant::now() + total;
        let mut guard = self.state.lock.lock();
        loop {
            if self.is_cancelled() {
                return false;
            }
            if self
                .state
                .sleepers
                .wait_until(&mut guard, deadline)
                .timed_out()
            {
                return !self.is_cancelled();
            }
        }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
