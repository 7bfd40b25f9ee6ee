//! Handoff stops: single-slot rendezvous points where carts change owners.
//!
//! Every stop is a monitor: one mutex guards all of its state, one condvar
//! carries every wake, and every wake is a broadcast. Blocked operations
//! loop on their predicate after each wake, so spurious wakeups and
//! multi-waiter races are harmless by construction.

pub use elevator::{Elevator, Position};
pub use station::Station;

mod elevator;
mod station;

use crate::cart::Cart;
use crate::error::Cancelled;
use crate::utils::CancelToken;
use parking_lot::{Condvar, Mutex, MutexGuard};

/// Per-variant stop state living under the stop's single lock.
///
/// The base readiness predicates gate the plain `collect_from`/`deliver_to`
/// protocol; variants only ever intersect additional conditions, never
/// loosen the base ones.
pub trait SlotState: Send {
    /// The cart currently held, if any.
    fn cart(&self) -> Option<&Cart>;

    /// Remove and return the held cart, resetting any per-visit flags.
    fn take_cart(&mut self) -> Option<Cart>;

    /// Place a cart into the slot. Callers check `ready_deliver` first.
    fn put_cart(&mut self, cart: Cart);

    /// True iff the slot holds a cart ready to be carried away.
    fn ready_collect(&self) -> bool {
        self.cart().is_some()
    }

    /// True iff the slot can accept a cart.
    fn ready_deliver(&self) -> bool {
        self.cart().is_none()
    }
}

/// Capability interface the drivers work against. An engine only needs to
/// pull carts out of one stop and push them into another; whether the far
/// side is a station or the elevator is invisible to it.
pub trait Stop: Send + Sync {
    /// Human-readable name used in logs.
    fn label(&self) -> &str;

    /// Block until a cart is ready, then remove and return it.
    fn collect_from(&self, cancel: &CancelToken) -> Result<Cart, Cancelled>;

    /// Block until the slot can accept `cart`, then store it. Ownership
    /// transfers to the stop on success; on cancellation the cart comes
    /// back inside the error.
    fn deliver_to(&self, cart: Cart, cancel: &CancelToken) -> Result<(), Cancelled<Cart>>;

    /// Follow-up transition once a delivery has landed. The elevator hauls
    /// the freshly delivered cart back up here; everything else does
    /// nothing.
    fn on_delivered(&self, _cancel: &CancelToken) {}

    /// Broadcast-wake every thread blocked on this stop. Cancellation is
    /// only observed at a wake, so a canceller that may have waiters parked
    /// here calls this after tripping the token.
    fn wake(&self);
}

/// Shared monitor behind every stop variant: the lock, the condvar, and the
/// loop-recheck wait discipline.
pub struct StopCore<S> {
    label: String,
    state: Mutex<S>,
    cond: Condvar,
}

impl<S: SlotState> StopCore<S> {
    pub fn new(label: impl Into<String>, state: S) -> Self {
        Self {
            label: label.into(),
            state: Mutex::new(state),
            cond: Condvar::new(),
        }
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    pub(crate) fn lock(&self) -> MutexGuard<'_, S> {
        self.state.lock()
    }

    /// One suspension: releases the lock, parks until notified, and
    /// reacquires before returning. Callers re-check their predicate.
    #[inline]
    pub(crate) fn wait(&self, guard: &mut MutexGuard<'_, S>) {
        self.cond.wait(guard);
    }

    /// Broadcast while already holding the stop's lock.
    #[inline]
    pub(crate) fn notify_all(&self) {
        self.cond.notify_all();
    }

    /// Broadcast to all waiters from outside the critical section. Takes
    /// the lock first so a notification cannot slip between a waiter's
    /// predicate check and its park.
    pub fn wake(&self) {
        let _state = self.state.lock();
        self.cond.notify_all();
    }

    /// Block until `step` commits (returns `Some`), re-checking after every
    /// wake. Commits are followed by a broadcast; cancellation commits
    /// nothing.
    pub(crate) fn wait_until<T>(
        &self,
        cancel: &CancelToken,
        mut step: impl FnMut(&mut S) -> Option<T>,
    ) -> Result<T, Cancelled> {
        let mut state = self.lock();
        loop {
            if cancel.is_cancelled() {
                return Err(Cancelled::new());
            }
            if let Some(out) = step(&mut state) {
                self.notify_all();
                return Ok(out);
            }
            self.wait(&mut state);
        }
    }

    /// Block until `ready_collect`, then atomically remove and return the
    /// held cart.
    pub fn collect_from(&self, cancel: &CancelToken) -> Result<Cart, Cancelled> {
        let cart = self.wait_until(cancel, |s| {
            if s.ready_collect() {
                s.take_cart()
            } else {
                None
            }
        })?;
        tracing::info!("[{}] {} collected", self.label, cart);
        Ok(cart)
    }

    /// Block until `ready_deliver`, then atomically store `cart`.
    pub fn deliver_to(&self, cart: Cart, cancel: &CancelToken) -> Result<(), Cancelled<Cart>> {
        let id = cart.id();
        let mut pending = Some(cart);
        let res = self.wait_until(cancel, |s| {
            if s.ready_deliver() {
                if let Some(c) = pending.take() {
                    s.put_cart(c);
                    return Some(());
                }
            }
            None
        });
        match res {
            Ok(()) => {
                tracing::info!("[{}] cart {} delivered", self.label, id);
                Ok(())
            }
            Err(_) => match pending.take() {
                Some(c) => Err(Cancelled::returning(c)),
                None => Err(Cancelled { value: None }),
            },
        }
    }
}
