use crate::cart::Cart;
use crate::error::Cancelled;
use crate::stop::{SlotState, Stop, StopCore};
use crate::utils::CancelToken;
use std::time::Duration;

/// Vertical position of the elevator car.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Top,
    Bottom,
}

struct ElevatorState {
    cart: Option<Cart>,
    position: Position,
    /// Number of carts queued at the top waiting to descend; the operator
    /// must not lower an empty car past any of them.
    waiting: u32,
    /// Gem count at which a cart has completed its circuit.
    full_load: u32,
}

impl SlotState for ElevatorState {
    fn cart(&self) -> Option<&Cart> {
        self.cart.as_ref()
    }

    fn take_cart(&mut self) -> Option<Cart> {
        self.cart.take()
    }

    fn put_cart(&mut self, cart: Cart) {
        self.cart = Some(cart);
    }

    /// Ordinary engine traffic only touches the elevator at the bottom,
    /// and only a cart that has not yet completed its circuit may re-enter
    /// the ring; a completed cart waits aboard for the ride up.
    fn ready_collect(&self) -> bool {
        self.position == Position::Bottom
            && matches!(self.cart.as_ref(), Some(c) if c.gems() < self.full_load)
    }

    fn ready_deliver(&self) -> bool {
        self.cart.is_none() && self.position == Position::Bottom
    }
}

/// The winch elevator between the surface and the mine floor.
///
/// Carts enter at the top (`arrive`), ride down, circulate through the
/// stations via the bottom-side `Stop` protocol, ride back up (`ascend`
/// after the final bottom delivery), and leave at the top once full
/// (`depart`). All operations, including the timed transits, are mutually
/// exclusive on the elevator's single lock.
pub struct Elevator {
    core: StopCore<ElevatorState>,
    travel: Duration,
}

impl Elevator {
    pub fn new(travel: Duration, full_load: u32) -> Self {
        Self {
            core: StopCore::new(
                "elevator",
                ElevatorState {
                    cart: None,
                    position: Position::Top,
                    waiting: 0,
                    full_load,
                },
            ),
            travel,
        }
    }

    pub fn position(&self) -> Position {
        self.core.lock().position
    }

    pub fn has_cart(&self) -> bool {
        self.core.lock().cart.is_some()
    }

    /// A fresh cart arrives at the surface. Blocks until the car is at the
    /// top and empty, then takes the cart down. On cancellation before
    /// admission the cart comes back inside the error.
    pub fn arrive(&self, cart: Cart, cancel: &CancelToken) -> Result<(), Cancelled<Cart>> {
        let mut state = self.core.lock();
        state.waiting += 1;

        loop {
            if cancel.is_cancelled() {
                state.waiting -= 1;
                return Err(Cancelled::returning(cart));
            }
            if state.cart.is_none() && state.position == Position::Top {
                break;
            }
            self.core.wait(&mut state);
        }

        tracing::info!("[{}] descends with {}", self.core.label(), cart);
        state.put_cart(cart);
        state.waiting -= 1;

        // transit happens with the lock held: nothing else may touch the
        // elevator while it is between floors
        cancel.sleep_cancellable(self.travel);
        state.position = Position::Bottom;
        self.core.notify_all();
        Ok(())
    }

    /// A full cart leaves at the surface. Blocks until the car is at the
    /// top holding a cart that has collected a gem from every station.
    pub fn depart(&self, cancel: &CancelToken) -> Result<Cart, Cancelled> {
        let cart = self.core.wait_until(cancel, |s| {
            let ready = s.position == Position::Top
                && matches!(s.cart.as_ref(), Some(c) if c.gems() == s.full_load);
            if ready {
                s.take_cart()
            } else {
                None
            }
        })?;
        tracing::info!("[{}] {} departs with {} gems", self.core.label(), cart, cart.gems());
        Ok(cart)
    }

    /// Haul the loaded car from the bottom to the top. Runs right after a
    /// full cart is delivered into the elevator from the mine floor, so no
    /// position precondition is needed.
    pub fn ascend(&self, cancel: &CancelToken) {
        let mut state = self.core.lock();
        match state.cart.as_ref() {
            Some(cart) => tracing::info!("[{}] ascends with {}", self.core.label(), cart),
            None => tracing::info!("[{}] ascends (empty)", self.core.label()),
        }

        cancel.sleep_cancellable(self.travel);
        state.position = Position::Top;
        self.core.notify_all();
    }

    #[cfg(test)]
    fn set_waiting(&self, waiting: u32) {
        self.core.lock().waiting = waiting;
    }

    #[cfg(test)]
    fn waiting_count(&self) -> u32 {
        self.core.lock().waiting
    }

    /// Idle nudge by the operator. A no-op while the car holds a cart, and
    /// never descends while any cart is queued at the top.
    pub fn move_idle(&self, cancel: &CancelToken) {
        let mut state = self.core.lock();
        if state.cart.is_some() {
            return;
        }

        let target = match state.position {
            Position::Top if state.waiting == 0 => Position::Bottom,
            Position::Bottom => Position::Top,
            _ => return,
        };

        tracing::debug!(
            "[{}] moves (empty) {:?} -> {:?}",
            self.core.label(),
            state.position,
            target
        );
        cancel.sleep_cancellable(self.travel);
        state.position = target;
        self.core.notify_all();
    }
}

impl Stop for Elevator {
    fn label(&self) -> &str {
        self.core.label()
    }

    fn collect_from(&self, cancel: &CancelToken) -> Result<Cart, Cancelled> {
        self.core.collect_from(cancel)
    }

    fn deliver_to(&self, cart: Cart, cancel: &CancelToken) -> Result<(), Cancelled<Cart>> {
        self.core.deliver_to(cart, cancel)
    }

    /// The engine that brings a full cart back to the elevator triggers the
    /// ride up immediately.
    fn on_delivered(&self, cancel: &CancelToken) {
        self.ascend(cancel);
    }

    fn wake(&self) {
        self.core.wake();
    }
}
