use crate::cart::Cart;
use crate::error::Cancelled;
use crate::stop::{SlotState, Stop, StopCore};
use crate::utils::CancelToken;
use parking_lot::MutexGuard;

/// State of a mining station: the cart slot plus one gem in flight and a
/// per-visit "loaded" marker.
struct StationState {
    cart: Option<Cart>,
    /// A mined gem is waiting to be loaded. At most one at a time.
    gem: bool,
    /// The held cart has already received this station's gem.
    loaded: bool,
}

impl SlotState for StationState {
    fn cart(&self) -> Option<&Cart> {
        self.cart.as_ref()
    }

    fn take_cart(&mut self) -> Option<Cart> {
        // the next cart to arrive starts unloaded
        self.loaded = false;
        self.cart.take()
    }

    fn put_cart(&mut self, cart: Cart) {
        self.cart = Some(cart);
    }

    /// An engine may not carry a cart away before it received this
    /// station's gem.
    fn ready_collect(&self) -> bool {
        self.cart.is_some() && self.loaded
    }
}

/// A stop at the bottom of the mine where a miner deposits gems and carts
/// pick them up, one gem per cart per visit.
pub struct Station {
    id: u32,
    core: StopCore<StationState>,
}

impl Station {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            core: StopCore::new(
                format!("station {id}"),
                StationState {
                    cart: None,
                    gem: false,
                    loaded: false,
                },
            ),
        }
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Whether a mined gem is currently waiting at the station.
    pub fn has_gem(&self) -> bool {
        self.core.lock().gem
    }

    /// Called by the miner. Blocks while a gem is already waiting, then
    /// commits the deposit and carries straight on into loading it onto a
    /// cart, all under one critical section.
    ///
    /// Cancellation before the deposit commits leaves the station
    /// untouched; cancellation while waiting for a cart leaves the
    /// deposited gem in place for the next cart.
    pub fn deposit_gem(&self, cancel: &CancelToken) -> Result<(), Cancelled> {
        let mut state = self.core.lock();

        // only one gem may sit at the station
        loop {
            if cancel.is_cancelled() {
                return Err(Cancelled::new());
            }
            if !state.gem {
                break;
            }
            self.core.wait(&mut state);
        }

        state.gem = true;
        tracing::info!("[{}] gem deposited", self.core.label());

        self.load_locked(&mut state, cancel)?;
        self.core.notify_all();
        Ok(())
    }

    /// Blocks until a cart is present and still unloaded, then moves the
    /// waiting gem onto it.
    pub fn load_gem(&self, cancel: &CancelToken) -> Result<(), Cancelled> {
        let mut state = self.core.lock();
        self.load_locked(&mut state, cancel)?;
        self.core.notify_all();
        Ok(())
    }

    fn load_locked(
        &self,
        state: &mut MutexGuard<'_, StationState>,
        cancel: &CancelToken,
    ) -> Result<(), Cancelled> {
        loop {
            if cancel.is_cancelled() {
                return Err(Cancelled::new());
            }
            if state.cart.is_some() && !state.loaded {
                break;
            }
            self.core.wait(state);
        }

        state.loaded = true;
        if let Some(cart) = state.cart.as_mut() {
            cart.load_gem();
            tracing::info!("[{}] {} loaded with a gem", self.core.label(), cart);
        }

        // the gem is on the cart, the miner may mine again
        state.gem = false;
        Ok(())
    }
}

impl Stop for Station {
    fn label(&self) -> &str {
        self.core.label()
    }

    fn collect_from(&self, cancel: &CancelToken) -> Result<Cart, Cancelled> {
        self.core.collect_from(cancel)
    }

    fn deliver_to(&self, cart: Cart, cancel: &CancelToken) -> Result<(), Cancelled<Cart>> {
        self.core.deliver_to(cart, cancel)
    }

    fn wake(&self) {
        self.core.wake();
    }
}
