use crate::stop::Stop;
use crate::utils::CancelToken;
use crate::workers::WorkerHandle;
use std::sync::Arc;
use std::time::Duration;

/// A transport engine shuttling carts along one fixed leg: collect at the
/// source, ride the leg, deliver at the destination, ride back empty.
pub struct Engine {
    source: Arc<dyn Stop>,
    dest: Arc<dyn Stop>,
    travel: Duration,
}

impl Engine {
    pub fn new(source: Arc<dyn Stop>, dest: Arc<dyn Stop>, travel: Duration) -> Self {
        Self {
            source,
            dest,
            travel,
        }
    }

    pub fn spawn(self, name: impl Into<String>, cancel: CancelToken) -> anyhow::Result<WorkerHandle> {
        WorkerHandle::spawn(name, cancel, move |cancel| self.run(cancel))
    }

    fn run(&self, cancel: &CancelToken) {
        while !cancel.is_cancelled() {
            let cart = match self.source.collect_from(cancel) {
                Ok(cart) => cart,
                Err(_) => break,
            };

            // loaded leg
            if !cancel.sleep_cancellable(self.travel) {
                break;
            }

            match self.dest.deliver_to(cart, cancel) {
                // a delivery into the elevator sends the car straight up
                Ok(()) => self.dest.on_delivered(cancel),
                Err(_) => break,
            }

            // empty leg back to the source
            if !cancel.sleep_cancellable(self.travel) {
                break;
            }
        }
    }
}
