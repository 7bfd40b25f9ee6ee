use crate::stop::Station;
use crate::utils::CancelToken;
use crate::workers::WorkerHandle;
use std::sync::Arc;
use std::time::Duration;

/// A miner assigned to one station: mine for a while, deposit the gem,
/// repeat.
pub struct Miner {
    station: Arc<Station>,
    mining: Duration,
}

impl Miner {
    pub fn new(station: Arc<Station>, mining: Duration) -> Self {
        Self { station, mining }
    }

    pub fn spawn(self, name: impl Into<String>, cancel: CancelToken) -> anyhow::Result<WorkerHandle> {
        WorkerHandle::spawn(name, cancel, move |cancel| self.run(cancel))
    }

    fn run(&self, cancel: &CancelToken) {
        while !cancel.is_cancelled() {
            if !cancel.sleep_cancellable(self.mining) {
                break;
            }
            if self.station.deposit_gem(cancel).is_err() {
                break;
            }
        }
    }
}
