use crate::stop::Elevator;
use crate::utils::CancelToken;
use crate::workers::WorkerHandle;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

/// The surface operator: at random intervals, nudges an idle elevator to
/// the other floor so neither side starves waiting for the car.
pub struct Operator {
    elevator: Arc<Elevator>,
    pause_min: Duration,
    pause_max: Duration,
}

impl Operator {
    pub fn new(elevator: Arc<Elevator>, pause_min: Duration, pause_max: Duration) -> Self {
        Self {
            elevator,
            pause_min,
            pause_max,
        }
    }

    pub fn spawn(self, name: impl Into<String>, cancel: CancelToken) -> anyhow::Result<WorkerHandle> {
        WorkerHandle::spawn(name, cancel, move |cancel| self.run(cancel))
    }

    fn run(&self, cancel: &CancelToken) {
        let mut rng = rand::thread_rng();
        let min = self.pause_min.min(self.pause_max);
        let max = self.pause_max.max(self.pause_min);

        while !cancel.is_cancelled() {
            let pause = rng.gen_range(min.as_millis() as u64..=max.as_millis() as u64);
            if !cancel.sleep_cancellable(Duration::from_millis(pause)) {
                break;
            }
            self.elevator.move_idle(cancel);
        }
    }
}
