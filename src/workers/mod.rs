//! Driver threads. Each worker runs an unbounded loop on its own thread
//! until its cancel token trips; the loops themselves only ever call into
//! the stop protocol, all correctness lives on the other side of that call.

pub use engine::Engine;
pub use miner::Miner;
pub use operator::Operator;

mod engine;
mod miner;
mod operator;

use crate::utils::{CancelToken, HealthFlag};
use anyhow::Context;
use std::thread::JoinHandle;

/// Handle to a spawned worker thread: its name, a liveness flag, and the
/// join handle. Cancellation is signalled through the token the worker was
/// spawned with; the handle only observes and joins.
pub struct WorkerHandle {
    name: String,
    health: HealthFlag,
    join: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    /// Spawn a named worker thread running `body`.
    pub fn spawn(
        name: impl Into<String>,
        cancel: CancelToken,
        body: impl FnOnce(&CancelToken) + Send + 'static,
    ) -> anyhow::Result<Self> {
        let name = name.into();
        let health = HealthFlag::new(false);
        let flag = health.clone();
        let thread_name = name.clone();

        let join = std::thread::Builder::new()
            .name(thread_name.clone())
            .spawn(move || {
                flag.up();
                tracing::debug!("[{}] started", thread_name);
                body(&cancel);
                tracing::debug!("[{}] stopped", thread_name);
                flag.down();
            })
            .with_context(|| format!("failed to spawn worker thread {name}"))?;

        Ok(Self {
            name,
            health,
            join: Some(join),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True while the worker thread is inside its loop.
    pub fn is_running(&self) -> bool {
        self.health.get()
    }

    /// Block until the worker thread finishes.
    pub fn join(mut self) {
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}
