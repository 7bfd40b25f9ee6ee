use crate::cart::Cart;
use crate::config::SimConfig;
use crate::stop::{Elevator, Station, Stop};
use crate::utils::CancelToken;
use crate::workers::{Engine, Miner, Operator, WorkerHandle};
use anyhow::Result;
use signal_hook::consts::TERM_SIGNALS;
use signal_hook::flag;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// The wired-up mine: the elevator, the ring of stations, and every worker
/// thread driving carts around it.
///
/// Topology: fresh carts enter the elevator at the surface and descend;
/// engine legs run elevator -> station 1 -> ... -> station N -> elevator,
/// each station's miner loads one gem per visit, the last delivery sends
/// the car back up, and an unloader drains full carts at the top.
pub struct MineRuntime {
    cancel: CancelToken,
    stops: Vec<Arc<dyn Stop>>,
    workers: Vec<WorkerHandle>,
}

impl MineRuntime {
    /// Wire the topology from `cfg` and spawn every worker thread.
    pub fn spawn(cfg: SimConfig) -> Result<Self> {
        cfg.validate()?;

        let cancel = CancelToken::new();
        let elevator = Arc::new(Elevator::new(cfg.elevator_travel(), cfg.stations));
        let stations: Vec<Arc<Station>> =
            (1..=cfg.stations).map(|id| Arc::new(Station::new(id))).collect();

        // ring of handoff points, elevator first
        let mut ring: Vec<Arc<dyn Stop>> = Vec::with_capacity(stations.len() + 1);
        ring.push(elevator.clone());
        for station in &stations {
            ring.push(station.clone());
        }

        let mut workers = Vec::new();

        // one engine per leg, wrapping back to the elevator
        for (i, pair) in ring.iter().zip(ring.iter().cycle().skip(1)).enumerate() {
            let engine = Engine::new(pair.0.clone(), pair.1.clone(), cfg.engine_travel());
            workers.push(engine.spawn(format!("engine-{}", i + 1), cancel.clone())?);
        }

        // one miner per station
        for station in &stations {
            let miner = Miner::new(station.clone(), cfg.mining());
            workers.push(miner.spawn(format!("miner-{}", station.id()), cancel.clone())?);
        }

        let operator = Operator::new(
            elevator.clone(),
            cfg.operator_pause_min(),
            cfg.operator_pause_max(),
        );
        workers.push(operator.spawn("operator", cancel.clone())?);

        // surface loader: keeps fresh carts arriving at the top; `arrive`
        // itself paces the supply, one cart per empty car
        {
            let elevator = elevator.clone();
            workers.push(WorkerHandle::spawn(
                "loader",
                cancel.clone(),
                move |cancel| {
                    let mut next_id = 1;
                    while !cancel.is_cancelled() {
                        if elevator.arrive(Cart::new(next_id), cancel).is_err() {
                            break;
                        }
                        next_id += 1;
                    }
                },
            )?);
        }

        // surface unloader: drains full carts out of the system
        {
            let elevator = elevator.clone();
            workers.push(WorkerHandle::spawn(
                "unloader",
                cancel.clone(),
                move |cancel| {
                    while !cancel.is_cancelled() {
                        match elevator.depart(cancel) {
                            Ok(cart) => {
                                tracing::info!(
                                    "[MineRuntime] {} left the mine with {} gems",
                                    cart,
                                    cart.gems()
                                );
                            }
                            Err(_) => break,
                        }
                    }
                },
            )?);
        }

        tracing::info!(
            "[MineRuntime] spawned: {} stations, {} workers",
            cfg.stations,
            workers.len()
        );

        Ok(Self {
            cancel,
            stops: ring,
            workers,
        })
    }

    /// True while every worker thread is inside its loop.
    pub fn is_running(&self) -> bool {
        self.workers.iter().all(|w| w.is_running())
    }

    /// Cancel every worker, wake every stop so blocked waiters observe the
    /// cancellation, and join all threads.
    pub fn shutdown(mut self) {
        tracing::info!("[MineRuntime] shutting down");
        self.cancel.cancel();
        for stop in &self.stops {
            stop.wake();
        }
        for worker in self.workers.drain(..) {
            worker.join();
        }
        tracing::info!("[MineRuntime] all workers joined");
    }

    /// Run until a termination signal arrives, then shut down.
    pub fn run_until_signalled(self) -> Result<()> {
        let term_flag = Arc::new(AtomicBool::new(false));
        for sig in TERM_SIGNALS {
            flag::register(*sig, term_flag.clone())?;
        }

        while !term_flag.load(Ordering::Relaxed) {
            thread::sleep(Duration::from_millis(100));
        }
        tracing::warn!("[MineRuntime] termination signal received");
        self.shutdown();
        Ok(())
    }

    /// Wraps the runtime into a guard that auto-shuts down on drop.
    pub fn into_guard(self) -> RuntimeGuard {
        RuntimeGuard(Some(self))
    }
}

pub struct RuntimeGuard(Option<MineRuntime>);

impl Drop for RuntimeGuard {
    fn drop(&mut self) {
        if let Some(rt) = self.0.take() {
            rt.shutdown();
        }
    }
}
