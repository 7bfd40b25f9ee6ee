#[cfg(test)]
mod tests {
    use crate::cart::Cart;
    use crate::config::SimConfig;
    use crate::error::Cancelled;
    use crate::runtime::MineRuntime;
    use crate::stop::{Elevator, Position, SlotState, Station, Stop, StopCore};
    use crate::utils::CancelToken;
    use crate::workers::{Engine, Miner};
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    const TRAVEL: Duration = Duration::from_millis(10);
    const DEADLINE: Duration = Duration::from_secs(5);

    /// A bare handoff point with only the base predicates, standing in for
    /// any future stop variant.
    struct Siding {
        core: StopCore<SidingState>,
    }

    struct SidingState {
        cart: Option<Cart>,
    }

    impl SlotState for SidingState {
        fn cart(&self) -> Option<&Cart> {
            self.cart.as_ref()
        }
        fn take_cart(&mut self) -> Option<Cart> {
            self.cart.take()
        }
        fn put_cart(&mut self, cart: Cart) {
            self.cart = Some(cart);
        }
    }

    impl Siding {
        fn new(label: &str) -> Arc<Self> {
            Arc::new(Self {
                core: StopCore::new(label, SidingState { cart: None }),
            })
        }
    }

    impl Stop for Siding {
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

    /// One station, one miner, two engine legs: a cart pushed in at the
    /// surface comes back out carrying exactly one gem.
    #[test]
    fn single_station_circuit_delivers_one_gem() {
        let cancel = CancelToken::new();
        let elevator = Arc::new(Elevator::new(TRAVEL, 1));
        let station = Arc::new(Station::new(1));

        let down_leg: Arc<dyn Stop> = elevator.clone();
        let station_stop: Arc<dyn Stop> = station.clone();
        let workers = vec![
            Engine::new(down_leg.clone(), station_stop.clone(), TRAVEL)
                .spawn("engine-1", cancel.clone())
                .unwrap(),
            Engine::new(station_stop, down_leg, TRAVEL)
                .spawn("engine-2", cancel.clone())
                .unwrap(),
            Miner::new(station.clone(), Duration::from_millis(20))
                .spawn("miner-1", cancel.clone())
                .unwrap(),
        ];

        elevator.arrive(Cart::new(1), &cancel).unwrap();
        assert_eq!(elevator.position(), Position::Bottom);

        let (tx, rx) = mpsc::channel();
        let departer = {
            let elevator = elevator.clone();
            let cancel = cancel.clone();
            thread::spawn(move || {
                let cart = elevator.depart(&cancel).unwrap();
                tx.send(cart.gems()).unwrap();
            })
        };

        assert_eq!(rx.recv_timeout(DEADLINE).unwrap(), 1);
        departer.join().unwrap();

        cancel.cancel();
        elevator.wake();
        station.wake();
        for worker in workers {
            worker.join();
        }
    }

    /// Two stations in the ring: the departing cart carries one gem per
    /// station.
    #[test]
    fn two_station_circuit_fills_the_cart() {
        let cancel = CancelToken::new();
        let elevator = Arc::new(Elevator::new(TRAVEL, 2));
        let stations = [Arc::new(Station::new(1)), Arc::new(Station::new(2))];

        let ring: Vec<Arc<dyn Stop>> = vec![
            elevator.clone(),
            stations[0].clone(),
            stations[1].clone(),
        ];
        let mut workers = Vec::new();
        for (i, pair) in ring.iter().zip(ring.iter().cycle().skip(1)).enumerate() {
            workers.push(
                Engine::new(pair.0.clone(), pair.1.clone(), TRAVEL)
                    .spawn(format!("engine-{}", i + 1), cancel.clone())
                    .unwrap(),
            );
        }
        for station in &stations {
            workers.push(
                Miner::new(station.clone(), Duration::from_millis(20))
                    .spawn(format!("miner-{}", station.id()), cancel.clone())
                    .unwrap(),
            );
        }

        elevator.arrive(Cart::new(1), &cancel).unwrap();

        let (tx, rx) = mpsc::channel();
        let departer = {
            let elevator = elevator.clone();
            let cancel = cancel.clone();
            thread::spawn(move || {
                let cart = elevator.depart(&cancel).unwrap();
                tx.send((cart.id(), cart.gems())).unwrap();
            })
        };

        assert_eq!(rx.recv_timeout(DEADLINE).unwrap(), (1, 2));
        departer.join().unwrap();

        cancel.cancel();
        for stop in &ring {
            stop.wake();
        }
        for worker in workers {
            worker.join();
        }
    }

    /// Two engines racing for the same destination: the slot serializes
    /// them, and both carts get through one at a time.
    #[test]
    fn engines_contending_for_one_destination_serialize() {
        let cancel = CancelToken::new();
        let source_a = Siding::new("siding a");
        let source_b = Siding::new("siding b");
        let dest = Siding::new("siding c");

        source_a.deliver_to(Cart::new(1), &cancel).unwrap();
        source_b.deliver_to(Cart::new(2), &cancel).unwrap();

        let workers = vec![
            Engine::new(source_a.clone(), dest.clone(), TRAVEL)
                .spawn("engine-a", cancel.clone())
                .unwrap(),
            Engine::new(source_b.clone(), dest.clone(), TRAVEL)
                .spawn("engine-b", cancel.clone())
                .unwrap(),
        ];

        // both carts arrive, strictly one slot at a time
        let first = dest.collect_from(&cancel).unwrap().id();
        let second = dest.collect_from(&cancel).unwrap().id();
        let mut seen = [first, second];
        seen.sort_unstable();
        assert_eq!(seen, [1, 2]);

        cancel.cancel();
        for stop in [&source_a, &source_b, &dest] {
            stop.wake();
        }
        for worker in workers {
            worker.join();
        }
    }

    /// Cancelling a miner blocked behind an unconsumed gem leaves the
    /// station's gem flag at its last committed value.
    #[test]
    fn cancelled_miner_leaves_station_state_committed() {
        let cancel = CancelToken::new();
        let station = Arc::new(Station::new(1));

        // a deposit is committed but its load is pending (no cart ever
        // shows up), so the gem flag is up
        let holder = {
            let station = station.clone();
            let cancel = cancel.clone();
            thread::spawn(move || station.deposit_gem(&cancel))
        };
        thread::sleep(Duration::from_millis(50));
        assert!(station.has_gem());

        // the miner blocks behind the unconsumed gem
        let miner = Miner::new(station.clone(), Duration::from_millis(5))
            .spawn("miner-1", cancel.clone())
            .unwrap();
        thread::sleep(Duration::from_millis(100));
        assert!(station.has_gem());

        cancel.cancel();
        station.wake();
        assert!(holder.join().unwrap().is_err());
        miner.join();

        // no partial deposit either way
        assert!(station.has_gem());
    }

    fn fast_config() -> SimConfig {
        SimConfig {
            stations: 2,
            elevator_travel_ms: 5,
            engine_travel_ms: 5,
            mining_ms: 5,
            operator_pause_min_ms: 10,
            operator_pause_max_ms: 30,
        }
    }

    #[test]
    fn runtime_spawns_runs_and_shuts_down() {
        let rt = MineRuntime::spawn(fast_config()).unwrap();
        thread::sleep(Duration::from_millis(300));
        assert!(rt.is_running());
        rt.shutdown();
    }

    #[test]
    fn runtime_guard_shuts_down_on_drop() {
        let _guard = MineRuntime::spawn(fast_config()).unwrap().into_guard();
        thread::sleep(Duration::from_millis(100));
    }

    #[test]
    fn runtime_rejects_invalid_config() {
        let cfg = SimConfig {
            stations: 0,
            ..fast_config()
        };
        assert!(MineRuntime::spawn(cfg).is_err());
    }
}
