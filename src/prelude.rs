pub use crate::cart::Cart;
pub use crate::config::SimConfig;
pub use crate::error::Cancelled;
pub use crate::runtime::{MineRuntime, RuntimeGuard};
pub use crate::stop::{Elevator, Position, Station, Stop};
pub use crate::utils::logger::LoggerConfig;
pub use crate::utils::{CancelToken, HealthFlag};
pub use crate::workers::{Engine, Miner, Operator, WorkerHandle};
