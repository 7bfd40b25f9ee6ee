pub mod cart;
pub mod config;
pub mod error;
pub mod prelude;
pub mod runtime;
pub mod stop;
mod test;
pub mod utils;
pub mod workers;
