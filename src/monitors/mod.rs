//! Periodic sampling and actuation loops
//!
//! Each loop runs as an independent tokio task. Loops share nothing
//! but the shutdown token; a typed error return from any of them is
//! fatal for the whole process.

pub mod fan;
pub mod temperature;

pub use fan::{FanAction, FanController};
pub use temperature::TemperatureMonitor;
