//! SoC thermal zone exporter with hysteresis fan control
//!
//! The daemon runs one temperature monitor per exported zone plus one
//! fan controller, all as independent tokio tasks under a single
//! cancellation token, and serves the collected gauges to an external
//! scraper.

pub mod actuator;
pub mod config;
pub mod error;
pub mod metrics;
pub mod monitors;
pub mod sensor;
pub mod server;
pub mod shutdown;

pub use config::{Config, FanConfig, FanThresholds};
pub use error::{MonitorError, MonitorResult};
