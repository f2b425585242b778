//! Error types shared by the monitor and controller loops
//!
//! Every variant here is fatal by design: the loops have no local
//! recovery strategy and escalate to the supervisor in `main`, which
//! cancels all loops and exits non-zero. A thermal daemon with a
//! partially failed component must not keep running in a degraded
//! state.

use std::io;
use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for the sampling and actuation loops
pub type MonitorResult<T> = Result<T, MonitorError>;

#[derive(Debug, Error)]
pub enum MonitorError {
    /// The sensor source could not be read
    #[error("failed to read temperature from {path:?}: {source}")]
    SensorRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The sensor source did not contain an integer milli-degree value
    #[error("{path:?} does not contain an integer: {source}")]
    SensorParse {
        path: PathBuf,
        #[source]
        source: ParseIntError,
    },

    /// The fan command could not be spawned or exited non-zero
    #[error("fan command {command:?} failed: {reason}")]
    Actuator { command: String, reason: String },

    /// The metrics scrape endpoint failed while serving
    #[error("metrics endpoint error: {source}")]
    Endpoint {
        #[source]
        source: io::Error,
    },
}
