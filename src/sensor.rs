//! Thermal zone sensor access
//!
//! Each zone is a sysfs file (`thermal_zoneN/temp`) holding one integer
//! in milli-degrees Celsius. The file is read anew on every sampling
//! cycle; there is no caching layer.

use std::fmt;
use std::num::ParseIntError;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::{MonitorError, MonitorResult};

/// Convert the raw content of a zone file into degrees Celsius.
///
/// The kernel exposes milli-degrees as a single integer, so the scale
/// is exactly `raw / 1000` with no rounding beyond float precision.
pub fn celsius_from_raw(raw: &str) -> Result<f64, ParseIntError> {
    let millidegrees = raw.trim().parse::<i64>()?;
    Ok(millidegrees as f64 / 1000.0)
}

/// One thermal zone sensor under the sysfs thermal class
#[derive(Debug, Clone)]
pub struct ThermalZone {
    index: u32,
    path: PathBuf,
}

impl ThermalZone {
    pub fn new(thermal_root: &Path, index: u32) -> Self {
        let path = thermal_root.join(format!("thermal_zone{index}")).join("temp");
        Self { index, path }
    }

    /// Label used for the gauge, e.g. `zone0`
    pub fn label(&self) -> String {
        format!("zone{}", self.index)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current temperature in degrees Celsius.
    ///
    /// Both failure modes (unreadable file, non-integer content) are
    /// unrecoverable for the calling loop.
    pub async fn read_celsius(&self) -> MonitorResult<f64> {
        let raw = fs::read_to_string(&self.path)
            .await
            .map_err(|source| MonitorError::SensorRead {
                path: self.path.clone(),
                source,
            })?;

        celsius_from_raw(&raw).map_err(|source| MonitorError::SensorParse {
            path: self.path.clone(),
            source,
        })
    }
}

impl fmt::Display for ThermalZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "zone{}", self.index)
    }
}
