use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_ADDR: &str = "0.0.0.0:9590";
pub const DEFAULT_THERMAL_ROOT: &str = "/sys/class/thermal";
pub const DEFAULT_START_FAN_CMD: &str = "i2cset -y 1 0x60 0x05 0x00";
pub const DEFAULT_STOP_FAN_CMD: &str = "i2cset -y 1 0x60 0x05 0x05";

/// Immutable daemon configuration, resolved once at startup and passed
/// by value into each loop's constructor.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the scrape endpoint binds to
    pub addr: SocketAddr,

    /// Sampling interval of the zone monitors
    pub interval: Duration,

    /// Root of the sysfs thermal class
    pub thermal_root: PathBuf,

    /// Zone indices exported as gauges
    pub zones: Vec<u32>,

    pub fan: FanConfig,
}

#[derive(Debug, Clone)]
pub struct FanConfig {
    /// Zone the controller samples
    pub zone: u32,

    /// Interval at which the fan is adjusted
    pub interval: Duration,

    pub thresholds: FanThresholds,

    pub start_cmd: String,
    pub stop_cmd: String,
}

/// Hysteresis band in degrees Celsius.
///
/// Configuration contract: `stop < start`, otherwise the dead band is
/// empty and the fan oscillates. The controller does not validate this.
#[derive(Debug, Clone, Copy)]
pub struct FanThresholds {
    pub start: f64,
    pub stop: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.parse().expect("default addr is valid"),
            interval: Duration::from_secs(10),
            thermal_root: PathBuf::from(DEFAULT_THERMAL_ROOT),
            zones: vec![0, 1, 2, 3],
            fan: FanConfig::default(),
        }
    }
}

impl Default for FanConfig {
    fn default() -> Self {
        Self {
            zone: 0,
            interval: Duration::from_secs(2),
            thresholds: FanThresholds {
                start: 75.0,
                stop: 45.0,
            },
            start_cmd: DEFAULT_START_FAN_CMD.to_string(),
            stop_cmd: DEFAULT_STOP_FAN_CMD.to_string(),
        }
    }
}
