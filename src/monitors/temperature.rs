//! Temperature monitor loop
//!
//! One monitor per exported zone. Each cycle reads the zone sensor,
//! writes the reading into its gauge and then waits for either the
//! sampling interval to elapse or the shutdown token to fire. A read
//! or parse failure ends the loop with the error; recovery is the
//! supervisor's problem.

use std::time::Duration;

use prometheus::Gauge;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use crate::error::MonitorResult;
use crate::sensor::ThermalZone;

pub struct TemperatureMonitor {
    zone: ThermalZone,
    interval: Duration,
    gauge: Gauge,
}

impl TemperatureMonitor {
    pub fn new(zone: ThermalZone, interval: Duration, gauge: Gauge) -> Self {
        Self {
            zone,
            interval,
            gauge,
        }
    }

    /// Run until cancelled or the sensor fails.
    ///
    /// On cancellation the loop returns at the next wait boundary
    /// without a further read. The gauge keeps its last value.
    #[instrument(skip_all, fields(zone = %self.zone))]
    pub async fn run(self, shutdown: CancellationToken) -> MonitorResult<()> {
        debug!(
            "checking temperature every {:?} from {:?}",
            self.interval,
            self.zone.path()
        );

        loop {
            let celsius = self.zone.read_celsius().await?;

            debug!("temperature: {celsius:.3}°C");
            self.gauge.set(celsius);

            tokio::select! {
                _ = sleep(self.interval) => {}
                _ = shutdown.cancelled() => {
                    debug!("monitor stopped");
                    return Ok(());
                }
            }
        }
    }
}
