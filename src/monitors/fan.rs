//! Fan controller loop
//!
//! Two-threshold hysteresis over one zone's readings. The action is
//! re-derived from the instantaneous reading on every cycle, not from
//! remembered state: a zone that stays above the start threshold
//! re-issues the start command each cycle, and likewise below the stop
//! threshold. The actuator contract is idempotent, so the repeats are
//! harmless reassertion.
//!
//! There is no final actuator command on shutdown; the fan stays in
//! whatever state it was last commanded to.

use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, trace};

use crate::actuator::Actuator;
use crate::config::FanThresholds;
use crate::error::MonitorResult;
use crate::sensor::ThermalZone;

/// Per-cycle outcome of the hysteresis rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanAction {
    Start,
    Stop,
    /// Dead band, no actuator call
    Hold,
}

impl FanAction {
    /// Strictly above the band starts the fan, strictly below stops
    /// it; the band itself (inclusive at both ends) holds.
    pub fn decide(celsius: f64, thresholds: FanThresholds) -> FanAction {
        if celsius > thresholds.start {
            FanAction::Start
        } else if celsius < thresholds.stop {
            FanAction::Stop
        } else {
            FanAction::Hold
        }
    }
}

pub struct FanController<A> {
    zone: ThermalZone,
    interval: Duration,
    thresholds: FanThresholds,
    actuator: A,
}

impl<A> FanController<A>
where
    A: Actuator,
{
    pub fn new(
        zone: ThermalZone,
        interval: Duration,
        thresholds: FanThresholds,
        actuator: A,
    ) -> Self {
        Self {
            zone,
            interval,
            thresholds,
            actuator,
        }
    }

    /// Run until cancelled or a read/actuator failure.
    ///
    /// An actuator that cannot be commanded may mean an unsafe thermal
    /// state, so the error propagates instead of being retried.
    #[instrument(skip_all, fields(zone = %self.zone))]
    pub async fn run(self, shutdown: CancellationToken) -> MonitorResult<()> {
        debug!(
            "adjusting fan every {:?} (start > {}°C, stop < {}°C)",
            self.interval, self.thresholds.start, self.thresholds.stop
        );

        loop {
            self.adjust().await?;

            tokio::select! {
                _ = sleep(self.interval) => {}
                _ = shutdown.cancelled() => {
                    debug!("fan controller stopped");
                    return Ok(());
                }
            }
        }
    }

    async fn adjust(&self) -> MonitorResult<()> {
        let celsius = self.zone.read_celsius().await?;

        match FanAction::decide(celsius, self.thresholds) {
            FanAction::Start => {
                debug!("starting fan at {celsius:.1}°");
                self.actuator.start_fan().await?;
            }
            FanAction::Stop => {
                debug!("stopping fan at {celsius:.1}°");
                self.actuator.stop_fan().await?;
            }
            FanAction::Hold => {
                trace!("fan unchanged at {celsius:.1}°");
            }
        }

        Ok(())
    }
}
