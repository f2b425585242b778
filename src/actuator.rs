//! Fan actuator seam
//!
//! The cooling device is a black box commanded through two opaque
//! shell command strings (typically i2c register writes). The trait
//! boundary exists so the controller loop can be exercised against a
//! recording implementation in tests.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::trace;

use crate::error::{MonitorError, MonitorResult};

/// Two-state cooling device control surface.
///
/// Implementations must be idempotent: the controller re-issues the
/// current command on every cycle while the reading stays outside the
/// dead band.
#[async_trait]
pub trait Actuator: Send + Sync {
    async fn start_fan(&self) -> MonitorResult<()>;
    async fn stop_fan(&self) -> MonitorResult<()>;
}

/// Runs the configured command strings through `bash -c`
#[derive(Debug, Clone)]
pub struct ShellActuator {
    start_cmd: String,
    stop_cmd: String,
}

impl ShellActuator {
    pub fn new(start_cmd: String, stop_cmd: String) -> Self {
        Self { start_cmd, stop_cmd }
    }

    async fn run(&self, command: &str) -> MonitorResult<()> {
        trace!("running fan command {command:?}");

        let status = Command::new("bash")
            .arg("-c")
            .arg(command)
            .status()
            .await
            .map_err(|e| MonitorError::Actuator {
                command: command.to_string(),
                reason: e.to_string(),
            })?;

        if !status.success() {
            return Err(MonitorError::Actuator {
                command: command.to_string(),
                reason: format!("exited with {status}"),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl Actuator for ShellActuator {
    async fn start_fan(&self) -> MonitorResult<()> {
        self.run(&self.start_cmd).await
    }

    async fn stop_fan(&self) -> MonitorResult<()> {
        self.run(&self.stop_cmd).await
    }
}
