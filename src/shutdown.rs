//! Process-wide shutdown signal
//!
//! One cancellation token, created at startup and cancelled exactly
//! once by the first SIGINT, SIGQUIT or SIGTERM. Every loop observes
//! the same token at its cycle-wait boundary. A second SIGINT or
//! SIGTERM while shutdown is in progress exits immediately.

use std::io;

use tokio::signal::unix::{SignalKind, signal};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Register the signal handlers and return the shared token.
///
/// Must be called from within the tokio runtime. Signal streams are
/// created before the listener task is spawned so registration errors
/// surface at startup.
pub fn listen() -> io::Result<CancellationToken> {
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut quit = signal(SignalKind::quit())?;
    let mut terminate = signal(SignalKind::terminate())?;

    let token = CancellationToken::new();
    let cancel = token.clone();

    tokio::spawn(async move {
        tokio::select! {
            _ = interrupt.recv() => info!("captured SIGINT, stopping"),
            _ = quit.recv() => info!("captured SIGQUIT, stopping"),
            _ = terminate.recv() => info!("captured SIGTERM, stopping"),
        }
        cancel.cancel();

        tokio::select! {
            _ = interrupt.recv() => {}
            _ = terminate.recv() => {}
        }
        warn!("second signal captured, exiting");
        std::process::exit(0);
    });

    Ok(token)
}
