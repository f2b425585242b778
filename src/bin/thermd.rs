use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use thermd::actuator::ShellActuator;
use thermd::config::{
    Config, DEFAULT_ADDR, DEFAULT_START_FAN_CMD, DEFAULT_STOP_FAN_CMD, DEFAULT_THERMAL_ROOT,
    FanConfig, FanThresholds,
};
use thermd::error::MonitorError;
use thermd::metrics::TemperatureMetrics;
use thermd::monitors::{FanController, TemperatureMonitor};
use thermd::sensor::ThermalZone;
use thermd::server::{MetricsServer, SHUTDOWN_TIMEOUT};
use thermd::shutdown;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{error, info, level_filters::LevelFilter, trace, warn};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Parser)]
#[command(name = "thermd", version, about = "Thermal zone exporter and fan control daemon")]
struct Args {
    /// The address to listen on for HTTP requests
    #[arg(long, default_value = DEFAULT_ADDR)]
    addr: SocketAddr,

    /// The interval in seconds at which the temperature is checked
    #[arg(long, default_value_t = 10)]
    interval: u64,

    /// Enable debug output
    #[arg(long)]
    debug: bool,

    /// The interval in seconds at which the fan is adjusted
    #[arg(long, default_value_t = 2)]
    fan_interval: u64,

    /// Start fan threshold in °C
    #[arg(long, default_value_t = 75.0)]
    start_fan_threshold: f64,

    /// Stop fan threshold in °C
    #[arg(long, default_value_t = 45.0)]
    stop_fan_threshold: f64,

    /// Start fan command
    #[arg(long, default_value = DEFAULT_START_FAN_CMD)]
    start_fan_cmd: String,

    /// Stop fan command
    #[arg(long, default_value = DEFAULT_STOP_FAN_CMD)]
    stop_fan_cmd: String,

    /// Root of the sysfs thermal class
    #[arg(long, default_value = DEFAULT_THERMAL_ROOT)]
    thermal_root: PathBuf,

    /// Thermal zone indices to export
    #[arg(long, value_delimiter = ',', default_value = "0,1,2,3")]
    zones: Vec<u32>,

    /// Thermal zone the fan controller samples
    #[arg(long, default_value_t = 0)]
    fan_zone: u32,
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        Config {
            addr: args.addr,
            interval: Duration::from_secs(args.interval),
            thermal_root: args.thermal_root.clone(),
            zones: args.zones.clone(),
            fan: FanConfig {
                zone: args.fan_zone,
                interval: Duration::from_secs(args.fan_interval),
                thresholds: FanThresholds {
                    start: args.start_fan_threshold,
                    stop: args.stop_fan_threshold,
                },
                start_cmd: args.start_fan_cmd.clone(),
                stop_cmd: args.stop_fan_cmd.clone(),
            },
        }
    }
}

fn init(debug: bool) {
    let level = if debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let filter = filter::Targets::new().with_targets(vec![("thermd", level)]);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init(args.debug);
    trace!("started with args: {args:?}");

    let config = Config::from(&args);

    let metrics = Arc::new(TemperatureMetrics::new()?);
    let server = MetricsServer::bind(config.addr, metrics.clone()).await?;
    let shutdown = shutdown::listen()?;

    if !args.debug {
        info!("starting thermd web server at {:?}", config.addr.to_string());
        info!("if you want to see more verbose log run with --debug");
    }

    let mut loops: JoinSet<Result<(), MonitorError>> = JoinSet::new();

    for &zone in &config.zones {
        let monitor = TemperatureMonitor::new(
            ThermalZone::new(&config.thermal_root, zone),
            config.interval,
            metrics.zone(&format!("zone{zone}")),
        );
        loops.spawn(monitor.run(shutdown.clone()));
    }

    let controller = FanController::new(
        ThermalZone::new(&config.thermal_root, config.fan.zone),
        config.fan.interval,
        config.fan.thresholds,
        ShellActuator::new(config.fan.start_cmd.clone(), config.fan.stop_cmd.clone()),
    );
    loops.spawn(controller.run(shutdown.clone()));

    let mut server_task = tokio::spawn(server.run(shutdown.clone()));
    let mut server_done = false;
    let mut failure: Option<anyhow::Error> = None;

    // Supervise: the first loop error cancels everything, then the
    // remaining loops drain at their next wait boundary.
    loop {
        tokio::select! {
            joined = loops.join_next() => {
                match joined {
                    None => break,
                    Some(Ok(Ok(()))) => {}
                    Some(Ok(Err(e))) => {
                        error!("{e}");
                        failure.get_or_insert(e.into());
                        shutdown.cancel();
                    }
                    Some(Err(e)) => {
                        error!("monitor task failed: {e}");
                        failure.get_or_insert(e.into());
                        shutdown.cancel();
                    }
                }
            }
            joined = &mut server_task, if !server_done => {
                server_done = true;
                match joined {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        error!("{e}");
                        failure.get_or_insert(e.into());
                    }
                    Err(e) => {
                        error!("metrics server task failed: {e}");
                        failure.get_or_insert(e.into());
                    }
                }
                shutdown.cancel();
            }
        }
    }

    // Bounded shutdown of the scrape endpoint; a hung connection must
    // not keep the process alive.
    if !server_done {
        match timeout(SHUTDOWN_TIMEOUT, &mut server_task).await {
            Ok(Ok(Ok(()))) => {}
            Ok(Ok(Err(e))) => error!("metrics server error during shutdown: {e}"),
            Ok(Err(e)) => error!("metrics server task failed: {e}"),
            Err(_) => {
                warn!("metrics server did not stop within {SHUTDOWN_TIMEOUT:?}, exiting anyway");
                server_task.abort();
            }
        }
    }

    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
