//! Concurrent monitor and controller behavior against a fake sysfs

use std::time::Duration;

use assert_matches::assert_matches;
use thermd::config::FanThresholds;
use thermd::error::MonitorError;
use thermd::metrics::TemperatureMetrics;
use thermd::monitors::{FanController, TemperatureMonitor};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::helpers::{FakeSysfs, FanCall, RecordingActuator};

const THRESHOLDS: FanThresholds = FanThresholds {
    start: 75.0,
    stop: 45.0,
};

#[tokio::test]
async fn independent_monitors_feed_independent_gauges() {
    let sysfs = FakeSysfs::new();
    let metrics = TemperatureMetrics::new().unwrap();
    let shutdown = CancellationToken::new();

    let mut loops = JoinSet::new();
    for (zone, raw) in [(0, "41000\n"), (1, "52500\n"), (2, "63000\n"), (3, "74250\n")] {
        let monitor = TemperatureMonitor::new(
            sysfs.set_zone(zone, raw),
            Duration::from_millis(10),
            metrics.zone(&format!("zone{zone}")),
        );
        loops.spawn(monitor.run(shutdown.clone()));
    }

    tokio::time::sleep(Duration::from_millis(100)).await;
    shutdown.cancel();

    while let Some(joined) = loops.join_next().await {
        joined.unwrap().unwrap();
    }

    let body = metrics.encode().unwrap();
    assert!(body.contains("odroid_temperature_celsius{zone=\"zone0\"} 41"));
    assert!(body.contains("odroid_temperature_celsius{zone=\"zone1\"} 52.5"));
    assert!(body.contains("odroid_temperature_celsius{zone=\"zone2\"} 63"));
    assert!(body.contains("odroid_temperature_celsius{zone=\"zone3\"} 74.25"));
}

#[tokio::test]
async fn one_failing_monitor_does_not_stop_a_healthy_one() {
    let sysfs = FakeSysfs::new();
    let metrics = TemperatureMetrics::new().unwrap();
    let shutdown = CancellationToken::new();

    let healthy = TemperatureMonitor::new(
        sysfs.set_zone(0, "50000\n"),
        Duration::from_millis(10),
        metrics.zone("zone0"),
    );
    let broken = TemperatureMonitor::new(
        sysfs.set_zone(1, "not-a-number\n"),
        Duration::from_millis(10),
        metrics.zone("zone1"),
    );

    let healthy_task = tokio::spawn(healthy.run(shutdown.clone()));
    let broken_result = broken.run(shutdown.clone()).await;

    // the broken zone fails on its first read ...
    assert_matches!(broken_result, Err(MonitorError::SensorParse { .. }));

    // ... while the healthy one keeps sampling until told to stop
    assert!(!healthy_task.is_finished());
    shutdown.cancel();
    healthy_task.await.unwrap().unwrap();

    let body = metrics.encode().unwrap();
    assert!(body.contains("zone=\"zone0\"} 50"));
}

#[tokio::test]
async fn hot_zone_reasserts_start_every_cycle() {
    let sysfs = FakeSysfs::new();
    let actuator = RecordingActuator::default();
    let shutdown = CancellationToken::new();

    let controller = FanController::new(
        sysfs.set_zone(0, "80500\n"),
        Duration::from_millis(10),
        THRESHOLDS,
        actuator.clone(),
    );
    let task = tokio::spawn(controller.run(shutdown.clone()));

    tokio::time::sleep(Duration::from_millis(100)).await;
    shutdown.cancel();
    task.await.unwrap().unwrap();

    let calls = actuator.calls();
    assert!(calls.len() >= 2, "expected repeated start commands, got {calls:?}");
    assert!(calls.iter().all(|c| *c == FanCall::Start));
}

#[tokio::test]
async fn cold_zone_reasserts_stop_every_cycle() {
    let sysfs = FakeSysfs::new();
    let actuator = RecordingActuator::default();
    let shutdown = CancellationToken::new();

    let controller = FanController::new(
        sysfs.set_zone(0, "30000\n"),
        Duration::from_millis(10),
        THRESHOLDS,
        actuator.clone(),
    );
    let task = tokio::spawn(controller.run(shutdown.clone()));

    tokio::time::sleep(Duration::from_millis(100)).await;
    shutdown.cancel();
    task.await.unwrap().unwrap();

    let calls = actuator.calls();
    assert!(calls.len() >= 2);
    assert!(calls.iter().all(|c| *c == FanCall::Stop));
}

#[tokio::test]
async fn no_actuator_calls_after_cancellation() {
    let sysfs = FakeSysfs::new();
    let actuator = RecordingActuator::default();
    let shutdown = CancellationToken::new();

    let controller = FanController::new(
        sysfs.set_zone(0, "80500\n"),
        Duration::from_millis(10),
        THRESHOLDS,
        actuator.clone(),
    );
    let task = tokio::spawn(controller.run(shutdown.clone()));

    tokio::time::sleep(Duration::from_millis(50)).await;
    shutdown.cancel();
    task.await.unwrap().unwrap();

    let after_cancel = actuator.calls().len();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(actuator.calls().len(), after_cancel);
}

#[tokio::test]
async fn dead_band_zone_only_samples() {
    let sysfs = FakeSysfs::new();
    let actuator = RecordingActuator::default();
    let shutdown = CancellationToken::new();

    let controller = FanController::new(
        sysfs.set_zone(0, "55000\n"),
        Duration::from_millis(10),
        THRESHOLDS,
        actuator.clone(),
    );
    let task = tokio::spawn(controller.run(shutdown.clone()));

    tokio::time::sleep(Duration::from_millis(100)).await;
    shutdown.cancel();
    task.await.unwrap().unwrap();

    assert!(actuator.calls().is_empty());
}

#[tokio::test]
async fn unreadable_fan_zone_is_fatal_for_the_controller() {
    let sysfs = FakeSysfs::new();
    let controller = FanController::new(
        // zone directory never created
        thermd::sensor::ThermalZone::new(sysfs.root(), 9),
        Duration::from_millis(10),
        THRESHOLDS,
        RecordingActuator::default(),
    );

    let result = controller.run(CancellationToken::new()).await;
    assert_matches!(result, Err(MonitorError::SensorRead { .. }));
}
