use std::time::Duration;

use anyhow::Result;
use gateway_log::prelude::*;
use gateway_log::{LogConfig, LoggerBuilder, TransportLayer};
use serde_json::json;
use tracing_subscriber::layer::SubscriberExt;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let mut config = LogConfig::development();
    config.file = true;
    config.directory = dir.path().to_path_buf();

    let (mut logger, guard) = LoggerBuilder::from_config(config).build();

    // Route plain `tracing` events from dependencies into the same sinks
    let subscriber = tracing_subscriber::registry()
        .with(TransportLayer::new(logger.transport().clone()).with_floor(Severity::Info));
    tracing::subscriber::set_global_default(subscriber)?;

    logger.set_context("Gateway");
    logger.startup("Gateway starting", metadata!(version = env!("CARGO_PKG_VERSION")));

    logger.connection("MQTT Broker", ConnectionStatus::Connected, None, Metadata::new());
    logger.mqtt(
        Severity::Info,
        "Subscribed",
        json!({ "topic": "sensors/+/telemetry", "qos": 1 }),
    );
    logger.redis(Severity::Debug, "Cache warm", json!({ "keys": 128 }));

    let readings = async {
        tokio::time::sleep(Duration::from_millis(25)).await;
        vec![21.5, 21.7, 22.0]
    }
    .timed(&logger, "poll_sensors")
    .await;
    logger.data_processing("telemetry batch", readings.len(), None, Metadata::new());

    let writer = logger.child("InfluxWriter");
    writer.info("Batch flushed", metadata!(points = readings.len()));

    let failure = anyhow::anyhow!("connection reset").context("write to bucket `telemetry`");
    writer.error("Flush failed", Some(Trace::from(&failure)), Metadata::new());
    logger.connection(
        "Database",
        ConnectionStatus::Disconnected,
        Some("retrying in 5s"),
        metadata!(attempt = 1),
    );

    tracing::info!(target: "rumqttc", "keepalive sent");

    drop(guard);
    for entry in std::fs::read_dir(dir.path())? {
        let path = entry?.path();
        let lines = std::fs::read_to_string(&path)?.lines().count();
        println!("{}: {lines} records", path.display());
    }
    Ok(())
}
