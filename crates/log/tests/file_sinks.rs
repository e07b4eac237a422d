//! End-to-end: facade calls through the composed sinks into tier files

use std::collections::HashMap;
use std::path::Path;

use gateway_log::{
    ConnectionStatus, Environment, LogOptions, Metadata, Severity, Trace, init, metadata,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn read_lines(dir: &Path, tier: &str) -> Vec<String> {
    let mut lines = Vec::new();
    for entry in std::fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        if name.starts_with(&format!("{tier}-")) && name.ends_with(".log") {
            let content = std::fs::read_to_string(&path).unwrap();
            lines.extend(content.lines().map(str::to_string));
        }
    }
    lines
}

fn read_tier(dir: &Path, tier: &str) -> Vec<Value> {
    read_lines(dir, tier)
        .iter()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn messages(records: &[Value]) -> Vec<&str> {
    records
        .iter()
        .map(|record| record["message"].as_str().unwrap())
        .collect()
}

#[test]
fn test_tiers_receive_matching_severities() {
    let dir = tempfile::tempdir().unwrap();
    let (mut logger, guard) = init(LogOptions {
        level: Some(Severity::Debug),
        console: Some(false),
        file: Some(true),
        directory: Some(dir.path().to_path_buf()),
        environment: Some(Environment::Development),
        ..LogOptions::default()
    });
    logger.set_context("Gateway");

    logger.debug("d", None, Metadata::new());
    logger.verbose("v", None, Metadata::new());
    logger.info("i", None, Metadata::new());
    logger.warn("w", None, Metadata::new());
    logger.error("e", Some("at poll".into()), None, Metadata::new());
    drop(guard);

    assert_eq!(messages(&read_tier(dir.path(), "error")), vec!["e"]);
    assert_eq!(messages(&read_tier(dir.path(), "warn")), vec!["w", "e"]);
    assert_eq!(messages(&read_tier(dir.path(), "info")), vec!["i", "w", "e"]);
    assert_eq!(
        messages(&read_tier(dir.path(), "combined")),
        vec!["d", "v", "i", "w", "e"]
    );
    assert_eq!(
        messages(&read_tier(dir.path(), "debug")),
        vec!["d", "v", "i", "w", "e"]
    );

    let error = &read_tier(dir.path(), "error")[0];
    assert_eq!(error["level"], json!("ERROR"));
    assert_eq!(error["context"], json!("Gateway"));
    assert_eq!(error["stack"], json!("at poll"));
}

#[test]
fn test_records_follow_the_durable_layout() {
    let dir = tempfile::tempdir().unwrap();
    let (logger, guard) = init(LogOptions {
        console: Some(false),
        file: Some(true),
        directory: Some(dir.path().to_path_buf()),
        environment: Some(Environment::Production),
        ..LogOptions::default()
    });

    logger.connection(
        "Database",
        ConnectionStatus::Disconnected,
        None,
        metadata!(attempt = 2),
    );
    logger.mqtt(Severity::Info, "subscribed", json!({"topic": "sensors/#"}));
    drop(guard);

    let lines = read_lines(dir.path(), "warn");
    assert_eq!(lines.len(), 1);
    let record: Value = serde_json::from_str(&lines[0]).unwrap();

    // field order is part of the on-disk contract
    let keys: Vec<&str> = record.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec!["timestamp", "level", "message", "context", "service", "status", "attempt"]
    );

    assert_eq!(record["level"], json!("WARN"));
    assert_eq!(record["context"], json!("ConnectionMonitor"));
    assert!(record["message"].as_str().unwrap().contains("Database"));

    let combined = read_tier(dir.path(), "combined");
    let by_context: HashMap<&str, &Value> = combined
        .iter()
        .map(|r| (r["context"].as_str().unwrap(), r))
        .collect();
    assert_eq!(by_context["MQTT"]["data"], json!({"topic": "sensors/#"}));
    assert!(read_tier(dir.path(), "debug").is_empty());
}

#[test]
fn test_child_and_parent_share_files() {
    let dir = tempfile::tempdir().unwrap();
    let (mut logger, guard) = init(LogOptions {
        console: Some(false),
        file: Some(true),
        directory: Some(dir.path().to_path_buf()),
        ..LogOptions::default()
    });
    logger.set_context("Parent");
    let child = logger.child("X");
    logger.set_context("Renamed");

    child.info("from child", Metadata::new());
    logger.info("from parent", None, Metadata::new());
    let err = std::io::Error::other("refused");
    child.error("child failed", Some(Trace::from_error(&err)), Metadata::new());
    drop(guard);

    let records = read_tier(dir.path(), "info");
    let contexts: Vec<&str> = records
        .iter()
        .map(|r| r["context"].as_str().unwrap())
        .collect();
    assert_eq!(contexts, vec!["X", "Renamed", "X"]);
    assert_eq!(records[2]["stack"], json!("refused"));
}

#[test]
fn test_unwritable_directory_degrades_to_console() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, b"not a directory").unwrap();

    let (logger, guard) = init(LogOptions {
        file: Some(true),
        directory: Some(blocker.join("logs")),
        ..LogOptions::default()
    });
    logger.info("console only", None, Metadata::new());

    assert_eq!(guard.diagnostics().len(), 1);
    let transport = guard.transport().unwrap();
    let sinks: Vec<_> = transport.sinks().collect();
    assert_eq!(sinks.len(), 1);
    assert!(sinks[0].is_console());
}
