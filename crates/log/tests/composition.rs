//! Sink composition properties

use std::path::Path;

use gateway_log::sink::{FsProvisioner, SinkKind, Tier, compose};
use gateway_log::{Environment, LogError, LogOptions, LogResult, Severity};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn ok(_: &Path) -> LogResult<()> {
    Ok(())
}

fn options(level: Severity, env: Environment, file: bool) -> LogOptions {
    LogOptions {
        level: Some(level),
        file: Some(file),
        directory: Some("/tmp/logs".into()),
        environment: Some(env),
        ..LogOptions::default()
    }
}

#[rstest]
fn test_file_disabled_means_console_only(
    #[values(Severity::Silly, Severity::Info, Severity::Error)] level: Severity,
    #[values(Environment::Development, Environment::Production)] env: Environment,
) {
    let composition = compose(&options(level, env, false).resolve(), &ok);
    assert_eq!(composition.sinks.len(), 1);
    assert_eq!(composition.sinks[0].kind, SinkKind::Console);
}

#[test]
fn test_console_disabled_and_file_disabled_means_nothing() {
    let mut opts = options(Severity::Info, Environment::Development, false);
    opts.console = Some(false);
    assert!(compose(&opts.resolve(), &ok).sinks.is_empty());
}

#[rstest]
#[case(Severity::Info)]
#[case(Severity::Warn)]
#[case(Severity::Error)]
fn test_production_without_diagnostic_floor_has_no_debug_tier(#[case] level: Severity) {
    let composition = compose(&options(level, Environment::Production, true).resolve(), &ok);
    assert!(composition.tier(Tier::Debug).is_none());
    assert_eq!(composition.file_sinks().count(), 4);
}

#[rstest]
fn test_diagnostic_floor_always_has_debug_tier(
    #[values(Severity::Silly, Severity::Debug, Severity::Verbose)] level: Severity,
    #[values(
        Environment::Development,
        Environment::Production,
        Environment::Other("staging".into())
    )]
    env: Environment,
) {
    let composition = compose(&options(level, env, true).resolve(), &ok);
    assert_eq!(composition.tier(Tier::Debug).unwrap().floor, Severity::Debug);
}

#[rstest]
fn test_error_tier_keeps_twice_max_files(#[values(1, 2, 5, 10, 30, 1000)] max_files: usize) {
    let mut opts = options(Severity::Info, Environment::Development, true);
    opts.max_files = Some(max_files);
    let composition = compose(&opts.resolve(), &ok);

    let error = composition.tier(Tier::Error).unwrap().rotation().unwrap();
    assert_eq!(error.max_files, 2 * max_files);
    for tier in [Tier::Warn, Tier::Info, Tier::Combined, Tier::Debug] {
        assert_eq!(
            composition.tier(tier).unwrap().rotation().unwrap().max_files,
            max_files
        );
    }
}

#[rstest]
#[case(Severity::Silly)]
#[case(Severity::Debug)]
#[case(Severity::Verbose)]
fn test_production_console_is_info(#[case] level: Severity) {
    let composition = compose(&options(level, Environment::Production, false).resolve(), &ok);
    assert_eq!(composition.console().unwrap().floor, Severity::Info);
}

#[test]
fn test_production_scenario_order() {
    let composition = compose(
        &options(Severity::Info, Environment::Production, true).resolve(),
        &ok,
    );

    let summary: Vec<(Option<Tier>, Severity)> = composition
        .sinks
        .iter()
        .map(|sink| (sink.tier(), sink.floor))
        .collect();
    assert_eq!(
        summary,
        vec![
            (None, Severity::Info),
            (Some(Tier::Error), Severity::Error),
            (Some(Tier::Warn), Severity::Warn),
            (Some(Tier::Info), Severity::Info),
            (Some(Tier::Combined), Severity::Info),
        ]
    );
    assert_eq!(
        composition.tier(Tier::Error).unwrap().rotation().unwrap().max_files,
        20
    );
}

#[test]
fn test_directory_failure_keeps_console() {
    let failing = |path: &Path| -> LogResult<()> {
        Err(LogError::Directory {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        })
    };
    let composition = compose(
        &options(Severity::Debug, Environment::Development, true).resolve(),
        &failing,
    );

    assert_eq!(composition.file_sinks().count(), 0);
    assert!(composition.console().is_some());
    assert_eq!(composition.diagnostics.len(), 1);
}

#[test]
fn test_real_directory_is_created() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("nested/logs");
    let mut opts = options(Severity::Info, Environment::Development, true);
    opts.directory = Some(dir.clone());

    let composition = compose(&opts.resolve(), &FsProvisioner);
    assert!(dir.is_dir());
    for sink in composition.file_sinks() {
        assert_eq!(sink.rotation().unwrap().directory, dir);
    }
}
