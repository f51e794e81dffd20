use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use quizgate_cli::app::load_config;
use quizgate_cli::commands::parse::parse_file;
use quizgate_cli::commands::gate::require_access;
use quizgate_cli::App;
use quizgate_core::{
    FixedClock, FormatError, MemoryStorage, MemoryStore, QuizParser, QuizgateConfig, TrialStatus,
};

fn memory_app(clock: Arc<FixedClock>) -> App {
    App::with_parts(
        QuizgateConfig::default(),
        Arc::new(MemoryStore::with_clock(clock.clone())),
        Arc::new(MemoryStorage::new()),
        clock,
    )
}

#[test]
fn gate_allows_trial_then_blocks() {
    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap(),
    ));
    let app = memory_app(clock.clone());

    assert_eq!(require_access(&app.entitlements()).unwrap(), TrialStatus::Active);

    clock.advance(Duration::days(3));
    let denied = require_access(&app.entitlements()).unwrap_err();
    assert_eq!(denied.status, TrialStatus::Expired);
    assert!(denied.to_string().contains("quizgate upgrade"));
}

#[test]
fn gate_allows_premium() {
    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap(),
    ));
    let app = memory_app(clock.clone());
    clock.advance(Duration::days(5));

    let entitlements = app.entitlements();
    assert!(entitlements.provision_premium("Asha", "pay_test_1"));
    assert_eq!(require_access(&entitlements).unwrap(), TrialStatus::Premium);
}

#[test]
fn device_id_is_stable_across_services() {
    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap(),
    ));
    let app = memory_app(clock.clone());

    let first = app.entitlements().device_id().unwrap();
    clock.advance(Duration::seconds(30));
    assert_eq!(app.entitlements().device_id().unwrap(), first);
    assert!(first.starts_with("device_"));
}

#[test]
fn memory_app_uses_configured_storage_path() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = QuizgateConfig::default();
    config.storage.path = Some(dir.path().join("state").join("local.json"));

    let app = App::from_config(config, true).unwrap();
    let device_id = app.entitlements().device_id().unwrap();

    let saved = std::fs::read_to_string(dir.path().join("state").join("local.json")).unwrap();
    assert!(saved.contains(&device_id));
}

#[test]
fn remote_app_requires_backend_url() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = QuizgateConfig::default();
    config.storage.path = Some(dir.path().join("local.json"));

    let err = App::from_config(config, false).err().unwrap();
    assert!(format!("{err:#}").contains("Backend is not configured"));
}

#[test]
fn load_config_from_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    std::fs::write(&path, "[quiz]\nimage_base_url = \"https://img.example\"\n").unwrap();

    let config = load_config(Some(path.as_path())).unwrap();
    assert_eq!(config.quiz.image_base_url, "https://img.example");
    assert!(load_config(Some(dir.path().join("missing.toml").as_path())).is_err());
}

#[test]
fn init_writes_default_config_once() {
    let dir = tempfile::tempdir().unwrap();
    quizgate_cli::commands::init::run(Some(dir.path())).unwrap();

    let path = dir.path().join("quizgate.toml");
    let written = QuizgateConfig::from_file(&path).unwrap();
    assert_eq!(written.checkout.amount, 29900);

    std::fs::write(&path, "[checkout]\namount = 1\n").unwrap();
    quizgate_cli::commands::init::run(Some(dir.path())).unwrap();
    assert_eq!(QuizgateConfig::from_file(&path).unwrap().checkout.amount, 1);
}

#[test]
fn parse_file_reads_js_as_script_format() {
    let dir = tempfile::tempdir().unwrap();
    let parser = QuizParser::default();

    let wrong_names = dir.path().join("mock.js");
    std::fs::write(&wrong_names, "a1 A\na2 B\n").unwrap();
    let err = parse_file(&parser, &wrong_names).unwrap_err();
    assert_eq!(
        err.downcast_ref::<FormatError>(),
        Some(&FormatError::MissingArrays)
    );

    let lines = dir.path().join("mock.txt");
    std::fs::write(&lines, "a1 A\na2 B\n").unwrap();
    assert_eq!(parse_file(&parser, &lines).unwrap().len(), 2);
}
