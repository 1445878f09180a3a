//! Settings files and status file location.

use std::path::PathBuf;
use std::time::Duration;

use talon_deck::config::{Settings, DEFAULT_REPL_PATH};
use talon_deck::error::BridgeError;
use talon_deck::status::STATUS_FILE_NAME;

use crate::common::env::{with_tmpdir, without_tmpdir};
use crate::common::fixtures::StatusFixture;

#[test]
fn defaults_follow_stock_talon_install() {
    let settings = Settings::default();
    assert_eq!(settings.status_file_name, STATUS_FILE_NAME);
    assert_eq!(settings.repl_path, PathBuf::from(DEFAULT_REPL_PATH));
    assert_eq!(settings.action_timeout(), Duration::from_secs(5));
}

#[test]
fn status_path_uses_tmpdir() {
    let fixture = StatusFixture::new();
    let _env = with_tmpdir(fixture.dir_str());
    let path = Settings::default().status_path().unwrap();
    assert_eq!(path, fixture.path());
}

#[test]
fn status_path_without_tmpdir_uses_platform_temp() {
    let _env = without_tmpdir();
    let path = Settings::default().status_path().unwrap();
    assert_eq!(path, std::env::temp_dir().join(STATUS_FILE_NAME));
}

#[test]
fn explicit_config_file_overrides_fields() {
    let fixture = StatusFixture::new();
    let config = fixture.write_config(&format!(
        "status_dir = {:?}\nrepl_path = \"/opt/talon/repl\"\naction_timeout_ms = 250\n",
        fixture.dir_str()
    ));

    let settings = Settings::load(Some(config.as_path())).unwrap();
    assert_eq!(settings.status_path().unwrap(), fixture.path());
    assert_eq!(settings.repl_path().unwrap(), PathBuf::from("/opt/talon/repl"));
    assert_eq!(settings.action_timeout(), Duration::from_millis(250));
}

#[test]
fn explicit_config_must_exist() {
    let fixture = StatusFixture::new();
    let missing = fixture.dir.path().join("missing.toml");
    assert!(matches!(
        Settings::load(Some(missing.as_path())),
        Err(BridgeError::ConfigNotFound { .. })
    ));
}

#[test]
fn unknown_and_invalid_fields_are_rejected() {
    assert!(matches!(
        Settings::from_toml("status_fle = \"x\"\n"),
        Err(BridgeError::ConfigParse(_))
    ));
    assert!(matches!(
        Settings::from_toml("status_file_name = \"a/b\"\n"),
        Err(BridgeError::ConfigInvalid(_))
    ));
    assert!(matches!(
        Settings::from_toml("action_timeout_ms = 0\n"),
        Err(BridgeError::ConfigInvalid(_))
    ));
}

#[test]
fn status_file_override_splits_dir_and_name() {
    let mut settings = Settings::default();
    settings
        .set_status_file(&PathBuf::from("/var/run/talon/custom-status"))
        .unwrap();
    assert_eq!(settings.status_file_name, "custom-status");
    assert_eq!(
        settings.status_path().unwrap(),
        PathBuf::from("/var/run/talon/custom-status")
    );

    settings.set_status_file(&PathBuf::from("local-status")).unwrap();
    assert_eq!(settings.status_path().unwrap(), PathBuf::from("./local-status"));
}
