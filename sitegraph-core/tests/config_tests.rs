// Tests for the settings file

use sitegraph_core::config::{
    CONFIG_FILE_NAME, ConfigError, Settings, SettingsOverrides, config_file_in,
};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_defaults_match_crawler_defaults() {
    let settings = Settings::default();
    assert_eq!(settings.max_pages, 200);
    assert_eq!(settings.max_depth, 3);
    assert_eq!(settings.workers, 1);
    assert_eq!(settings.timeout_secs, 10);
    assert!(settings.user_agent.starts_with("sitegraph/"));
}

#[test]
fn test_missing_file_gives_defaults() {
    let dir = TempDir::new().unwrap();
    let settings = Settings::load(&dir.path().join("absent.json")).unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, r#"{ "max_pages": 50, "workers": 4 }"#).unwrap();

    let settings = Settings::load(&path).unwrap();
    assert_eq!(settings.max_pages, 50);
    assert_eq!(settings.workers, 4);
    assert_eq!(settings.max_depth, 3);
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, "{ not json").unwrap();

    let err = Settings::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn test_save_then_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
    let settings = Settings {
        max_pages: 25,
        max_depth: 1,
        ..Settings::default()
    };

    settings.save(&path).unwrap();
    assert_eq!(Settings::load(&path).unwrap(), settings);
}

#[test]
fn test_overrides_take_precedence() {
    let mut settings = Settings {
        max_pages: 25,
        max_depth: 1,
        ..Settings::default()
    };
    settings.apply(&SettingsOverrides {
        max_depth: Some(5),
        workers: Some(8),
        ..SettingsOverrides::default()
    });

    assert_eq!(settings.max_pages, 25);
    assert_eq!(settings.max_depth, 5);
    assert_eq!(settings.workers, 8);
}

#[test]
fn test_crawler_config_never_has_zero_workers() {
    let settings = Settings {
        workers: 0,
        ..Settings::default()
    };
    assert_eq!(settings.crawler_config().workers, 1);
}

#[test]
fn test_config_file_in_expands_directory() {
    let path = config_file_in("/tmp/sitegraph");
    assert_eq!(path, std::path::PathBuf::from("/tmp/sitegraph/config.json"));

    let home = config_file_in("~/.config/sitegraph/");
    assert!(home.ends_with("sitegraph/config.json"));
}
