//! Unit tests for config module
//!
//! Tests configuration types, defaults, serialization and file loading.

#![allow(clippy::panic)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::fs;

use tempfile::TempDir;

use crate::{
    PrefError,
    config::{Config, ConfigPaths, LogLevel, StoreConfig},
    location::DEFAULT_FILENAME,
};

#[test]
fn config_default() {
    let config = Config::default();

    assert_eq!(config.general.log_level, LogLevel::Warn);
    assert!(!config.general.log_to_file);
    assert_eq!(config.store.filename, DEFAULT_FILENAME);
    assert!(config.store.directory.is_none());
    assert!(config.store.scratch_dir.is_none());
}

#[test]
fn config_serialize_toml() {
    let config = Config::default();

    let toml_str = toml::to_string(&config).unwrap();
    assert!(toml_str.contains("[general]"));
    assert!(toml_str.contains("[store]"));
    assert!(toml_str.contains("log_level = \"warn\""));
}

#[test]
fn config_deserialize_toml() {
    let toml_str = r#"
        [general]
        log_level = "debug"

        [store]
        directory = "/var/lib/app"
        filename = "settings.pref"
    "#;

    let config: Config = toml::from_str(toml_str).unwrap();

    assert_eq!(config.general.log_level, LogLevel::Debug);
    assert_eq!(
        config.store.directory.as_deref(),
        Some(std::path::Path::new("/var/lib/app"))
    );
    assert_eq!(config.store.filename, "settings.pref");
    assert!(config.store.scratch_dir.is_none());
}

#[test]
fn config_serialize_roundtrip() {
    let original = Config {
        store: StoreConfig {
            scratch_dir: Some("/tmp/scratch".into()),
            ..StoreConfig::default()
        },
        ..Config::default()
    };

    let toml_str = toml::to_string(&original).unwrap();
    let deserialized: Config = toml::from_str(&toml_str).unwrap();

    assert_eq!(original, deserialized);
}

#[test]
fn config_empty_toml() {
    let config: Config = toml::from_str("").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn config_partial_store_section() {
    let config: Config = toml::from_str("[store]\nscratch_dir = \"/scratch\"\n").unwrap();

    assert_eq!(config.store.filename, DEFAULT_FILENAME);
    assert!(config.store.scratch_dir.is_some());
}

#[test]
fn config_rejects_unknown_log_level() {
    let result: Result<Config, _> = toml::from_str("[general]\nlog_level = \"loud\"\n");
    assert!(result.is_err());
}

#[test]
fn log_level_display_matches_serde_names() {
    for level in [
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ] {
        let toml_str = toml::to_string(&Config {
            general: crate::config::GeneralConfig {
                log_level: level,
                log_to_file: false,
            },
            ..Config::default()
        })
        .unwrap();
        assert!(toml_str.contains(&format!("log_level = \"{level}\"")));
    }
}

#[test]
fn load_missing_file_gives_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::load(&temp_dir.path().join("absent.toml")).unwrap();

    assert_eq!(config, Config::default());
}

#[test]
fn load_malformed_file_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "[general\nlog_level = ").unwrap();

    match Config::load(&path) {
        Err(PrefError::ConfigFile { location, .. }) => assert!(location.ends_with("config.toml")),
        other => panic!("expected ConfigFile error, got {other:?}"),
    }
}

#[test]
fn load_or_create_writes_loadable_default_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("config.toml");

    let config = Config::load_or_create(&path).unwrap();

    assert!(path.exists());
    assert_eq!(config, Config::default());
}

#[test]
fn store_config_location_uses_directory() {
    let temp_dir = TempDir::new().unwrap();
    let store = StoreConfig {
        directory: Some(temp_dir.path().to_path_buf()),
        filename: "app".to_string(),
        scratch_dir: None,
    };

    let location = store.location().unwrap();
    assert_eq!(location.filename(), "app.pref");
    assert_eq!(location.directory(), temp_dir.path());
}

#[test]
fn config_paths_valid() {
    if std::env::var("XDG_CONFIG_HOME").is_ok() || std::env::var("HOME").is_ok() {
        let main_path = ConfigPaths::main_config().unwrap();
        assert!(main_path.ends_with("prefstore/config.toml"));
        assert_eq!(main_path.parent(), ConfigPaths::config_dir().ok().as_deref());
    }
}
