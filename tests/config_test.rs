//! Tests for server configuration.

use ayu_server::{ConfigOverrides, ServerConfig};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::NamedTempFile;

fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write config");
    file
}

#[test]
fn test_default_config() {
    let config = ServerConfig::default();
    assert_eq!(config.host(), "localhost");
    assert_eq!(*config.port(), 8027);
    assert_eq!(config.poll_delay(), Duration::from_secs(55));
    assert_eq!(config.storage_dir(), &Some(PathBuf::from("var")));
    assert_eq!(config.bind_address(), "localhost:8027");
}

#[test]
fn test_from_file_keeps_missing_defaults() {
    let file = config_file("port = 9000\npoll_delay_secs = 5\n");
    let config = ServerConfig::from_file(file.path()).expect("config loads");
    assert_eq!(*config.port(), 9000);
    assert_eq!(config.poll_delay(), Duration::from_secs(5));
    assert_eq!(config.host(), "localhost");
}

#[test]
fn test_from_file_rejects_unknown_keys() {
    let file = config_file("prot = 9000\n");
    let err = ServerConfig::from_file(file.path()).expect_err("unknown key");
    assert!(err.message.contains("parse"));
}

#[test]
fn test_from_file_missing_file() {
    let err = ServerConfig::from_file("/nonexistent/ayu.toml").expect_err("no file");
    assert!(err.message.contains("read"));
}

#[test]
fn test_overrides_take_precedence() {
    let file = config_file("host = \"0.0.0.0\"\nport = 9000\nstorage_dir = \"/srv/ayu\"\n");
    let config = ServerConfig::from_file(file.path())
        .expect("config loads")
        .with_overrides(ConfigOverrides::new(
            None,
            Some(9100),
            Some(1),
            Some(PathBuf::from("/tmp/ayu")),
            false,
        ));
    assert_eq!(config.bind_address(), "0.0.0.0:9100");
    assert_eq!(config.poll_delay(), Duration::from_secs(1));
    assert_eq!(config.storage_dir(), &Some(PathBuf::from("/tmp/ayu")));
}

#[test]
fn test_memory_override_disables_storage() {
    let config = ServerConfig::default().with_overrides(ConfigOverrides::new(
        None, None, None, None, true,
    ));
    assert_eq!(config.storage_dir(), &None);
}
