//! Configuration resolution tests
//!
//! Tests that manipulate PODSYNC_* environment variables are marked with
//! #[serial] so they never race each other.

use std::path::Path;

use podsync::config::Config;
use serial_test::serial;

const ENV_VARS: [&str; 4] = [
    "PODSYNC_SHOWS_DIR",
    "PODSYNC_DATA_DIR",
    "PODSYNC_PORT",
    "PODSYNC_OPENAI_API_KEY",
];

fn clear_env() {
    for var in ENV_VARS {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn env_overrides_everything() {
    clear_env();
    std::env::set_var("PODSYNC_SHOWS_DIR", "/tmp/my-shows");
    std::env::set_var("PODSYNC_DATA_DIR", "/tmp/my-data");
    std::env::set_var("PODSYNC_PORT", "9000");
    std::env::set_var("PODSYNC_OPENAI_API_KEY", "sk-test");

    let config = Config::load().unwrap();
    assert_eq!(config.shows_dir, Path::new("/tmp/my-shows"));
    assert_eq!(config.data_dir, Path::new("/tmp/my-data"));
    assert_eq!(config.port, 9000);
    assert_eq!(config.openai_api_key.as_deref(), Some("sk-test"));

    clear_env();
}

#[test]
#[serial]
fn defaults_apply_without_env_or_file() {
    clear_env();

    let config = Config::load().unwrap();
    assert_eq!(config.port, 5740);
    assert_eq!(config.shows_dir, Path::new("shows"));
    // Without a key the AI note routes stay disabled
    assert!(config.openai_api_key.is_none());
}

#[test]
#[serial]
fn invalid_port_is_rejected() {
    clear_env();
    std::env::set_var("PODSYNC_PORT", "not-a-port");

    assert!(Config::load().is_err());

    clear_env();
}

#[test]
#[serial]
fn blank_api_key_counts_as_absent() {
    clear_env();
    std::env::set_var("PODSYNC_OPENAI_API_KEY", "   ");

    let config = Config::load().unwrap();
    assert!(config.openai_api_key.is_none());

    clear_env();
}

#[test]
#[serial]
fn database_path_lives_under_the_data_dir() {
    clear_env();
    std::env::set_var("PODSYNC_DATA_DIR", "/tmp/pd");

    let config = Config::load().unwrap();
    assert_eq!(config.database_path(), Path::new("/tmp/pd/podsync.db"));

    clear_env();
}
