//! Configuration resolution for podsync
//!
//! Every setting resolves with the same priority: environment variable,
//! then the TOML config file, then a compiled default. The OpenAI key is
//! optional; without it the sync engine still runs and only the AI note
//! routes are unavailable.

use std::path::PathBuf;

use anyhow::Result;
use serde::Deserialize;

const ENV_SHOWS_DIR: &str = "PODSYNC_SHOWS_DIR";
const ENV_DATA_DIR: &str = "PODSYNC_DATA_DIR";
const ENV_PORT: &str = "PODSYNC_PORT";
const ENV_OPENAI_API_KEY: &str = "PODSYNC_OPENAI_API_KEY";

const DEFAULT_PORT: u16 = 5740;

/// Resolved service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Folder of `<number> - <title>.md` show-note files
    pub shows_dir: PathBuf,
    /// Folder holding the SQLite database
    pub data_dir: PathBuf,
    pub port: u16,
    pub openai_api_key: Option<String>,
}

/// On-disk config file shape (`~/.config/podsync/config.toml`).
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    shows_dir: Option<String>,
    data_dir: Option<String>,
    port: Option<u16>,
    openai_api_key: Option<String>,
}

impl Config {
    /// Resolve configuration: ENV, then TOML file, then defaults.
    pub fn load() -> Result<Self> {
        let file = load_config_file();

        let shows_dir = std::env::var(ENV_SHOWS_DIR)
            .ok()
            .or(file.shows_dir)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("shows"));

        let data_dir = std::env::var(ENV_DATA_DIR)
            .ok()
            .or(file.data_dir)
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let port = match std::env::var(ENV_PORT) {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("{ENV_PORT} is not a valid port: {raw:?}"))?,
            Err(_) => file.port.unwrap_or(DEFAULT_PORT),
        };

        let openai_api_key = std::env::var(ENV_OPENAI_API_KEY)
            .ok()
            .or(file.openai_api_key)
            .filter(|key| !key.trim().is_empty());

        Ok(Config {
            shows_dir,
            data_dir,
            port,
            openai_api_key,
        })
    }

    /// Path of the SQLite database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("podsync.db")
    }
}

/// Read the TOML config file if present; unreadable or invalid files are
/// logged and treated as absent.
fn load_config_file() -> FileConfig {
    let Some(path) = dirs::config_dir().map(|d| d.join("podsync").join("config.toml")) else {
        return FileConfig::default();
    };
    let Ok(content) = std::fs::read_to_string(&path) else {
        return FileConfig::default();
    };
    match toml::from_str(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "ignoring invalid config file");
            FileConfig::default()
        }
    }
}

/// Platform default data folder.
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("podsync"))
        .unwrap_or_else(|| PathBuf::from("./podsync_data"))
}
