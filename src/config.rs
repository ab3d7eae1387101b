//! Client configuration.
//!
//! Values come from `~/.kanban/config.toml` (or `--config`), then the
//! `KANBAN_SERVER` / `KANBAN_SESSION` environment variables, then the
//! `--server` flag. A missing file means defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::fields::ViewMode;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";
pub const SERVER_ENV: &str = "KANBAN_SERVER";
pub const SESSION_ENV: &str = "KANBAN_SESSION";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server_url: String,
    /// Sent verbatim as the `Cookie` header.
    pub session_cookie: Option<String>,
    pub timeout_secs: u64,
    /// Send an update request when a card is dropped on another column.
    pub persist_moves: bool,
    pub default_view: ViewMode,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_url: DEFAULT_SERVER_URL.to_string(),
            session_cookie: None,
            timeout_secs: 30,
            persist_moves: false,
            default_view: ViewMode::Card,
        }
    }
}

impl Config {
    /// Load from `path`, or from the default location when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => data_dir().join("config.toml"),
        };
        let mut config = Self::from_file(&path)?;
        config.apply_env(|key| env::var(key).ok());
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Apply environment overrides through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(SERVER_ENV).filter(|v| !v.trim().is_empty()) {
            info!("{SERVER_ENV} set, using server {url}");
            self.server_url = url;
        }
        if let Some(cookie) = lookup(SESSION_ENV).filter(|v| !v.trim().is_empty()) {
            self.session_cookie = Some(cookie);
        }
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.server_url.trim_end_matches('/')
    }
}

/// Directory holding the config file and local sprint state.
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".kanban")
}
