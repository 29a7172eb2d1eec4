// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Project configuration management.
//!
//! Configuration is stored in `.outbox/config.toml` and includes:
//! - `base_url`: Prefix for relative item URLs (e.g. "https://api.example.com")
//! - `[queue]`: Queue bound and overflow policy
//! - `[drain]`: Drain interval and per-request timeout
//! - `[connectivity]`: Reachability probe target and cadence

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use outbox_core::{OverflowPolicy, QueueLimit};

use crate::env;
use crate::error::{Error, Result};

const OUTBOX_DIR_NAME: &str = ".outbox";
const CONFIG_FILE_NAME: &str = "config.toml";
const QUEUE_FILE_NAME: &str = "queue.json";
const LOG_FILE_NAME: &str = "outbox.log";
const RUNNER_LOCK_NAME: &str = "runner.lock";
const GITIGNORE_FILE_NAME: &str = ".gitignore";

/// Project configuration stored in `.outbox/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL that relative item URLs are resolved against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default)]
    pub queue: QueueConfig,
    #[serde(default)]
    pub drain: DrainConfig,
    #[serde(default)]
    pub connectivity: ConnectivityConfig,
}

/// Queue bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Maximum number of queued items (default: 1000). 0 = unbounded.
    #[serde(default = "default_max_items")]
    pub max_items: usize,
    /// What happens when the queue is full (default: reject_newest).
    #[serde(default)]
    pub overflow: OverflowPolicy,
}

impl Default for QueueConfig {
    fn default() -> Self {
        QueueConfig {
            max_items: default_max_items(),
            overflow: OverflowPolicy::default(),
        }
    }
}

/// Drain scheduling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrainConfig {
    /// Seconds between periodic drain attempts while online (default: 20).
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Per-request delivery timeout in seconds (default: 30).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for DrainConfig {
    fn default() -> Self {
        DrainConfig {
            interval_secs: default_interval_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Reachability probing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectivityConfig {
    /// URL probed to decide online/offline. Defaults to `base_url`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probe_url: Option<String>,
    /// Seconds between probes (default: 5).
    #[serde(default = "default_probe_interval_secs")]
    pub probe_interval_secs: u64,
    /// Probe timeout in seconds (default: 3).
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        ConnectivityConfig {
            probe_url: None,
            probe_interval_secs: default_probe_interval_secs(),
            probe_timeout_secs: default_probe_timeout_secs(),
        }
    }
}

fn default_max_items() -> usize {
    1000
}

fn default_interval_secs() -> u64 {
    20
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_probe_interval_secs() -> u64 {
    5
}

fn default_probe_timeout_secs() -> u64 {
    3
}

impl Config {
    /// Creates a config with defaults and the given base URL.
    pub fn new(base_url: Option<String>) -> Result<Self> {
        if let Some(url) = &base_url {
            validate_base_url(url)?;
        }
        Ok(Config {
            base_url: base_url.map(|u| u.trim_end_matches('/').to_string()),
            ..Config::default()
        })
    }

    /// Loads configuration from the given `.outbox/` directory.
    pub fn load(outbox_dir: &Path) -> Result<Self> {
        let config_path = outbox_dir.join(CONFIG_FILE_NAME);
        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        if let Some(url) = &config.base_url {
            validate_base_url(url)?;
        }
        Ok(config)
    }

    /// Saves configuration to the given `.outbox/` directory.
    pub fn save(&self, outbox_dir: &Path) -> Result<()> {
        let config_path = outbox_dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn queue_limit(&self) -> QueueLimit {
        QueueLimit::new(self.queue.max_items, self.queue.overflow)
    }

    /// URL probed for connectivity: `probe_url`, falling back to `base_url`.
    pub fn probe_url(&self) -> Option<&str> {
        self.connectivity
            .probe_url
            .as_deref()
            .or(self.base_url.as_deref())
    }

    pub fn drain_interval(&self) -> Duration {
        Duration::from_secs(self.drain.interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.drain.request_timeout_secs.max(1))
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.connectivity.probe_interval_secs.max(1))
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.connectivity.probe_timeout_secs.max(1))
    }
}

fn validate_base_url(url: &str) -> Result<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(Error::InvalidUrl {
            url: url.to_string(),
            reason: "base URL must start with http:// or https://".to_string(),
        })
    }
}

/// Find the `.outbox` directory: `OUTBOX_DIR` if set, otherwise walk up from
/// the current directory.
pub fn find_outbox_dir() -> Result<PathBuf> {
    if let Some(dir) = env::outbox_dir() {
        return if dir.is_dir() {
            Ok(dir)
        } else {
            Err(Error::NotInitialized)
        };
    }
    find_outbox_dir_from(&std::env::current_dir()?)
}

/// Find the `.outbox` directory by walking up from `start`.
pub fn find_outbox_dir_from(start: &Path) -> Result<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let outbox_dir = current.join(OUTBOX_DIR_NAME);
        if outbox_dir.is_dir() {
            return Ok(outbox_dir);
        }
        if !current.pop() {
            return Err(Error::NotInitialized);
        }
    }
}

/// Initialize a new `.outbox` directory under `path`.
pub fn init_outbox_dir(path: &Path, config: &Config) -> Result<PathBuf> {
    let outbox_dir = path.join(OUTBOX_DIR_NAME);

    if outbox_dir.join(CONFIG_FILE_NAME).exists() {
        return Err(Error::AlreadyInitialized(outbox_dir.display().to_string()));
    }

    fs::create_dir_all(&outbox_dir)?;
    config.save(&outbox_dir)?;
    write_gitignore(&outbox_dir)?;

    Ok(outbox_dir)
}

/// Keep queue state and logs out of version control.
fn write_gitignore(outbox_dir: &Path) -> Result<()> {
    let content = format!(
        "{}\n{}.tmp\n*.lock\n{}\n",
        QUEUE_FILE_NAME, QUEUE_FILE_NAME, LOG_FILE_NAME
    );
    fs::write(outbox_dir.join(GITIGNORE_FILE_NAME), content)?;
    Ok(())
}

pub fn queue_path(outbox_dir: &Path) -> PathBuf {
    outbox_dir.join(QUEUE_FILE_NAME)
}

pub fn log_path(outbox_dir: &Path) -> PathBuf {
    outbox_dir.join(LOG_FILE_NAME)
}

pub fn runner_lock_path(outbox_dir: &Path) -> PathBuf {
    outbox_dir.join(RUNNER_LOCK_NAME)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
