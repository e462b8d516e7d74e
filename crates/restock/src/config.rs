//! Agent configuration.
//!
//! Loaded from a YAML file with `${VAR}` env interpolation, so api keys stay
//! out of config files on disk.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use restock_core::config::interpolate;
use restock_core::error::{
    ConfigError, EnvInterpolationSnafu, ReadFileSnafu, YamlParseSnafu,
};

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_poll_interval_secs() -> u64 {
    30
}

fn default_notify_interval_secs() -> u64 {
    60
}

#[derive(Parser, Debug)]
#[command(version)]
pub struct CliArgs {
    /// Path to the agent configuration file
    #[arg(short, long)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Agent subcommands. Without one, the sync agent runs.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Run the sync agent.
    Run,
    /// Print the remote's current product requests and feedback.
    Status,
}

/// Remote service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemoteConfig {
    /// Base URL of the backing service.
    pub base_url: String,
    /// Api key sent with every request, if the service requires one.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Local queue storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueueConfig {
    /// Directory holding the queue and tracking slots.
    pub data_dir: PathBuf,
}

/// Connectivity probe settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectivityConfig {
    /// Seconds between health probes.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Seconds between response notification checks.
    #[serde(default = "default_notify_interval_secs")]
    pub notify_interval_secs: u64,
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            notify_interval_secs: default_notify_interval_secs(),
        }
    }
}

/// Top-level agent configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub remote: RemoteConfig,
    pub queue: QueueConfig,
    #[serde(default)]
    pub connectivity: ConnectivityConfig,
}

impl Config {
    /// Load configuration from a YAML file, interpolating env vars.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).context(ReadFileSnafu)?;
        Self::from_yaml(&raw)
    }

    /// Parse configuration from YAML text, interpolating env vars.
    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        let interpolated = interpolate(raw);
        ensure!(
            interpolated.is_ok(),
            EnvInterpolationSnafu {
                message: interpolated.errors.join("\n"),
            }
        );

        let config: Config =
            serde_yaml::from_str(&interpolated.text).context(YamlParseSnafu)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        ensure!(
            !self.remote.base_url.trim().is_empty(),
            restock_core::error::EmptyRemoteUrlSnafu
        );
        ensure!(
            !self.queue.data_dir.as_os_str().is_empty(),
            restock_core::error::EmptyDataDirSnafu
        );
        ensure!(
            self.connectivity.poll_interval_secs > 0,
            restock_core::error::ZeroPollIntervalSnafu
        );
        Ok(())
    }

    /// Interval between connectivity probes.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.connectivity.poll_interval_secs)
    }

    /// Interval between response notification checks.
    pub fn notify_interval(&self) -> Duration {
        Duration::from_secs(self.connectivity.notify_interval_secs)
    }
}
