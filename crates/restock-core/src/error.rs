//! Common error types shared across the restock crates.

use snafu::prelude::*;

// ============ Storage Errors ============

/// Errors that can occur during slot storage operations.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum StorageError {
    /// Object store operation failed.
    #[snafu(display("Storage operation failed: {source}"))]
    ObjectStore { source: object_store::Error },

    /// IO error during storage operations.
    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },

    /// Slot key is not a valid storage path.
    #[snafu(display("Invalid slot key '{key}': {source}"))]
    InvalidKey {
        key: String,
        source: object_store::path::Error,
    },
}

// ============ Config Errors ============

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[snafu(display("Failed to read configuration file: {source}"))]
    ReadFile { source: std::io::Error },

    /// Failed to parse YAML configuration.
    #[snafu(display("Failed to parse YAML: {source}"))]
    YamlParse { source: serde_yaml::Error },

    /// Environment variable interpolation failed.
    #[snafu(display("Environment variable interpolation failed:\n{message}"))]
    EnvInterpolation { message: String },

    /// Remote base URL is empty.
    #[snafu(display("Remote base URL cannot be empty"))]
    EmptyRemoteUrl,

    /// Queue data directory is empty.
    #[snafu(display("Queue data directory cannot be empty"))]
    EmptyDataDir,

    /// Poll interval is zero.
    #[snafu(display("Connectivity poll interval must be at least 1 second"))]
    ZeroPollInterval,
}
