//! Error types for the restock sync agent.

use snafu::prelude::*;

// Re-export common errors
pub use restock_core::error::{ConfigError, StorageError};

pub use crate::remote::RemoteError;
pub use crate::types::PayloadError;

/// Errors that can occur while persisting the submission queue.
///
/// These never escape the queue component to callers of `enqueue` or `drain`;
/// they exist so the save path can report precisely what went wrong in logs.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum QueueError {
    /// Failed to serialize the queue for storage.
    #[snafu(display("Failed to serialize queue: {source}"))]
    Serialize { source: serde_json::Error },

    /// Failed to write the queue slot.
    #[snafu(display("Failed to write queue slot: {source}"))]
    SlotWrite { source: StorageError },
}

/// Top-level agent errors.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum AgentError {
    /// Configuration error.
    #[snafu(display("Configuration error: {source}"))]
    Config { source: ConfigError },

    /// Storage error.
    #[snafu(display("Storage error: {source}"))]
    Storage { source: StorageError },

    /// Remote client could not be constructed.
    #[snafu(display("Remote client error: {source}"))]
    Remote { source: RemoteError },

    /// Task join error.
    #[snafu(display("Task join error: {source}"))]
    TaskJoin { source: tokio::task::JoinError },
}

impl From<ConfigError> for AgentError {
    fn from(source: ConfigError) -> Self {
        AgentError::Config { source }
    }
}

impl From<StorageError> for AgentError {
    fn from(source: StorageError) -> Self {
        AgentError::Storage { source }
    }
}

impl From<RemoteError> for AgentError {
    fn from(source: RemoteError) -> Self {
        AgentError::Remote { source }
    }
}

impl From<tokio::task::JoinError> for AgentError {
    fn from(source: tokio::task::JoinError) -> Self {
        AgentError::TaskJoin { source }
    }
}
