//! restock-core: Shared infrastructure for the restock sync agent.
//!
//! This crate contains the pieces with no domain knowledge:
//!
//! - `storage` - Durable string-keyed slot storage (local filesystem)
//! - `config` - Env var interpolation for config files
//! - `metrics` - Internal event types and the `emit!` macro
//! - `signal` - Signal handling for graceful shutdown
//! - `tracing` - Tracing initialization
//! - `error` - Common error types

pub mod config;
pub mod error;
pub mod metrics;
pub mod signal;
pub mod storage;
pub mod tracing;

// Re-export commonly used items
pub use config::{interpolate, InterpolationResult};
pub use error::{ConfigError, StorageError};
pub use signal::shutdown_signal;
pub use storage::{SlotStore, SlotStoreRef};
pub use tracing::init_tracing;
