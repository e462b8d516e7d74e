//! Common configuration helpers.
//!
//! The agent's config schema itself lives in the `restock` crate; this module
//! holds the env var interpolation shared with any future component.

pub mod vars;

pub use vars::{interpolate, InterpolationResult};
