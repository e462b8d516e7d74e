//! Remote service interface.
//!
//! The backend is an external collaborator reached over HTTP; the queue only
//! depends on whether a call succeeds or fails, never on the backend's
//! schema. The trait seam exists so tests can substitute a scripted remote.

mod http;

pub use http::HttpRemote;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use snafu::prelude::*;

use crate::types::{Feedback, FeedbackRecord, NewResponses, ProductRequest, ProductRequestRecord};

/// Errors from remote service calls.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RemoteError {
    /// Transport-level failure (connect, timeout, TLS).
    #[snafu(display("Transport error: {source}"))]
    Transport { source: reqwest::Error },

    /// The remote answered with a non-success status.
    #[snafu(display("Remote returned {status} for {endpoint}"))]
    Status { endpoint: String, status: u16 },

    /// The remote answered with a body that does not decode.
    #[snafu(display("Failed to decode response from {endpoint}: {source}"))]
    Decode {
        endpoint: String,
        source: reqwest::Error,
    },
}

/// Typed create/read calls against the backing service.
///
/// The remote is the source of truth. Replay does not assume idempotency: if
/// a create commits server-side but the response is lost, the retried call
/// will duplicate the record. Defending against that belongs to the remote
/// (idempotency keys), not to this client.
#[async_trait]
pub trait RemoteService: Send + Sync {
    /// Create a product request.
    async fn create_product_request(&self, request: &ProductRequest) -> Result<(), RemoteError>;

    /// Create a feedback entry.
    async fn create_feedback(&self, feedback: &Feedback) -> Result<(), RemoteError>;

    /// List all product requests, newest first.
    async fn list_product_requests(&self) -> Result<Vec<ProductRequestRecord>, RemoteError>;

    /// List all feedback, newest first.
    async fn list_feedback(&self) -> Result<Vec<FeedbackRecord>, RemoteError>;

    /// Fetch administrator responses newer than the given timestamp.
    async fn responses_since(&self, since: DateTime<Utc>) -> Result<NewResponses, RemoteError>;

    /// Cheap liveness probe used by the connectivity monitor.
    async fn health(&self) -> Result<(), RemoteError>;
}
