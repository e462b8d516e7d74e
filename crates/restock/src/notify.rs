//! Response notification tracking.
//!
//! Tracks the last time administrator responses were checked, persisted in
//! its own slot so the high-water mark survives restarts. A missing or
//! unparseable slot falls back to the Unix epoch: the worst case is
//! re-reporting old responses, never missing new ones.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use restock_core::SlotStore;

use crate::remote::{RemoteError, RemoteService};
use crate::types::NewResponses;

/// Slot key holding the last-checked timestamp (RFC 3339).
pub const LAST_CHECKED_SLOT: &str = "last_checked";

/// Polls the remote for administrator responses newer than the last check.
pub struct ResponseTracker<R> {
    slots: Arc<SlotStore>,
    remote: Arc<R>,
}

impl<R: RemoteService> ResponseTracker<R> {
    pub fn new(slots: Arc<SlotStore>, remote: Arc<R>) -> Self {
        Self { slots, remote }
    }

    /// Read the last-checked timestamp, falling back to the epoch.
    pub async fn last_checked(&self) -> DateTime<Utc> {
        let raw = match self.slots.get(LAST_CHECKED_SLOT).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return DateTime::UNIX_EPOCH,
            Err(e) => {
                warn!(error = %e, "Failed to read last-checked slot, using epoch");
                return DateTime::UNIX_EPOCH;
            }
        };

        match DateTime::parse_from_rfc3339(raw.trim()) {
            Ok(ts) => ts.with_timezone(&Utc),
            Err(e) => {
                warn!(error = %e, "Last-checked slot is corrupt, using epoch");
                DateTime::UNIX_EPOCH
            }
        }
    }

    /// Fetch responses newer than the last check and advance the mark.
    ///
    /// The mark only advances after a successful fetch; a failed fetch leaves
    /// it where it was so nothing is skipped.
    pub async fn check_new_responses(&self) -> Result<NewResponses, RemoteError> {
        let since = self.last_checked().await;
        let responses = self.remote.responses_since(since).await?;

        if let Err(e) = self
            .slots
            .set(LAST_CHECKED_SLOT, Utc::now().to_rfc3339())
            .await
        {
            // Best effort: a stale mark re-reports, it never loses responses.
            warn!(error = %e, "Failed to advance last-checked slot");
        }

        Ok(responses)
    }

    /// Poll for new responses while online, until shutdown.
    pub async fn run(
        self,
        online: watch::Receiver<bool>,
        poll_interval: Duration,
        shutdown: CancellationToken,
    ) {
        loop {
            if *online.borrow() {
                match self.check_new_responses().await {
                    Ok(responses) if !responses.is_empty() => {
                        info!(
                            request_responses = responses.request_responses.len(),
                            feedback_responses = responses.feedback_responses.len(),
                            "New administrator responses"
                        );
                    }
                    Ok(_) => debug!("No new responses"),
                    Err(e) => debug!(error = %e, "Response check failed"),
                }
            }

            if shutdown
                .run_until_cancelled(tokio::time::sleep(poll_interval))
                .await
                .is_none()
            {
                break;
            }
        }

        info!("Response tracker stopped");
    }
}
