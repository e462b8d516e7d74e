//! Queue drain and replay.
//!
//! Replays queued operations against the remote in FIFO order, strictly one
//! at a time. An operation is removed from the store if and only if its
//! replay attempt succeeds; failures are retained for the next drain and the
//! pass continues to the next operation.
//!
//! Replay is a best-effort background process: nothing here propagates an
//! error to the caller. There is no backoff, no max-retry cap, and no
//! dead-letter path; every drain is a fresh full-queue attempt.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use restock_core::emit;
use restock_core::metrics::events::{DrainCompleted, OperationReplayed, ReplayStatus};

use crate::queue::SubmissionQueue;
use crate::remote::RemoteService;
use crate::types::Operation;

/// Summary of a completed drain pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrainOutcome {
    /// Operations replayed successfully and removed from the queue.
    pub replayed: usize,
    /// Operations still pending (failed or unattempted).
    pub retained: usize,
    /// Whether the pass stopped early due to cancellation.
    pub cancelled: bool,
}

/// Drives replay of the submission queue against a remote service.
pub struct Drainer<R> {
    queue: Arc<SubmissionQueue>,
    remote: Arc<R>,
    // In-flight guard: rapid online/offline flapping must not start a second
    // drain while one is running.
    in_flight: Mutex<()>,
}

impl<R: RemoteService> Drainer<R> {
    pub fn new(queue: Arc<SubmissionQueue>, remote: Arc<R>) -> Self {
        Self {
            queue,
            remote,
            in_flight: Mutex::new(()),
        }
    }

    /// Run one drain pass.
    ///
    /// Returns `None` if a drain is already in flight (the trigger is a
    /// no-op, not an error). Cancellation stops the pass between operations;
    /// everything unattempted is retained.
    pub async fn drain(&self, cancel: &CancellationToken) -> Option<DrainOutcome> {
        let Ok(_guard) = self.in_flight.try_lock() else {
            debug!("Drain already in flight, skipping trigger");
            return None;
        };

        let mut pending: VecDeque<_> = self.queue.load().await.into();
        if pending.is_empty() {
            debug!("Queue empty, nothing to drain");
            // Still counts as a completed pass, so the depth gauge settles
            // at zero.
            emit!(DrainCompleted {
                replayed: 0,
                retained: 0,
            });
            return Some(DrainOutcome {
                replayed: 0,
                retained: 0,
                cancelled: false,
            });
        }

        info!(pending = pending.len(), "Draining submission queue");

        let mut retained = Vec::new();
        let mut replayed = 0;
        let mut cancelled = false;

        while let Some(queued) = pending.pop_front() {
            let kind = queued.op.kind();

            // Race the replay against cancellation; a cancelled pass retains
            // the current operation and everything unattempted behind it.
            let result = tokio::select! {
                biased;

                _ = cancel.cancelled() => None,

                result = self.replay(&queued.op) => Some(result),
            };

            let Some(result) = result else {
                cancelled = true;
                retained.push(queued);
                retained.extend(pending.drain(..));
                break;
            };

            match result {
                Ok(()) => {
                    replayed += 1;
                    debug!(kind, "Replayed operation");
                    emit!(OperationReplayed {
                        kind,
                        status: ReplayStatus::Succeeded,
                    });
                }
                Err(e) => {
                    // Continue past the failure; the operation stays queued
                    // for the next drain.
                    warn!(kind, error = %e, "Replay failed, operation retained");
                    emit!(OperationReplayed {
                        kind,
                        status: ReplayStatus::Failed,
                    });
                    retained.push(queued);
                }
            }
        }

        // A failed save means successfully replayed operations are still in
        // the slot and will be resubmitted next drain. The remote may see
        // duplicates; the queue has no way to detect that.
        if let Err(e) = self.queue.save(&retained).await {
            error!(error = %e, "Failed to persist drained queue");
        }

        let outcome = DrainOutcome {
            replayed,
            retained: retained.len(),
            cancelled,
        };

        info!(
            replayed = outcome.replayed,
            retained = outcome.retained,
            cancelled = outcome.cancelled,
            "Drain complete"
        );
        emit!(DrainCompleted {
            replayed: outcome.replayed as u64,
            retained: outcome.retained as u64,
        });

        Some(outcome)
    }

    async fn replay(&self, op: &Operation) -> Result<(), crate::remote::RemoteError> {
        match op {
            Operation::CreateProductRequest(request) => {
                self.remote.create_product_request(request).await
            }
            Operation::CreateFeedback(feedback) => self.remote.create_feedback(feedback).await,
        }
    }
}
