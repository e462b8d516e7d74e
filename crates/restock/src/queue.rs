//! Persistent submission queue.
//!
//! An ordered list of pending write operations held in a single durable slot.
//! The queue survives process restarts: connectivity loss may outlive any one
//! run of the agent.
//!
//! # Failure semantics
//!
//! The queue fails open. A missing or unparseable slot is an empty queue, not
//! an error: blocking the user over a corrupt cache is worse than losing the
//! backlog. Enqueue never fails visibly; if the store write fails the
//! operation is dropped and logged.

use std::sync::Arc;

use snafu::prelude::*;
use tracing::{debug, error, warn};

use restock_core::emit;
use restock_core::metrics::events::{EnqueueDropped, OperationEnqueued};
use restock_core::SlotStore;

use crate::error::{QueueError, SerializeSnafu, SlotWriteSnafu};
use crate::types::{Operation, QueuedOperation};

/// Slot key holding the serialized queue.
pub const QUEUE_SLOT: &str = "offline_queue.json";

/// Durable FIFO queue of pending submissions.
pub struct SubmissionQueue {
    slots: Arc<SlotStore>,
}

impl SubmissionQueue {
    pub fn new(slots: Arc<SlotStore>) -> Self {
        Self { slots }
    }

    /// Load the full ordered queue.
    ///
    /// Returns an empty queue if the slot is missing, unreadable, or holds
    /// content that does not parse. Never returns an error.
    pub async fn load(&self) -> Vec<QueuedOperation> {
        let raw = match self.slots.get(QUEUE_SLOT).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No queue slot found, starting empty");
                return Vec::new();
            }
            Err(e) => {
                warn!(error = %e, "Failed to read queue slot, treating as empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<QueuedOperation>>(&raw) {
            Ok(ops) => {
                debug!(pending = ops.len(), "Loaded queue");
                ops
            }
            Err(e) => {
                warn!(error = %e, "Queue slot is corrupt, treating as empty");
                Vec::new()
            }
        }
    }

    /// Overwrite the stored queue.
    ///
    /// The underlying slot write is atomic (temp file + rename), so readers
    /// never observe a partially written queue.
    pub async fn save(&self, ops: &[QueuedOperation]) -> Result<(), QueueError> {
        let json = serde_json::to_string_pretty(ops).context(SerializeSnafu)?;
        self.slots
            .set(QUEUE_SLOT, json)
            .await
            .context(SlotWriteSnafu)?;
        Ok(())
    }

    /// Append an operation to the queue.
    ///
    /// Never fails visibly: if the store write fails, the operation is dropped
    /// and the loss is logged and counted. No deduplication is performed; a
    /// user double-submitting while offline enqueues two operations and the
    /// remote will receive both.
    pub async fn enqueue(&self, op: Operation) {
        let kind = op.kind();
        let mut ops = self.load().await;
        ops.push(QueuedOperation::new(op));

        match self.save(&ops).await {
            Ok(()) => {
                debug!(kind, pending = ops.len(), "Enqueued operation");
                emit!(OperationEnqueued { kind });
            }
            Err(e) => {
                error!(kind, error = %e, "Failed to persist queue, operation dropped");
                emit!(EnqueueDropped { kind });
            }
        }
    }
}
