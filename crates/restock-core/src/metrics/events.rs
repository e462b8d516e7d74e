//! Internal events for restock metrics emission.
//!
//! Each event struct represents a measurable occurrence in the sync agent.
//! Events implement the `InternalEvent` trait which records the corresponding
//! metric.

use metrics::{counter, gauge};
use tracing::trace;

/// Trait for internal events that can be emitted as metrics.
pub trait InternalEvent {
    /// Emit this event as a metric.
    fn emit(self);
}

/// Event emitted when an operation is appended to the offline queue.
pub struct OperationEnqueued {
    /// Operation kind label (e.g. `"create_product_request"`).
    pub kind: &'static str,
}

impl InternalEvent for OperationEnqueued {
    fn emit(self) {
        trace!(kind = self.kind, "Operation enqueued");
        counter!("restock_operations_enqueued_total", "kind" => self.kind).increment(1);
    }
}

/// Event emitted when an enqueue is dropped because the store write failed.
pub struct EnqueueDropped {
    pub kind: &'static str,
}

impl InternalEvent for EnqueueDropped {
    fn emit(self) {
        trace!(kind = self.kind, "Enqueue dropped");
        counter!("restock_enqueue_dropped_total", "kind" => self.kind).increment(1);
    }
}

/// Outcome of a single replay attempt.
#[derive(Debug, Clone, Copy)]
pub enum ReplayStatus {
    Succeeded,
    Failed,
}

impl ReplayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplayStatus::Succeeded => "succeeded",
            ReplayStatus::Failed => "failed",
        }
    }
}

/// Event emitted when a queued operation is replayed against the remote.
pub struct OperationReplayed {
    pub kind: &'static str,
    pub status: ReplayStatus,
}

impl InternalEvent for OperationReplayed {
    fn emit(self) {
        trace!(
            kind = self.kind,
            status = self.status.as_str(),
            "Operation replayed"
        );
        counter!(
            "restock_operations_replayed_total",
            "kind" => self.kind,
            "status" => self.status.as_str()
        )
        .increment(1);
    }
}

/// Event emitted when a drain pass completes.
pub struct DrainCompleted {
    /// Operations removed from the queue during this pass.
    pub replayed: u64,
    /// Operations still pending after this pass.
    pub retained: u64,
}

impl InternalEvent for DrainCompleted {
    fn emit(self) {
        trace!(
            replayed = self.replayed,
            retained = self.retained,
            "Drain completed"
        );
        counter!("restock_drains_total").increment(1);
        gauge!("restock_queue_depth").set(self.retained as f64);
    }
}

/// Event emitted when the connectivity monitor observes a transition.
pub struct ConnectivityChanged {
    pub online: bool,
}

impl InternalEvent for ConnectivityChanged {
    fn emit(self) {
        let state = if self.online { "online" } else { "offline" };
        trace!(state, "Connectivity changed");
        counter!("restock_connectivity_transitions_total", "state" => state).increment(1);
    }
}
