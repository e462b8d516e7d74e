//! Metrics and observability infrastructure.
//!
//! Events are recorded through the `metrics` facade; whichever recorder the
//! embedding process installs (if any) receives them. Without a recorder the
//! macros are no-ops, so the queue never pays for observability it does not
//! have.

pub mod events;

/// Macro for emitting metric events (Vector-style pattern).
///
/// Calls the `InternalEvent::emit()` method on the given event, which records
/// the corresponding metric.
///
/// # Example
///
/// ```ignore
/// use restock_core::metrics::events::OperationEnqueued;
///
/// emit!(OperationEnqueued { kind: "create_feedback" });
/// ```
#[macro_export]
macro_rules! emit {
    ($event:expr) => {
        $crate::metrics::events::InternalEvent::emit($event)
    };
}

// Re-export the macro at crate root
pub use emit;
