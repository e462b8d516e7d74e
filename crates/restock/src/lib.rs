//! restock: offline-tolerant submission sync for a supply request/feedback
//! service.
//!
//! Users submit product requests and feedback; the backend is the source of
//! truth. When a write cannot reach the backend, it lands in a durable local
//! queue and is replayed, in order, once connectivity returns.
//!
//! - `types` - Operation sum type and domain payloads
//! - `queue` - Durable FIFO submission queue
//! - `drain` - Sequential replay with retain-on-failure
//! - `remote` - Remote service trait and HTTP client
//! - `connectivity` - Health-probe based online/offline signal
//! - `notify` - Administrator response tracking
//! - `status` - Read-only remote listing views
//! - `agent` - Wires connectivity transitions to drains
//! - `config` - Agent configuration

pub mod agent;
pub mod config;
pub mod connectivity;
pub mod drain;
pub mod error;
pub mod notify;
pub mod queue;
pub mod remote;
pub mod status;
pub mod types;

// Re-export commonly used items
pub use agent::SyncAgent;
pub use config::{CliArgs, Config};
pub use connectivity::ConnectivityMonitor;
pub use drain::{DrainOutcome, Drainer};
pub use error::{AgentError, QueueError};
pub use notify::ResponseTracker;
pub use queue::{SubmissionQueue, QUEUE_SLOT};
pub use remote::{HttpRemote, RemoteError, RemoteService};
pub use status::{fetch_status, StatusReport};
pub use restock_core::{init_tracing, shutdown_signal, SlotStore};
pub use types::{Feedback, Operation, ProductRequest, QueuedOperation};
