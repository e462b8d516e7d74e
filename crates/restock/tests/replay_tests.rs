//! Integration tests for the submission queue drain/replay behavior.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tempfile::TempDir;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use restock::remote::{RemoteError, RemoteService};
use restock::status::fetch_status;
use restock::types::{
    Feedback, FeedbackRecord, NewResponses, Operation, ProductRequest, ProductRequestRecord,
    RequestResponse,
};
use restock::{ConnectivityMonitor, Drainer, ResponseTracker, SlotStore, SubmissionQueue, SyncAgent};

/// Scripted remote: records successful writes in order, fails writes whose
/// product name is in the fail set, and reports health from a flag.
#[derive(Default)]
struct MockRemote {
    online: AtomicBool,
    fail_products: Mutex<HashSet<String>>,
    observed: Mutex<Vec<String>>,
    responses: Mutex<NewResponses>,
    requests: Mutex<Vec<ProductRequestRecord>>,
    feedback_records: Mutex<Vec<FeedbackRecord>>,
    /// When set, writes must acquire a permit before completing.
    gate: Option<Arc<Semaphore>>,
}

impl MockRemote {
    fn online() -> Self {
        let remote = Self::default();
        remote.online.store(true, Ordering::SeqCst);
        remote
    }

    fn fail_product(&self, name: &str) {
        self.fail_products
            .lock()
            .unwrap()
            .insert(name.to_string());
    }

    fn observed(&self) -> Vec<String> {
        self.observed.lock().unwrap().clone()
    }

    fn unavailable(endpoint: &str) -> RemoteError {
        RemoteError::Status {
            endpoint: endpoint.to_string(),
            status: 503,
        }
    }

    async fn attempt(&self, endpoint: &str, label: String) -> Result<(), RemoteError> {
        if let Some(gate) = &self.gate {
            let permit = gate.acquire().await.expect("gate closed");
            permit.forget();
        }
        if !self.online.load(Ordering::SeqCst) {
            return Err(Self::unavailable(endpoint));
        }
        if self.fail_products.lock().unwrap().contains(&label) {
            return Err(Self::unavailable(endpoint));
        }
        self.observed.lock().unwrap().push(label);
        Ok(())
    }
}

#[async_trait]
impl RemoteService for MockRemote {
    async fn create_product_request(&self, request: &ProductRequest) -> Result<(), RemoteError> {
        self.attempt("product-requests", request.name.clone()).await
    }

    async fn create_feedback(&self, feedback: &Feedback) -> Result<(), RemoteError> {
        self.attempt("feedback", feedback.product.clone()).await
    }

    async fn list_product_requests(&self) -> Result<Vec<ProductRequestRecord>, RemoteError> {
        if !self.online.load(Ordering::SeqCst) {
            return Err(Self::unavailable("product-requests"));
        }
        Ok(self.requests.lock().unwrap().clone())
    }

    async fn list_feedback(&self) -> Result<Vec<FeedbackRecord>, RemoteError> {
        if !self.online.load(Ordering::SeqCst) {
            return Err(Self::unavailable("feedback"));
        }
        Ok(self.feedback_records.lock().unwrap().clone())
    }

    async fn responses_since(&self, _since: DateTime<Utc>) -> Result<NewResponses, RemoteError> {
        if !self.online.load(Ordering::SeqCst) {
            return Err(Self::unavailable("responses"));
        }
        Ok(self.responses.lock().unwrap().clone())
    }

    async fn health(&self) -> Result<(), RemoteError> {
        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(Self::unavailable("health"))
        }
    }
}

async fn queue_in(temp_dir: &TempDir) -> Arc<SubmissionQueue> {
    let slots = Arc::new(SlotStore::open(temp_dir.path()).await.unwrap());
    Arc::new(SubmissionQueue::new(slots))
}

fn request(name: &str) -> Operation {
    Operation::CreateProductRequest(ProductRequest::new(name, "qty 5"))
}

fn feedback(product: &str) -> Operation {
    Operation::CreateFeedback(Feedback::new(product, 4, "works well").unwrap())
}

#[tokio::test]
async fn test_replay_preserves_fifo_order() {
    let temp_dir = TempDir::new().unwrap();
    let queue = queue_in(&temp_dir).await;
    let remote = Arc::new(MockRemote::online());

    queue.enqueue(request("Gloves M")).await;
    queue.enqueue(feedback("Gauze")).await;
    queue.enqueue(request("Syringes 5ml")).await;

    let drainer = Drainer::new(queue.clone(), remote.clone());
    let outcome = drainer.drain(&CancellationToken::new()).await.unwrap();

    assert_eq!(outcome.replayed, 3);
    assert_eq!(outcome.retained, 0);
    assert!(!outcome.cancelled);
    assert_eq!(remote.observed(), vec!["Gloves M", "Gauze", "Syringes 5ml"]);
    assert!(queue.load().await.is_empty());
}

#[tokio::test]
async fn test_failed_operation_retained_and_rest_attempted() {
    let temp_dir = TempDir::new().unwrap();
    let queue = queue_in(&temp_dir).await;
    let remote = Arc::new(MockRemote::online());
    remote.fail_product("Gloves M");

    // A fails, B succeeds -> queue holds only A afterwards.
    queue.enqueue(request("Gloves M")).await;
    queue.enqueue(feedback("Gauze")).await;

    let drainer = Drainer::new(queue.clone(), remote.clone());
    let outcome = drainer.drain(&CancellationToken::new()).await.unwrap();

    assert_eq!(outcome.replayed, 1);
    assert_eq!(outcome.retained, 1);
    assert_eq!(remote.observed(), vec!["Gauze"]);

    let pending = queue.load().await;
    assert_eq!(pending.len(), 1);
    match &pending[0].op {
        Operation::CreateProductRequest(r) => assert_eq!(r.name, "Gloves M"),
        other => panic!("expected product request, got {}", other.kind()),
    }
}

#[tokio::test]
async fn test_failed_operation_succeeds_on_next_drain() {
    let temp_dir = TempDir::new().unwrap();
    let queue = queue_in(&temp_dir).await;
    let remote = Arc::new(MockRemote::online());
    remote.fail_product("Gloves M");

    queue.enqueue(request("Gloves M")).await;

    let drainer = Drainer::new(queue.clone(), remote.clone());
    drainer.drain(&CancellationToken::new()).await.unwrap();
    assert_eq!(queue.load().await.len(), 1);

    // Failure clears; the retained operation replays on the next pass.
    remote.fail_products.lock().unwrap().clear();
    let outcome = drainer.drain(&CancellationToken::new()).await.unwrap();

    assert_eq!(outcome.replayed, 1);
    assert!(queue.load().await.is_empty());
    assert_eq!(remote.observed(), vec!["Gloves M"]);
}

#[tokio::test]
async fn test_offline_submission_replayed_after_reconnect() {
    // The spec's example scenario: enqueue while offline, one element in the
    // queue, connectivity returns, queue is empty afterwards.
    let temp_dir = TempDir::new().unwrap();
    let queue = queue_in(&temp_dir).await;
    let remote = Arc::new(MockRemote::default()); // starts offline

    queue.enqueue(request("Gloves M")).await;
    assert_eq!(queue.load().await.len(), 1);

    let drainer = Drainer::new(queue.clone(), remote.clone());

    // Still offline: the attempt fails and the operation is retained.
    let outcome = drainer.drain(&CancellationToken::new()).await.unwrap();
    assert_eq!(outcome.retained, 1);
    assert_eq!(queue.load().await.len(), 1);

    remote.online.store(true, Ordering::SeqCst);
    let outcome = drainer.drain(&CancellationToken::new()).await.unwrap();
    assert_eq!(outcome.replayed, 1);
    assert!(queue.load().await.is_empty());
    assert_eq!(remote.observed(), vec!["Gloves M"]);
}

#[tokio::test]
async fn test_second_drain_skipped_while_in_flight() {
    let temp_dir = TempDir::new().unwrap();
    let queue = queue_in(&temp_dir).await;

    let gate = Arc::new(Semaphore::new(0));
    let mut remote = MockRemote::online();
    remote.gate = Some(gate.clone());
    let remote = Arc::new(remote);

    queue.enqueue(request("Gloves M")).await;

    let drainer = Arc::new(Drainer::new(queue.clone(), remote.clone()));

    let first = {
        let drainer = drainer.clone();
        tokio::spawn(async move { drainer.drain(&CancellationToken::new()).await })
    };

    // Let the first drain reach the gated remote call.
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Overlapping trigger is a no-op while the first drain is in flight.
    assert!(drainer.drain(&CancellationToken::new()).await.is_none());

    gate.add_permits(1);
    let outcome = first.await.unwrap().unwrap();
    assert_eq!(outcome.replayed, 1);

    // And the guard releases: a later drain runs normally.
    assert!(drainer.drain(&CancellationToken::new()).await.is_some());
}

#[tokio::test]
async fn test_cancelled_drain_retains_unattempted_operations() {
    let temp_dir = TempDir::new().unwrap();
    let queue = queue_in(&temp_dir).await;

    let gate = Arc::new(Semaphore::new(0));
    let mut remote = MockRemote::online();
    remote.gate = Some(gate.clone());
    let remote = Arc::new(remote);

    queue.enqueue(request("Gloves M")).await;
    queue.enqueue(feedback("Gauze")).await;

    let drainer = Arc::new(Drainer::new(queue.clone(), remote.clone()));
    let cancel = CancellationToken::new();

    let pass = {
        let drainer = drainer.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move { drainer.drain(&cancel).await })
    };

    // First replay is parked on the gate; cancel mid-pass.
    tokio::time::sleep(Duration::from_millis(50)).await;
    cancel.cancel();

    let outcome = pass.await.unwrap().unwrap();
    assert!(outcome.cancelled);
    assert_eq!(outcome.replayed, 0);
    assert_eq!(outcome.retained, 2);
    assert_eq!(queue.load().await.len(), 2);
    assert!(remote.observed().is_empty());
}

#[tokio::test]
async fn test_agent_drains_on_reconnect() {
    let temp_dir = TempDir::new().unwrap();
    let queue = queue_in(&temp_dir).await;
    let remote = Arc::new(MockRemote::default()); // starts offline

    queue.enqueue(request("Gloves M")).await;

    let drainer = Arc::new(Drainer::new(queue.clone(), remote.clone()));
    let shutdown = CancellationToken::new();

    let (monitor, online) =
        ConnectivityMonitor::new(remote.clone(), Duration::from_millis(20));
    let agent = SyncAgent::new(drainer, online);

    let monitor_task = tokio::spawn(monitor.run(shutdown.clone()));
    let agent_task = tokio::spawn(agent.run(shutdown.clone()));

    // Offline: nothing replays.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(queue.load().await.len(), 1);

    // Connectivity returns; the next probe triggers a drain.
    remote.online.store(true, Ordering::SeqCst);
    for _ in 0..50 {
        if queue.load().await.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    assert!(queue.load().await.is_empty());
    assert_eq!(remote.observed(), vec!["Gloves M"]);

    shutdown.cancel();
    monitor_task.await.unwrap();
    agent_task.await.unwrap();
}

#[tokio::test]
async fn test_empty_queue_drain_reports_zeroes() {
    let temp_dir = TempDir::new().unwrap();
    let queue = queue_in(&temp_dir).await;
    let remote = Arc::new(MockRemote::online());

    let drainer = Drainer::new(queue.clone(), remote.clone());
    let outcome = drainer.drain(&CancellationToken::new()).await.unwrap();

    assert_eq!(outcome.replayed, 0);
    assert_eq!(outcome.retained, 0);
    assert!(!outcome.cancelled);
    assert!(remote.observed().is_empty());
}

#[tokio::test]
async fn test_status_lists_remote_contents() {
    let remote = MockRemote::online();
    remote.requests.lock().unwrap().push(ProductRequestRecord {
        id: 3,
        request: ProductRequest::new("Gloves M", "qty 5"),
    });
    remote.feedback_records.lock().unwrap().push(FeedbackRecord {
        id: 9,
        feedback: Feedback::new("Gauze", 2, "tears easily").unwrap(),
    });

    let report = fetch_status(&remote).await.unwrap();

    assert_eq!(report.requests.len(), 1);
    assert_eq!(report.requests[0].request.name, "Gloves M");
    assert_eq!(report.feedback.len(), 1);
    assert_eq!(report.feedback[0].feedback.rating, 2);

    let rendered = report.to_string();
    assert!(rendered.contains("Gloves M"));
    assert!(rendered.contains("Gauze"));
}

#[tokio::test]
async fn test_status_fails_while_offline() {
    let remote = MockRemote::default();
    assert!(fetch_status(&remote).await.is_err());
}

#[tokio::test]
async fn test_response_tracker_advances_mark_on_success() {
    let temp_dir = TempDir::new().unwrap();
    let slots = Arc::new(SlotStore::open(temp_dir.path()).await.unwrap());
    let remote = Arc::new(MockRemote::online());

    remote
        .responses
        .lock()
        .unwrap()
        .request_responses
        .push(RequestResponse {
            id: 1,
            request_id: 7,
            text: "Ordered, arriving Tuesday".to_string(),
            timestamp: Utc::now(),
        });

    let tracker = ResponseTracker::new(slots, remote);

    let before = tracker.last_checked().await;
    assert_eq!(before, DateTime::UNIX_EPOCH);

    let responses = tracker.check_new_responses().await.unwrap();
    assert_eq!(responses.total(), 1);

    let after = tracker.last_checked().await;
    assert!(after > before);
}

#[tokio::test]
async fn test_response_tracker_keeps_mark_on_failure() {
    let temp_dir = TempDir::new().unwrap();
    let slots = Arc::new(SlotStore::open(temp_dir.path()).await.unwrap());
    let remote = Arc::new(MockRemote::default()); // offline

    let tracker = ResponseTracker::new(slots, remote);

    assert!(tracker.check_new_responses().await.is_err());
    assert_eq!(tracker.last_checked().await, DateTime::UNIX_EPOCH);
}
