//! Operation and payload types for the submission queue.
//!
//! Operations are a closed sum type rather than a string tag: replay dispatch
//! is an exhaustive match, so adding an operation kind is a compile error
//! until every dispatch site handles it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

/// Error raised when constructing an invalid payload.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum PayloadError {
    /// Rating outside the accepted range.
    #[snafu(display("Rating must be between 1 and 5, got {rating}"))]
    InvalidRating { rating: u8 },
}

/// Workflow status of a product request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    /// Stable label matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
        }
    }
}

/// A request for a product to be stocked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRequest {
    /// Product name (e.g. "Nitrile gloves M").
    pub name: String,
    /// Free-form details: quantity, urgency, ward.
    pub details: String,
    /// Workflow status; new requests start as `Pending`.
    pub status: RequestStatus,
    /// Client-side creation time.
    pub created_at: DateTime<Utc>,
}

impl ProductRequest {
    /// Create a new pending request timestamped now.
    pub fn new(name: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            details: details.into(),
            status: RequestStatus::Pending,
            created_at: Utc::now(),
        }
    }
}

/// Feedback on a stocked product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    /// Product the feedback is about.
    pub product: String,
    /// Rating from 1 to 5.
    pub rating: u8,
    /// Free-form feedback text.
    pub text: String,
    /// Optional photo attachment URL (uploaded separately).
    pub photo_url: Option<String>,
    /// Whether the feedback flags a safety-critical issue.
    pub is_critical: bool,
    /// Client-side submission time.
    pub timestamp: DateTime<Utc>,
}

impl Feedback {
    /// Create feedback timestamped now. Ratings outside 1..=5 are rejected.
    pub fn new(
        product: impl Into<String>,
        rating: u8,
        text: impl Into<String>,
    ) -> Result<Self, PayloadError> {
        ensure!((1..=5).contains(&rating), InvalidRatingSnafu { rating });
        Ok(Self {
            product: product.into(),
            rating,
            text: text.into(),
            photo_url: None,
            is_critical: false,
            timestamp: Utc::now(),
        })
    }
}

/// A write operation that can be queued and replayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum Operation {
    CreateProductRequest(ProductRequest),
    CreateFeedback(Feedback),
}

impl Operation {
    /// Stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Operation::CreateProductRequest(_) => "create_product_request",
            Operation::CreateFeedback(_) => "create_feedback",
        }
    }
}

/// An operation held in the offline queue.
///
/// `enqueued_at` is diagnostic only: FIFO position, not the timestamp,
/// determines replay order. Records are never updated in place; the queue is
/// append-and-delete only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedOperation {
    pub op: Operation,
    pub enqueued_at: DateTime<Utc>,
}

impl QueuedOperation {
    pub fn new(op: Operation) -> Self {
        Self {
            op,
            enqueued_at: Utc::now(),
        }
    }
}

/// A product request as stored by the remote, with its server-assigned id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRequestRecord {
    pub id: i64,
    #[serde(flatten)]
    pub request: ProductRequest,
}

/// Feedback as stored by the remote, with its server-assigned id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: i64,
    #[serde(flatten)]
    pub feedback: Feedback,
}

/// An administrator response to a product request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestResponse {
    pub id: i64,
    pub request_id: i64,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// An administrator response to feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub id: i64,
    pub feedback_id: i64,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Responses newer than a given timestamp, grouped by parent type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewResponses {
    #[serde(default)]
    pub request_responses: Vec<RequestResponse>,
    #[serde(default)]
    pub feedback_responses: Vec<FeedbackResponse>,
}

impl NewResponses {
    /// Total number of responses across both groups.
    pub fn total(&self) -> usize {
        self.request_responses.len() + self.feedback_responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_rating_validation() {
        assert!(Feedback::new("Gloves M", 0, "too loose").is_err());
        assert!(Feedback::new("Gloves M", 6, "great").is_err());
        assert!(Feedback::new("Gloves M", 1, "too loose").is_ok());
        assert!(Feedback::new("Gloves M", 5, "great").is_ok());
    }

    #[test]
    fn test_new_request_is_pending() {
        let request = ProductRequest::new("Gloves M", "qty 5");
        assert_eq!(request.status, RequestStatus::Pending);
    }

    #[test]
    fn test_operation_kind_labels() {
        let request = Operation::CreateProductRequest(ProductRequest::new("Gloves M", "qty 5"));
        let feedback =
            Operation::CreateFeedback(Feedback::new("Gloves M", 4, "good fit").unwrap());

        assert_eq!(request.kind(), "create_product_request");
        assert_eq!(feedback.kind(), "create_feedback");
    }

    #[test]
    fn test_queued_operation_serialization() {
        let op = Operation::CreateProductRequest(ProductRequest::new("Gauze", "qty 20, urgent"));
        let queued = QueuedOperation::new(op);

        let json = serde_json::to_string(&queued).unwrap();
        let restored: QueuedOperation = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, queued);
        assert!(json.contains("\"kind\":\"create_product_request\""));
    }

    #[test]
    fn test_new_responses_totals() {
        let mut responses = NewResponses::default();
        assert!(responses.is_empty());

        responses.request_responses.push(RequestResponse {
            id: 1,
            request_id: 7,
            text: "Ordered, arriving Tuesday".to_string(),
            timestamp: Utc::now(),
        });
        assert_eq!(responses.total(), 1);
        assert!(!responses.is_empty());
    }
}
