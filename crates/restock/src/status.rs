//! Remote status views.
//!
//! One-shot listing of what the remote currently holds, backing the `status`
//! subcommand. Read-only; the submission queue is not involved.

use std::fmt;

use crate::remote::{RemoteError, RemoteService};
use crate::types::{FeedbackRecord, ProductRequestRecord};

/// Snapshot of the remote's stored requests and feedback.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub requests: Vec<ProductRequestRecord>,
    pub feedback: Vec<FeedbackRecord>,
}

/// Fetch the remote's current product requests and feedback.
pub async fn fetch_status<R: RemoteService>(remote: &R) -> Result<StatusReport, RemoteError> {
    let requests = remote.list_product_requests().await?;
    let feedback = remote.list_feedback().await?;
    Ok(StatusReport { requests, feedback })
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Product requests ({}):", self.requests.len())?;
        for record in &self.requests {
            writeln!(
                f,
                "  #{} [{}] {} - {}",
                record.id,
                record.request.status.as_str(),
                record.request.name,
                record.request.details
            )?;
        }

        writeln!(f, "Feedback ({}):", self.feedback.len())?;
        for record in &self.feedback {
            writeln!(
                f,
                "  #{} {} {}/5 - {}",
                record.id, record.feedback.product, record.feedback.rating, record.feedback.text
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Feedback, ProductRequest};

    #[test]
    fn test_report_rendering() {
        let report = StatusReport {
            requests: vec![ProductRequestRecord {
                id: 3,
                request: ProductRequest::new("Gloves M", "qty 5"),
            }],
            feedback: vec![FeedbackRecord {
                id: 9,
                feedback: Feedback::new("Gauze", 2, "tears easily").unwrap(),
            }],
        };

        let rendered = report.to_string();
        assert!(rendered.contains("Product requests (1):"));
        assert!(rendered.contains("#3 [pending] Gloves M - qty 5"));
        assert!(rendered.contains("Feedback (1):"));
        assert!(rendered.contains("#9 Gauze 2/5 - tears easily"));
    }
}
