//! Sequential submission of change records to the master's change queue.
//!
//! The [`ChangeQueue`] port is the only way changes leave the hook. The
//! [`SubmissionPipeline`] drives it for one request:
//!
//! - records are visited strictly in the order the dialect produced them;
//! - records flagged for discard are skipped and not counted;
//! - every other record is submitted on its own, and the next submission only
//!   starts once the previous one has been acknowledged;
//! - the first failure stops the pipeline. Earlier submissions stay in the
//!   queue; there is no rollback and no retry.
//!
//! The `add_change` await is the only point at which request handling
//! yields to the runtime.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::identifiers::ChangeId;
use crate::record::{ChangeRecord, RecordError};

/// Tracing target for submission events.
const SUBMISSION_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::submission");

// ---------------------------------------------------------------------------
// Change queue port
// ---------------------------------------------------------------------------

/// Failure reported by a [`ChangeQueue`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    /// The queue refused the change (malformed record, rejected by the master).
    #[error("change rejected: {message}")]
    Rejected {
        /// Reason given by the queue.
        message: String,
    },

    /// The queue could not be reached or failed internally.
    #[error("change queue unavailable: {message}")]
    Unavailable {
        /// Description of the failure.
        message: String,
    },
}

impl QueueError {
    /// Creates a [`QueueError::Rejected`] error.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Creates a [`QueueError::Unavailable`] error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

impl From<RecordError> for QueueError {
    fn from(error: RecordError) -> Self {
        Self::rejected(error.to_string())
    }
}

/// The master's change intake.
///
/// Implementations must tolerate interleaved calls from concurrent requests;
/// the hook adds no locking of its own beyond sequencing within one request.
#[async_trait]
pub trait ChangeQueue: Send + Sync {
    /// Adds one change and returns the id the master assigned to it.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Rejected`] when the change is not acceptable and
    /// [`QueueError::Unavailable`] when the queue cannot be reached.
    async fn add_change(&self, change: &ChangeRecord) -> Result<ChangeId, QueueError>;
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Outcome of submitting one request's records.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubmissionReport {
    /// Ids of the accepted changes, in submission order.
    pub accepted: Vec<ChangeId>,
    /// Number of records skipped because they were flagged for discard.
    pub discarded: usize,
    /// The failure that stopped the pipeline, if any.
    pub failure: Option<QueueError>,
}

impl SubmissionReport {
    /// Number of changes the queue accepted.
    pub fn accepted_count(&self) -> usize {
        self.accepted.len()
    }

    /// Converts the report into the accepted count or the stopping failure.
    ///
    /// # Errors
    ///
    /// Returns the [`QueueError`] that stopped the pipeline.
    pub fn into_result(self) -> Result<usize, QueueError> {
        match self.failure {
            Some(error) => Err(error),
            None => Ok(self.accepted.len()),
        }
    }
}

/// Submits records to a [`ChangeQueue`] one at a time.
pub struct SubmissionPipeline<'q> {
    queue: &'q dyn ChangeQueue,
}

impl<'q> SubmissionPipeline<'q> {
    /// Creates a pipeline over `queue`.
    pub fn new(queue: &'q dyn ChangeQueue) -> Self {
        Self { queue }
    }

    /// Submits `records` in order, stopping at the first failure.
    pub async fn submit(&self, records: &[ChangeRecord]) -> SubmissionReport {
        let mut report = SubmissionReport::default();
        for record in records {
            if record.is_discarded() {
                debug!(target: SUBMISSION_TARGET, "discarding change as requested by dialect");
                report.discarded += 1;
                continue;
            }
            match self.queue.add_change(record).await {
                Ok(id) => {
                    info!(target: SUBMISSION_TARGET, change_id = %id, "injected change");
                    report.accepted.push(id);
                }
                Err(error) => {
                    warn!(
                        target: SUBMISSION_TARGET,
                        error = %error,
                        accepted = report.accepted.len(),
                        "change submission failed; remaining changes not submitted"
                    );
                    report.failure = Some(error);
                    break;
                }
            }
        }
        report
    }
}
