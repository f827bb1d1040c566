//! In-process change queue.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tracing::info;

use pipeline::{ChangeId, ChangeQueue, ChangeRecord, QueueError};

/// Change queue holding accepted changes in memory.
///
/// Records are validated as the master would validate them, so malformed
/// changes are rejected here too. Ids start at 1 and increase with every
/// accepted change.
#[derive(Debug, Default)]
pub struct InMemoryChangeQueue {
    changes: Mutex<Vec<ChangeRecord>>,
}

impl InMemoryChangeQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the accepted changes, oldest first.
    pub fn changes(&self) -> Vec<ChangeRecord> {
        self.lock().clone()
    }

    /// Number of accepted changes.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if nothing has been accepted yet.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ChangeRecord>> {
        // The guarded Vec is never left half-updated, so a poisoned lock is
        // still usable.
        self.changes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ChangeQueue for InMemoryChangeQueue {
    async fn add_change(&self, change: &ChangeRecord) -> Result<ChangeId, QueueError> {
        change.validate()?;
        let mut changes = self.lock();
        changes.push(change.clone());
        let id = ChangeId::new(changes.len() as u64);
        info!(change_id = %id, revision = ?change.revision, "change held in memory");
        Ok(id)
    }
}
