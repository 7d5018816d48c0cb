//! Append-only audit log held in memory.

use parking_lot::RwLock;

use crate::traits::{AuditRecord, AuditSink};

/// Audit sink that keeps every record, in arrival order.
#[derive(Default)]
pub struct InMemoryAuditLog {
    records: RwLock<Vec<AuditRecord>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of every record appended so far.
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.read().clone()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl AuditSink for InMemoryAuditLog {
    fn info(&self, record: AuditRecord) {
        tracing::debug!(text = %record.text, "audit");
        self.records.write().push(record);
    }
}
