use std::sync::{Mutex, MutexGuard, PoisonError};

use super::record::StoredRecord;
use super::{MalformedRowPolicy, NumberScan, RecordStore, StorageError};
use crate::core::Invoice;

/// In-memory record store with the same contract as the CSV store.
///
/// Rows are kept in their encoded form so that tests observe exactly what
/// would have been written to disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Mutex<Option<Vec<StoredRecord>>>,
}

impl MemoryStore {
    /// An uninitialized store; call `ensure_initialized` before appending.
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of every row appended so far, in append order.
    pub fn records(&self) -> Vec<StoredRecord> {
        self.rows().clone().unwrap_or_default()
    }

    fn rows(&self) -> MutexGuard<'_, Option<Vec<StoredRecord>>> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RecordStore for MemoryStore {
    fn ensure_initialized(&self) -> Result<(), StorageError> {
        self.rows().get_or_insert_with(Vec::new);
        Ok(())
    }

    fn append(&self, invoice: &Invoice) -> Result<(), StorageError> {
        let mut rows = self.rows();
        let rows = rows.as_mut().ok_or_else(|| StorageError::NotInitialized {
            location: "memory".into(),
        })?;
        rows.push(StoredRecord::from_invoice(invoice));
        Ok(())
    }

    fn max_number(&self) -> Result<u64, StorageError> {
        let rows = self.rows();
        let mut scan = NumberScan::new(MalformedRowPolicy::Skip);
        for (i, row) in rows.iter().flatten().enumerate() {
            // Line 1 is the header in the file layout.
            scan.observe(i as u64 + 2, Some(&row.number))?;
        }
        Ok(scan.finish())
    }
}
