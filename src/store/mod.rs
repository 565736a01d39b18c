//! Append-only invoice record store.
//!
//! Invoices are written once as flat rows and never updated or deleted. The
//! only query is the highest invoice number written so far, which drives
//! sequential numbering.
//!
//! | Store | Backing |
//! |-------|---------|
//! | [`CsvRecordStore`] | CSV file (feature `store`) |
//! | [`MemoryStore`] | in-process `Vec`, for tests and demos |

#[cfg(feature = "store")]
mod csv_store;
mod error;
mod memory;
mod record;

#[cfg(feature = "store")]
pub use csv_store::CsvRecordStore;
pub use error::StorageError;
pub use memory::MemoryStore;
pub use record::{HEADER, StoredRecord, TIMESTAMP_FORMAT, pack_items};

use serde::{Deserialize, Serialize};

use crate::core::Invoice;

/// Persistence seam used by [`InvoiceManager`](crate::core::InvoiceManager).
pub trait RecordStore {
    /// Create the store with its header if it does not exist yet. Calling
    /// it again is a no-op and never discards rows.
    fn ensure_initialized(&self) -> Result<(), StorageError>;

    /// Append one invoice row. Duplicate numbers are not detected.
    fn append(&self, invoice: &Invoice) -> Result<(), StorageError>;

    /// Highest invoice number in the store, or 0 when there is none.
    /// Rows with a blank number are ignored.
    fn max_number(&self) -> Result<u64, StorageError>;
}

impl<T: RecordStore + ?Sized> RecordStore for &T {
    fn ensure_initialized(&self) -> Result<(), StorageError> {
        (**self).ensure_initialized()
    }

    fn append(&self, invoice: &Invoice) -> Result<(), StorageError> {
        (**self).append(invoice)
    }

    fn max_number(&self) -> Result<u64, StorageError> {
        (**self).max_number()
    }
}

/// What a max-number scan does with a number field that is not an integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedRowPolicy {
    /// Log a warning and ignore the row.
    #[default]
    Skip,
    /// Abort the scan with [`StorageError::MalformedNumber`].
    Strict,
}

/// Running maximum over the number column of a scan.
#[derive(Debug)]
pub(crate) struct NumberScan {
    policy: MalformedRowPolicy,
    max: u64,
    skipped: usize,
}

impl NumberScan {
    pub(crate) fn new(policy: MalformedRowPolicy) -> Self {
        Self {
            policy,
            max: 0,
            skipped: 0,
        }
    }

    /// Feed the raw number field of the row at `line`.
    pub(crate) fn observe(&mut self, line: u64, value: Option<&str>) -> Result<(), StorageError> {
        let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return Ok(());
        };
        match raw.parse::<u64>() {
            Ok(n) => self.max = self.max.max(n),
            Err(_) => match self.policy {
                MalformedRowPolicy::Skip => {
                    tracing::warn!(line, value = raw, "skipping row with malformed invoice number");
                    self.skipped += 1;
                }
                MalformedRowPolicy::Strict => {
                    return Err(StorageError::MalformedNumber {
                        line,
                        value: raw.to_string(),
                    });
                }
            },
        }
        Ok(())
    }

    pub(crate) fn finish(self) -> u64 {
        if self.skipped > 0 {
            tracing::debug!(skipped = self.skipped, max = self.max, "scan finished with skipped rows");
        }
        self.max
    }
}
