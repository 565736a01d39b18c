use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading or writing the record store.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    /// The store file or its directory could not be accessed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A row could not be encoded or decoded.
    #[cfg(feature = "store")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A write was attempted before `ensure_initialized`.
    #[error("record store {location} is not initialized")]
    NotInitialized { location: String },

    /// A number field is not an integer and the scan is strict.
    #[error("malformed invoice number {value:?} on line {line}")]
    MalformedNumber { line: u64, value: String },
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
