use thiserror::Error;

use crate::store::StorageError;

/// Errors that can occur while creating or issuing an invoice.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InvoiceError {
    /// A business rule rejected the client or the line items.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The record store could not be read or written.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Invoice number sequencing error.
    #[error("numbering error: {0}")]
    Numbering(String),
}

/// A single rule violation with the path of the offending field.
///
/// Validation stops at the first violation, so there is never more than one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Path to the invalid field (e.g. "client.phone", "items[1].quantity").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A form cell that could not be read as the number it should hold.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("row {row}: {message}")]
pub struct ParseError {
    /// 1-based row of the item table.
    pub row: usize,
    /// Human-readable error description.
    pub message: String,
}

impl ParseError {
    pub fn new(row: usize, message: impl Into<String>) -> Self {
        Self {
            row,
            message: message.into(),
        }
    }
}
