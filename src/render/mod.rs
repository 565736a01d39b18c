//! Printable invoice documents.
//!
//! A renderer turns an [`Invoice`] into one page with the company header,
//! the client block, the item table in invoice order and the total. Files
//! are named `invoice_{number}.{ext}` inside the configured output
//! directory, which is created when missing.

#[cfg(feature = "pdf")]
mod pdf;
mod text;

#[cfg(feature = "pdf")]
pub use pdf::PdfRenderer;
pub use text::{format_money, to_win_ansi};

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::Invoice;

/// Errors raised while producing a document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RenderError {
    /// The output directory or file could not be written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document could not be assembled.
    #[error("PDF error: {0}")]
    Pdf(String),
}

/// Produces a printable file for an invoice.
pub trait DocumentRenderer {
    /// Fail early if `invoice` cannot be laid out, before anything is
    /// stored. Accepts everything by default.
    fn check_layout(&self, _invoice: &Invoice) -> Result<(), RenderError> {
        Ok(())
    }

    /// Write the document and return its path.
    fn render_to_file(&self, invoice: &Invoice) -> Result<PathBuf, RenderError>;
}

/// `{dir}/invoice_{number}.{extension}`
pub fn document_path(dir: &Path, number: u64, extension: &str) -> PathBuf {
    dir.join(format!("invoice_{number}.{extension}"))
}
