//! Form-driven invoice entry.
//!
//! An [`InvoiceSession`] plays the part of a data-entry form: it reads raw
//! text cells, turns them into line items, and walks each invoice through
//! creation, persistence and rendering. It holds its own "next number"
//! counter, seeded from the store when the session opens and advanced as
//! soon as an invoice row has been written.

use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::core::{
    Client, Invoice, InvoiceError, InvoiceManager, InvoiceNumberSequence, LineItem, ParseError,
    ValidationError,
};
use crate::render::{DocumentRenderer, RenderError};
use crate::store::{RecordStore, StorageError};

/// Anything that can stop a form submission. All of them are meant to be
/// shown to the user; none is fatal.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("invalid input in {0}")]
    Parse(#[from] ParseError),

    #[error("invalid invoice: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("invoice could not be rendered: {0}")]
    Render(#[from] RenderError),

    #[error("numbering error: {0}")]
    Numbering(String),
}

impl From<InvoiceError> for SessionError {
    fn from(e: InvoiceError) -> Self {
        match e {
            InvoiceError::Validation(v) => Self::Validation(v),
            InvoiceError::Storage(s) => Self::Storage(s),
            InvoiceError::Numbering(msg) => Self::Numbering(msg),
        }
    }
}

impl SessionError {
    /// True for mistakes the user can fix by editing the form.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::Parse(_) | Self::Validation(_))
    }
}

/// One row of the item table, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemRow {
    pub description: String,
    pub quantity: String,
    pub unit_price: String,
}

impl ItemRow {
    pub fn new(
        description: impl Into<String>,
        quantity: impl Into<String>,
        unit_price: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            quantity: quantity.into(),
            unit_price: unit_price.into(),
        }
    }

    /// Read the row as a line item. `row` is the 1-based position used in
    /// error messages. Blank numeric cells read as zero and are left for
    /// validation to reject.
    pub fn parse(&self, row: usize) -> Result<LineItem, ParseError> {
        let quantity = cell_or_zero(&self.quantity);
        let unit_price = cell_or_zero(&self.unit_price);

        let quantity = quantity.parse::<i64>().map_err(|_| {
            ParseError::new(row, format!("quantity {quantity:?} is not a whole number"))
        })?;
        let unit_price = Decimal::from_str(unit_price).map_err(|_| {
            ParseError::new(row, format!("unit price {unit_price:?} is not a number"))
        })?;

        LineItem::checked(self.description.trim(), quantity, unit_price)
            .ok_or_else(|| ParseError::new(row, "quantity times unit price is too large"))
    }
}

fn cell_or_zero(cell: &str) -> &str {
    match cell.trim() {
        "" => "0",
        trimmed => trimmed,
    }
}

/// Parse every row, stopping at the first unreadable one. The row that
/// pushes the running total past what a `Decimal` holds is unreadable too.
pub fn parse_rows(rows: &[ItemRow]) -> Result<Vec<LineItem>, ParseError> {
    let mut running = Decimal::ZERO;
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let item = row.parse(i + 1)?;
            running = running
                .checked_add(item.subtotal())
                .ok_or_else(|| ParseError::new(i + 1, "total is too large"))?;
            Ok(item)
        })
        .collect()
}

/// Outcome of a successful submission.
#[derive(Debug, Clone)]
pub struct Submission {
    pub invoice: Invoice,
    /// Rendered document, when the session has a renderer.
    pub document: Option<PathBuf>,
}

/// A data-entry session over one record store.
pub struct InvoiceSession<S> {
    manager: InvoiceManager<S>,
    renderer: Option<Box<dyn DocumentRenderer>>,
    sequence: InvoiceNumberSequence,
}

impl<S: RecordStore> InvoiceSession<S> {
    /// Start a session; the counter begins at the store's next number.
    pub fn open(manager: InvoiceManager<S>) -> Result<Self, SessionError> {
        let sequence = InvoiceNumberSequence::starting_at(manager.next_number()?);
        tracing::debug!(next = sequence.peek(), "session opened");
        Ok(Self {
            manager,
            renderer: None,
            sequence,
        })
    }

    pub fn with_renderer(mut self, renderer: impl DocumentRenderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn manager(&self) -> &InvoiceManager<S> {
        &self.manager
    }

    /// Number the next submitted invoice will receive.
    pub fn next_number(&self) -> u64 {
        self.sequence.peek()
    }

    /// Running total of the table, without validating it.
    pub fn total_preview(&self, rows: &[ItemRow]) -> Result<Decimal, SessionError> {
        Ok(self.manager.preview_total(&parse_rows(rows)?)?)
    }

    /// Create, store and render an invoice from the form contents.
    ///
    /// The invoice takes the session's current number. If parsing,
    /// validation, the renderer's layout check or storage fails, nothing is
    /// stored and the counter is left as it was. A failure while writing
    /// the document still consumes the number, since the row is stored.
    pub fn submit(&mut self, client: Client, rows: &[ItemRow]) -> Result<Submission, SessionError> {
        let items = parse_rows(rows)?;
        let invoice =
            self.manager
                .create_invoice(client, items, Some(self.sequence.peek()), None)?;
        if let Some(renderer) = &self.renderer {
            renderer.check_layout(&invoice)?;
        }
        self.manager.store().append(&invoice)?;
        self.sequence.advance_past(invoice.number());

        let document = match &self.renderer {
            Some(renderer) => Some(renderer.render_to_file(&invoice)?),
            None => None,
        };
        Ok(Submission { invoice, document })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn blank_numeric_cells_read_as_zero() {
        let item = ItemRow::new("Widget", " ", "").parse(1).unwrap();
        assert_eq!(item.quantity(), 0);
        assert_eq!(item.unit_price(), Decimal::ZERO);
    }

    #[test]
    fn cells_are_trimmed() {
        let item = ItemRow::new("  Widget ", " 3 ", " 2.50 ").parse(1).unwrap();
        assert_eq!(item.description(), "Widget");
        assert_eq!(item.subtotal(), dec!(7.50));
    }

    #[test]
    fn fractional_quantity_is_a_parse_error() {
        let err = ItemRow::new("Widget", "1.5", "2").parse(4).unwrap_err();
        assert_eq!(err.row, 4);
        assert!(err.message.contains("quantity"));
    }

    #[test]
    fn overflowing_amount_is_a_parse_error() {
        let row = ItemRow::new("Huge", "9223372036854775807", "79228162514264337593543950335");
        let err = row.parse(1).unwrap_err();
        assert!(err.message.contains("too large"));
    }

    #[test]
    fn overflowing_running_total_names_the_row() {
        let rows = [
            ItemRow::new("A", "1", "50000000000000000000000000000"),
            ItemRow::new("B", "1", "1"),
            ItemRow::new("C", "1", "50000000000000000000000000000"),
        ];
        let err = parse_rows(&rows).unwrap_err();
        assert_eq!(err.row, 3);
        assert_eq!(err.message, "total is too large");
    }

    #[test]
    fn parse_rows_reports_one_based_row() {
        let rows = [
            ItemRow::new("A", "1", "1"),
            ItemRow::new("B", "1", "abc"),
        ];
        let err = parse_rows(&rows).unwrap_err();
        assert_eq!(err.row, 2);
        assert!(err.to_string().starts_with("row 2:"));
    }

    #[test]
    fn user_errors_are_classified() {
        let parse: SessionError = ParseError::new(1, "bad").into();
        let validation: SessionError = ValidationError::new("items", "empty").into();
        let storage: SessionError = StorageError::NotInitialized {
            location: "memory".into(),
        }
        .into();
        assert!(parse.is_user_error());
        assert!(validation.is_user_error());
        assert!(!storage.is_user_error());
    }
}
