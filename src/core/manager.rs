use std::sync::{Mutex, PoisonError};

use chrono::{Local, NaiveDateTime};
use rust_decimal::Decimal;

use super::error::{InvoiceError, ValidationError};
use super::types::{Client, Invoice, LineItem};
use super::validation;
use crate::store::RecordStore;

/// Business-rule gatekeeper and invoice factory.
///
/// The manager keeps no numbering state of its own: the next number is
/// always derived from the highest number in the record store.
///
/// ```
/// use facturador::core::*;
/// use facturador::store::MemoryStore;
/// use rust_decimal_macros::dec;
///
/// let manager = InvoiceManager::new(MemoryStore::new()).unwrap();
/// let invoice = manager
///     .issue(
///         Client::new("Ann Smith", "V-123", "Main St 1", "555-0100"),
///         vec![LineItem::new("Widget", 3, dec!(2.50))],
///         None,
///     )
///     .unwrap();
///
/// assert_eq!(invoice.number(), 1);
/// assert_eq!(invoice.total(), dec!(7.50));
/// assert_eq!(manager.next_number().unwrap(), 2);
/// ```
#[derive(Debug)]
pub struct InvoiceManager<S> {
    store: S,
    issue_lock: Mutex<()>,
}

impl<S: RecordStore> InvoiceManager<S> {
    /// Wrap `store`, creating it if it does not exist yet.
    pub fn new(store: S) -> Result<Self, InvoiceError> {
        store.ensure_initialized()?;
        Ok(Self {
            store,
            issue_lock: Mutex::new(()),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// One past the highest number in the store; 1 for an empty store.
    pub fn next_number(&self) -> Result<u64, InvoiceError> {
        let max = self.store.max_number()?;
        max.checked_add(1).ok_or_else(|| {
            InvoiceError::Numbering(format!("invoice number {max} cannot be incremented"))
        })
    }

    pub fn validate_client(&self, client: &Client) -> Result<(), ValidationError> {
        validation::validate_client(client)
    }

    pub fn validate_line_items(&self, items: &[LineItem]) -> Result<(), ValidationError> {
        validation::validate_line_items(items)
    }

    /// Validate and build an invoice without persisting it.
    ///
    /// The client is validated before the items. Without an explicit
    /// `number` the next store number is assigned; without `issued_at` the
    /// local clock is used.
    pub fn create_invoice(
        &self,
        client: Client,
        items: Vec<LineItem>,
        number: Option<u64>,
        issued_at: Option<NaiveDateTime>,
    ) -> Result<Invoice, InvoiceError> {
        self.validate_client(&client)?;
        self.validate_line_items(&items)?;
        let total = validation::checked_total(&items)?;

        let number = match number {
            Some(0) => {
                return Err(ValidationError::new("number", "invoice number must be positive").into());
            }
            Some(n) => n,
            None => self.next_number()?,
        };
        let issued_at = issued_at.unwrap_or_else(|| Local::now().naive_local());

        tracing::debug!(number, items = items.len(), "invoice created");
        Ok(Invoice::new(number, issued_at, client, items, total))
    }

    /// Create an invoice with the next free number and append it to the
    /// store in one step.
    ///
    /// Calls to `issue` on the same manager are serialized, so two threads
    /// never receive the same number. Separate processes writing the same
    /// store are not coordinated.
    pub fn issue(
        &self,
        client: Client,
        items: Vec<LineItem>,
        issued_at: Option<NaiveDateTime>,
    ) -> Result<Invoice, InvoiceError> {
        let _guard = self
            .issue_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let invoice = self.create_invoice(client, items, None, issued_at)?;
        self.store.append(&invoice)?;
        tracing::info!(
            number = invoice.number(),
            total = %invoice.total(),
            "invoice issued"
        );
        Ok(invoice)
    }

    /// Total the given items would produce. Only overflow is checked; the
    /// items themselves are not validated.
    pub fn preview_total(&self, items: &[LineItem]) -> Result<Decimal, ValidationError> {
        validation::checked_total(items)
    }
}
