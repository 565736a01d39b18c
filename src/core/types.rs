use chrono::NaiveDateTime;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// The billed party. Every field is required; emptiness is checked by
/// [`validate_client`](super::validate_client), not at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// Full name or company name.
    pub name: String,
    /// Tax or personal identification number.
    pub identification: String,
    /// Postal address, free text.
    pub address: String,
    /// Contact phone number.
    pub phone: String,
}

impl Client {
    pub fn new(
        name: impl Into<String>,
        identification: impl Into<String>,
        address: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            identification: identification.into(),
            address: address.into(),
            phone: phone.into(),
        }
    }
}

/// A single billable entry.
///
/// The subtotal is derived once at construction and never recomputed, so a
/// line item reads the same on screen, in the record store and on paper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LineItemFields")]
pub struct LineItem {
    description: String,
    quantity: i64,
    unit_price: Decimal,
    subtotal: Decimal,
}

/// Wire shape of a [`LineItem`]; the subtotal is always recomputed on input.
#[derive(Deserialize)]
struct LineItemFields {
    description: String,
    quantity: i64,
    unit_price: Decimal,
}

impl TryFrom<LineItemFields> for LineItem {
    type Error = String;

    fn try_from(fields: LineItemFields) -> Result<Self, Self::Error> {
        LineItem::checked(fields.description, fields.quantity, fields.unit_price)
            .ok_or_else(|| "line item subtotal is out of range".to_string())
    }
}

impl LineItem {
    /// Create a line item. Quantity and price are not checked here; see
    /// [`validate_line_items`](super::validate_line_items).
    ///
    /// # Panics
    ///
    /// If `quantity * unit_price` overflows `Decimal`. Use
    /// [`checked`](Self::checked) for untrusted input.
    pub fn new(description: impl Into<String>, quantity: i64, unit_price: Decimal) -> Self {
        let subtotal = round_money(Decimal::from(quantity) * unit_price);
        Self {
            description: description.into(),
            quantity,
            unit_price,
            subtotal,
        }
    }

    /// Like [`new`](Self::new), but `None` when the subtotal does not fit.
    pub fn checked(
        description: impl Into<String>,
        quantity: i64,
        unit_price: Decimal,
    ) -> Option<Self> {
        let product = Decimal::from(quantity).checked_mul(unit_price)?;
        Some(Self {
            description: description.into(),
            quantity,
            unit_price,
            subtotal: round_money(product),
        })
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// `quantity * unit_price`, rounded to 2 decimal places.
    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }
}

/// A numbered billing document for one client.
///
/// Invoices are only produced by the [`InvoiceManager`](super::InvoiceManager),
/// which validates client and items first. They are immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invoice {
    number: u64,
    issued_at: NaiveDateTime,
    client: Client,
    items: Vec<LineItem>,
    total: Decimal,
}

impl Invoice {
    /// `total` must be `total_of(&items)`.
    pub(crate) fn new(
        number: u64,
        issued_at: NaiveDateTime,
        client: Client,
        items: Vec<LineItem>,
        total: Decimal,
    ) -> Self {
        Self {
            number,
            issued_at,
            client,
            items,
            total,
        }
    }

    /// Sequential invoice number.
    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn issued_at(&self) -> NaiveDateTime {
        self.issued_at
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Items in display and print order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Sum of all item subtotals, rounded to 2 decimal places.
    pub fn total(&self) -> Decimal {
        self.total
    }
}

/// Rounded sum of the subtotals of `items`, or `None` when the sum does not
/// fit in a `Decimal`. Zero for an empty slice.
pub fn total_of(items: &[LineItem]) -> Option<Decimal> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |sum, item| sum.checked_add(item.subtotal()))
        .map(round_money)
}

/// Commercial rounding to cents: midpoints go away from zero.
pub(crate) fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
