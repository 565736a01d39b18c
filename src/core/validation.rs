use rust_decimal::Decimal;

use super::error::ValidationError;
use super::types::{Client, LineItem, total_of};

/// Check that every client field holds more than whitespace.
///
/// Fields are checked in a fixed order (name, identification, address,
/// phone) and the first empty one is reported.
pub fn validate_client(client: &Client) -> Result<(), ValidationError> {
    let fields = [
        ("client.name", &client.name, "client name is required"),
        (
            "client.identification",
            &client.identification,
            "client identification is required",
        ),
        ("client.address", &client.address, "client address is required"),
        ("client.phone", &client.phone, "client phone is required"),
    ];

    for (field, value, message) in fields {
        if value.trim().is_empty() {
            return Err(ValidationError::new(field, message));
        }
    }
    Ok(())
}

/// Check that there is at least one item and that each item is billable.
///
/// Items are checked in order; within an item the description comes first,
/// then the quantity, then the unit price. The first violation is reported.
/// Last, the total of all items must be representable.
pub fn validate_line_items(items: &[LineItem]) -> Result<(), ValidationError> {
    if items.is_empty() {
        return Err(ValidationError::new(
            "items",
            "at least one item required",
        ));
    }

    for (i, item) in items.iter().enumerate() {
        let description = item.description();
        if description.trim().is_empty() {
            return Err(ValidationError::new(
                format!("items[{i}].description"),
                "item description must not be empty",
            ));
        }
        if item.quantity() <= 0 {
            return Err(ValidationError::new(
                format!("items[{i}].quantity"),
                format!("quantity of item '{description}' must be greater than zero"),
            ));
        }
        if item.unit_price() <= Decimal::ZERO {
            return Err(ValidationError::new(
                format!("items[{i}].unit_price"),
                format!("unit price of item '{description}' must be greater than zero"),
            ));
        }
    }
    checked_total(items).map(drop)
}

/// Rounded total of `items`; fails on `items` when the sum overflows.
pub fn checked_total(items: &[LineItem]) -> Result<Decimal, ValidationError> {
    total_of(items).ok_or_else(|| ValidationError::new("items", "total is too large"))
}
