use serde::{Deserialize, Serialize};

use crate::core::{Invoice, LineItem};

/// Column header of the record store, in column order.
pub const HEADER: [&str; 8] = [
    "numero",
    "fecha_emision",
    "cliente_nombre",
    "cliente_identificacion",
    "cliente_direccion",
    "cliente_telefono",
    "productos",
    "total",
];

/// Format of the `fecha_emision` column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One invoice as it is laid out in the store.
///
/// Every column is text. Line items are packed into `productos` and cannot
/// be read back as structured data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    #[serde(rename = "numero")]
    pub number: String,
    #[serde(rename = "fecha_emision")]
    pub issued_at: String,
    #[serde(rename = "cliente_nombre")]
    pub client_name: String,
    #[serde(rename = "cliente_identificacion")]
    pub client_identification: String,
    #[serde(rename = "cliente_direccion")]
    pub client_address: String,
    #[serde(rename = "cliente_telefono")]
    pub client_phone: String,
    #[serde(rename = "productos")]
    pub items: String,
    pub total: String,
}

impl StoredRecord {
    pub fn from_invoice(invoice: &Invoice) -> Self {
        let client = invoice.client();
        Self {
            number: invoice.number().to_string(),
            issued_at: invoice.issued_at().format(TIMESTAMP_FORMAT).to_string(),
            client_name: client.name.clone(),
            client_identification: client.identification.clone(),
            client_address: client.address.clone(),
            client_phone: client.phone.clone(),
            items: pack_items(invoice.items()),
            total: format!("{:.2}", invoice.total()),
        }
    }
}

/// Pack items as `"{description} x{quantity} @ {unit_price}"` joined by `"; "`.
///
/// The unit price keeps the scale it was entered with ("2.5" stays "2.5").
pub fn pack_items(items: &[LineItem]) -> String {
    items
        .iter()
        .map(|item| {
            format!(
                "{} x{} @ {}",
                item.description(),
                item.quantity(),
                item.unit_price()
            )
        })
        .collect::<Vec<_>>()
        .join("; ")
}
