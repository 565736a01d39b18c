//! # facturador
//!
//! Small invoicing utility: validates client and line-item data, assigns
//! sequential invoice numbers, persists invoices to an append-only CSV
//! record store, and renders a one-page PDF per invoice.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//! Subtotals and totals are rounded to cents, midpoints away from zero.
//!
//! ## Quick Start
//!
//! ```rust
//! use facturador::core::*;
//! use facturador::store::MemoryStore;
//! use rust_decimal_macros::dec;
//!
//! let manager = InvoiceManager::new(MemoryStore::new()).unwrap();
//! let invoice = manager
//!     .create_invoice(
//!         Client::new("Ann Smith", "V-123", "Main St 1", "555-0100"),
//!         vec![
//!             LineItem::new("Widget", 3, dec!(2.50)),
//!             LineItem::new("Setup", 1, dec!(10)),
//!         ],
//!         None,
//!         None,
//!     )
//!     .unwrap();
//!
//! assert_eq!(invoice.number(), 1);
//! assert_eq!(invoice.total(), dec!(17.50));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Entities, validation, numbering, in-memory store |
//! | `store` (default) | CSV record store |
//! | `pdf` (default) | PDF document renderer |
//! | `cli` | `facturador` command-line front end |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod config;

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "core")]
pub mod render;

#[cfg(feature = "core")]
pub mod session;

#[cfg(feature = "core")]
pub mod store;

#[cfg(feature = "cli")]
pub mod logging;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
