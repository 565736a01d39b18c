//! Core invoice types, validation, and numbering.
//!
//! This module provides the domain entities (client, line item, invoice),
//! the business rules that gate invoice creation, and the
//! [`InvoiceManager`] that assigns sequential numbers.

mod error;
mod manager;
mod numbering;
mod types;
mod validation;

pub use error::*;
pub use manager::*;
pub use numbering::*;
pub use types::*;
pub use validation::*;
