//! Core abstractions shared by the catalog reader and the unload builder.
//!
//! - [`schema`]: column metadata and result rows
//! - [`traits`]: the warehouse connection and logger capabilities
//! - [`identifier`]: identifier and literal quoting

pub mod identifier;
pub mod schema;
pub mod traits;

#[cfg(test)]
pub(crate) mod fakes;

pub use identifier::{quote_ident, quote_literal, validate_identifier};
pub use schema::{ColumnDescriptor, Row};
pub use traits::{UnloadLogger, WarehouseConnection};
