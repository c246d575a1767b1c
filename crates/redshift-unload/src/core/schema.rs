//! Column metadata read from the warehouse catalog.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One result row from a warehouse query, keyed by column name.
///
/// Every value is rendered as text. A SQL NULL is represented by the key
/// being absent.
pub type Row = HashMap<String, String>;

/// Column metadata as declared in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name.
    pub name: String,

    /// Raw type signature, e.g. `character varying(100)`.
    pub declared_type: String,

    /// Whether the column accepts NULL.
    pub nullable: bool,
}

impl ColumnDescriptor {
    /// Create a new column descriptor.
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>, nullable: bool) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            nullable,
        }
    }

    /// Type name with any length/precision parameters stripped and lowercased.
    ///
    /// `character varying(100)` becomes `character varying`.
    pub fn base_type(&self) -> String {
        let base = match self.declared_type.find('(') {
            Some(idx) => &self.declared_type[..idx],
            None => &self.declared_type,
        };
        base.trim().to_lowercase()
    }
}
