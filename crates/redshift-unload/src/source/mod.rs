//! Column Catalog Reader.
//!
//! Looks a table up in `pg_table_def` and returns its columns in catalog
//! order. The table name is bound as a query parameter, never interpolated.
//! Nothing is cached: every call runs a fresh catalog query.

use tracing::debug;

use crate::core::schema::{ColumnDescriptor, Row};
use crate::core::traits::WarehouseConnection;
use crate::error::{Result, UnloadError};

/// Catalog query. `pg_table_def` only lists tables on the session's `search_path`.
pub const COLUMNS_QUERY: &str =
    r#"SELECT "column", "type", "notnull" FROM "pg_table_def" WHERE "tablename" = $1"#;

/// Reads column metadata through a warehouse connection.
pub struct ColumnCatalog<'a, C: WarehouseConnection + ?Sized> {
    conn: &'a C,
}

impl<'a, C: WarehouseConnection + ?Sized> ColumnCatalog<'a, C> {
    /// Create a catalog reader over a borrowed connection.
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Describe the columns of a table, in catalog order.
    ///
    /// An unknown table yields an empty vector; deciding whether that is an
    /// error is left to the caller.
    pub async fn describe(&self, table_name: &str) -> Result<Vec<ColumnDescriptor>> {
        let rows = self
            .conn
            .query(COLUMNS_QUERY, &[table_name.to_string()])
            .await?;

        let columns = rows
            .iter()
            .map(column_from_row)
            .collect::<Result<Vec<_>>>()?;

        debug!("Catalog lists {} columns for {}", columns.len(), table_name);
        Ok(columns)
    }
}

fn column_from_row(row: &Row) -> Result<ColumnDescriptor> {
    let name = field(row, "column")?;
    let declared_type = field(row, "type")?;
    let flag = field(row, "notnull")?;
    let not_null = parse_flag(flag).ok_or_else(|| {
        UnloadError::catalog(format!(
            "column {} has an unreadable notnull flag {:?}",
            name, flag
        ))
    })?;

    Ok(ColumnDescriptor::new(name, declared_type, !not_null))
}

fn field<'r>(row: &'r Row, key: &str) -> Result<&'r str> {
    row.get(key)
        .map(String::as_str)
        .ok_or_else(|| UnloadError::catalog(format!("catalog row is missing '{}'", key)))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "t" | "true" => Some(true),
        "f" | "false" => Some(false),
        _ => None,
    }
}
