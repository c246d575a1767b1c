//! Capabilities the unload core consumes.
//!
//! - [`WarehouseConnection`]: runs commands and parameterized queries
//! - [`UnloadLogger`]: receives lifecycle messages
//!
//! The core holds neither beyond a single call. Implementations are not
//! required to support concurrent use from several logical operations; a
//! caller running unloads in parallel supplies one connection per unload.

use async_trait::async_trait;

use crate::error::Result;

use super::schema::Row;

/// A single warehouse session.
///
/// This is the only surface the catalog reader and unload builder touch,
/// so any client library (or an in-memory fake) can stand behind it.
/// Errors are returned as raised; callers do not retry.
#[async_trait]
pub trait WarehouseConnection: Send + Sync {
    /// Run a command that returns no result set.
    async fn execute(&self, sql: &str) -> Result<()>;

    /// Run a read query with positional (`$1`, `$2`, ...) string parameters.
    ///
    /// Rows are returned in the order the warehouse produced them.
    async fn query(&self, sql: &str, params: &[String]) -> Result<Vec<Row>>;
}

/// Sink for informational lifecycle messages.
pub trait UnloadLogger: Send + Sync {
    /// Log at info level.
    fn info(&self, message: &str);

    /// Log at debug level.
    fn debug(&self, message: &str);

    /// Log at warn level.
    fn warn(&self, message: &str);
}
