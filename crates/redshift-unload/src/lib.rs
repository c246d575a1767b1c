//! # redshift-unload
//!
//! Export Amazon Redshift tables to S3 with `UNLOAD`.
//!
//! This library builds and runs the UNLOAD command for a table:
//!
//! - **Catalog lookup** of column names, types and nullability via `pg_table_def`
//! - **Type conversion** of columns that cannot be written as-is (booleans become 0/1)
//! - **Safe quoting** of identifiers, literals and credentials
//! - **Manifest output** with tab-delimited files, optionally overwriting the prefix
//!
//! ## Example
//!
//! ```rust,no_run
//! use redshift_unload::{Config, RedshiftPool, RedshiftUnloader, UnloadOptions};
//!
//! #[tokio::main]
//! async fn main() -> redshift_unload::Result<()> {
//!     let config = Config::load("config.yaml")?;
//!     let pool = RedshiftPool::connect(&config.warehouse).await?;
//!     let conn = pool.get().await?;
//!
//!     let unloader = RedshiftUnloader::new(&conn, config.credentials()?);
//!     let report = unloader
//!         .unload_to("my_table", "s3://my-bucket/my_table/", &UnloadOptions::default())
//!         .await?;
//!     println!("Unloaded {} columns of {}", report.columns, report.table);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod drivers;
pub mod error;
pub mod logging;
pub mod source;
pub mod typemap;
pub mod unload;

// Re-exports for convenient access
pub use config::{Config, WarehouseConfig};
pub use core::{ColumnDescriptor, UnloadLogger, WarehouseConnection};
pub use drivers::{HealthCheckResult, RedshiftConnection, RedshiftPool, SslMode};
pub use error::{Result, UnloadError};
pub use logging::{NoopLogger, TracingLogger};
pub use source::ColumnCatalog;
pub use typemap::{ConversionRegistry, ConversionRule};
pub use unload::{CredentialSet, RedshiftUnloader, UnloadCommand, UnloadOptions, UnloadReport};
