//! Unload Command Builder.
//!
//! [`RedshiftUnloader`] turns a table name into an UNLOAD command and runs it:
//!
//! 1. Read the table's columns from the catalog ([`ColumnCatalog`])
//! 2. Map each column to a select expression ([`ConversionRegistry`])
//! 3. Assemble the command ([`UnloadCommand`])
//! 4. Execute it on the warehouse connection
//!
//! Warehouse errors are returned untouched. There is no retry and no partial
//! success: the UNLOAD either completes or the connection reports an error.

mod command;
mod credentials;

pub use command::UnloadCommand;
pub use credentials::{CredentialSet, ACCESS_KEY_ID, SECRET_ACCESS_KEY, SESSION_TOKEN};

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::identifier::validate_identifier;
use crate::core::traits::{UnloadLogger, WarehouseConnection};
use crate::error::{Result, UnloadError};
use crate::logging::TracingLogger;
use crate::source::ColumnCatalog;
use crate::typemap::ConversionRegistry;

/// Per-unload options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnloadOptions {
    /// Grant permission to overwrite objects already under the destination
    /// prefix. Off by default, so Redshift refuses to unload over existing data.
    #[serde(default)]
    pub allow_overwrite: bool,
}

/// Outcome of a completed unload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnloadReport {
    pub table: String,
    pub destination: String,
    pub columns: usize,
    pub allow_overwrite: bool,
    pub started_at: DateTime<Utc>,
    pub duration_seconds: f64,
}

impl UnloadReport {
    /// Serialize the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Builds and runs UNLOAD commands over a borrowed warehouse connection.
///
/// The connection is only used for the duration of each call. Run parallel
/// unloads with one unloader and one connection each.
pub struct RedshiftUnloader<'a, C: WarehouseConnection + ?Sized> {
    conn: &'a C,
    credentials: CredentialSet,
    logger: Arc<dyn UnloadLogger>,
    conversions: ConversionRegistry,
}

impl<'a, C: WarehouseConnection + ?Sized> RedshiftUnloader<'a, C> {
    /// Create an unloader that logs through `tracing` and applies the
    /// built-in type conversions.
    pub fn new(conn: &'a C, credentials: CredentialSet) -> Self {
        Self {
            conn,
            credentials,
            logger: Arc::new(TracingLogger::new()),
            conversions: ConversionRegistry::with_builtins(),
        }
    }

    /// Replace the logger.
    pub fn with_logger(mut self, logger: Arc<dyn UnloadLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Replace the type conversion rules.
    pub fn with_conversions(mut self, conversions: ConversionRegistry) -> Self {
        self.conversions = conversions;
        self
    }

    /// Describe the table and build its UNLOAD command without running it.
    pub async fn plan(
        &self,
        table_name: &str,
        destination: &str,
        options: &UnloadOptions,
    ) -> Result<UnloadCommand> {
        validate_identifier(table_name)?;

        let columns = ColumnCatalog::new(self.conn).describe(table_name).await?;
        if columns.is_empty() {
            return Err(UnloadError::EmptyTable(table_name.to_string()));
        }

        let mut projection = Vec::with_capacity(columns.len());
        for column in &columns {
            if let Some(rule) = self.conversions.rule_for(column) {
                self.logger.debug(&format!(
                    "Converting column {} ({}) with the {} rule",
                    column.name, column.declared_type, rule.name
                ));
            }
            projection.push(self.conversions.select_expression(column)?);
        }

        UnloadCommand::new(
            table_name,
            projection,
            destination,
            &self.credentials,
            options,
        )
    }

    /// Unload a table to an S3 prefix.
    pub async fn unload_to(
        &self,
        table_name: &str,
        destination: &str,
        options: &UnloadOptions,
    ) -> Result<UnloadReport> {
        let started_at = Utc::now();
        let start = Instant::now();

        self.logger.info(&format!(
            "Unloading Redshift table {} to {}",
            table_name, destination
        ));

        let command = self.plan(table_name, destination, options).await?;
        self.logger.debug(&format!("Executing {}", command.redacted_sql()));
        self.conn.execute(&command.sql()).await?;

        self.logger
            .info(&format!("Unload of {} complete", table_name));

        Ok(UnloadReport {
            table: table_name.to_string(),
            destination: destination.to_string(),
            columns: command.projection().len(),
            allow_overwrite: command.allow_overwrite(),
            started_at,
            duration_seconds: start.elapsed().as_secs_f64(),
        })
    }
}
