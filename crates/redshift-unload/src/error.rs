//! Error types for the unload library.

use thiserror::Error;

/// Exit code for configuration problems (bad YAML, missing fields, bad options).
pub const EXIT_CONFIG_ERROR: u8 = 1;
/// Exit code for failures reported by the warehouse.
pub const EXIT_WAREHOUSE_ERROR: u8 = 2;
/// Exit code for a table the catalog knows nothing about.
pub const EXIT_EMPTY_TABLE: u8 = 3;
/// Exit code for file system errors.
pub const EXIT_IO_ERROR: u8 = 7;

/// Main error type for unload operations.
#[derive(Error, Debug)]
pub enum UnloadError {
    /// Configuration error (invalid YAML, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Identifier rejected before it could be quoted into SQL
    #[error("Invalid identifier: {0}")]
    Identifier(String),

    /// Credential set is incomplete or carries an unsafe value
    #[error("Credentials error: {0}")]
    Credentials(String),

    /// Redshift connection, query or command error
    #[error("Warehouse error: {0}")]
    Warehouse(#[from] tokio_postgres::Error),

    /// Connection pool error with context
    #[error("Pool error: {message}\n  Context: {context}")]
    Pool { message: String, context: String },

    /// Failure raised by a non-Redshift warehouse connection
    #[error("Connection error: {0}")]
    Connection(String),

    /// Catalog returned a row this library cannot interpret
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Catalog returned no columns for the table
    #[error("Table {0} is unknown or has no columns")]
    EmptyTable(String),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl UnloadError {
    /// Create a Pool error with context about where it occurred
    pub fn pool(message: impl ToString, context: impl Into<String>) -> Self {
        UnloadError::Pool {
            message: message.to_string(),
            context: context.into(),
        }
    }

    /// Create a Catalog error
    pub fn catalog(message: impl Into<String>) -> Self {
        UnloadError::Catalog(message.into())
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            UnloadError::Config(_)
            | UnloadError::Identifier(_)
            | UnloadError::Credentials(_)
            | UnloadError::Yaml(_)
            | UnloadError::Json(_) => EXIT_CONFIG_ERROR,
            UnloadError::Warehouse(_)
            | UnloadError::Pool { .. }
            | UnloadError::Connection(_)
            | UnloadError::Catalog(_) => EXIT_WAREHOUSE_ERROR,
            UnloadError::EmptyTable(_) => EXIT_EMPTY_TABLE,
            UnloadError::Io(_) => EXIT_IO_ERROR,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for unload operations.
pub type Result<T> = std::result::Result<T, UnloadError>;
