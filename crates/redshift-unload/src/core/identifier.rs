//! Identifier validation and quoting for SQL injection prevention.
//!
//! SQL identifiers (table names, column names) cannot be passed as parameters
//! in prepared statements, and the UNLOAD directive embeds its whole SELECT
//! as a string literal, so neither the table nor its columns can be bound.
//!
//! To safely construct the command we:
//! 1. Validate identifiers for suspicious patterns (null bytes, backslashes, excessive length)
//! 2. Wrap identifiers in double quotes, doubling embedded double quotes
//! 3. Wrap literals in single quotes, doubling embedded single quotes

use crate::error::{Result, UnloadError};

/// Maximum identifier length in bytes accepted by Redshift.
const MAX_IDENTIFIER_LENGTH: usize = 127;

/// Validate an identifier for security issues.
///
/// Rejects:
/// - Empty identifiers
/// - Identifiers containing null bytes (injection vector)
/// - Identifiers containing backslashes (escape character inside UNLOAD literals)
/// - Identifiers exceeding maximum length
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(UnloadError::Identifier(
            "Identifier cannot be empty".to_string(),
        ));
    }

    if name.contains('\0') {
        return Err(UnloadError::Identifier(format!(
            "SECURITY: Identifier contains null byte (possible injection attempt): {:?}",
            name
        )));
    }

    if name.contains('\\') {
        return Err(UnloadError::Identifier(format!(
            "SECURITY: Identifier contains backslash (possible injection attempt): {:?}",
            name
        )));
    }

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(UnloadError::Identifier(format!(
            "SECURITY: Identifier exceeds maximum length of {} bytes (got {} bytes): {:?}",
            MAX_IDENTIFIER_LENGTH,
            name.len(),
            name
        )));
    }

    Ok(())
}

/// Quote a Redshift identifier.
///
/// Escapes double quotes by doubling them and wraps in double quotes.
/// Validates the identifier before quoting.
///
/// ```ignore
/// assert_eq!(quote_ident("users")?, "\"users\"");
/// assert_eq!(quote_ident("table\"name")?, "\"table\"\"name\"");
/// ```
pub fn quote_ident(name: &str) -> Result<String> {
    validate_identifier(name)?;
    Ok(format!("\"{}\"", name.replace('"', "\"\"")))
}

/// Double every single quote so `text` can sit between single quotes.
///
/// Callers must have rejected backslashes and null bytes already.
pub fn escape_literal(text: &str) -> String {
    text.replace('\'', "''")
}

/// Quote a string literal.
///
/// Rejects null bytes and backslashes, which Redshift treats as an escape
/// character inside UNLOAD string arguments.
pub fn quote_literal(value: &str) -> Result<String> {
    if value.contains('\0') || value.contains('\\') {
        return Err(UnloadError::Config(format!(
            "SECURITY: Literal contains a null byte or backslash: {:?}",
            value
        )));
    }
    Ok(format!("'{}'", escape_literal(value)))
}
