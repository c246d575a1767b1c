//! UNLOAD command text.
//!
//! Clause order is fixed and downstream audit tooling parses it:
//!
//! ```text
//! UNLOAD ('SELECT <col-exprs> FROM "<table>"')
//! TO '<destination_uri>'
//! CREDENTIALS 'aws_access_key_id=<id>;aws_secret_access_key=<secret>[;token=<token>]'
//! MANIFEST
//! DELIMITER '\t'
//! [ALLOWOVERWRITE]
//! ```

use std::fmt;

use crate::core::identifier::{escape_literal, quote_ident, quote_literal};
use crate::error::{Result, UnloadError};

use super::credentials::CredentialSet;
use super::UnloadOptions;

/// Tab delimiter, written with the backslash escape UNLOAD understands.
const DELIMITER_CLAUSE: &str = r"DELIMITER '\t'";
const MANIFEST_CLAUSE: &str = "MANIFEST";
const ALLOW_OVERWRITE_CLAUSE: &str = "ALLOWOVERWRITE";

/// A fully validated UNLOAD command for one table.
///
/// `Display` and `Debug` render the redacted form; only [`sql`](Self::sql)
/// carries the real secrets.
#[derive(Clone)]
pub struct UnloadCommand {
    table: String,
    quoted_table: String,
    projection: Vec<String>,
    destination: String,
    destination_literal: String,
    credentials: String,
    redacted_credentials: String,
    allow_overwrite: bool,
}

impl UnloadCommand {
    /// Build a command from per-column select expressions.
    ///
    /// The destination is used verbatim; no trailing slash is added or removed.
    pub fn new(
        table: &str,
        projection: Vec<String>,
        destination: &str,
        credentials: &CredentialSet,
        options: &UnloadOptions,
    ) -> Result<Self> {
        if projection.is_empty() {
            return Err(UnloadError::EmptyTable(table.to_string()));
        }
        if destination.is_empty() {
            return Err(UnloadError::Config("destination URI is required".into()));
        }

        Ok(Self {
            table: table.to_string(),
            quoted_table: quote_ident(table)?,
            projection,
            destination: destination.to_string(),
            destination_literal: quote_literal(destination)?,
            credentials: credentials.fragment()?,
            redacted_credentials: credentials.redacted_fragment()?,
            allow_overwrite: options.allow_overwrite,
        })
    }

    /// Source table name, unquoted.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Destination prefix, as given.
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Per-column select expressions in catalog order.
    pub fn projection(&self) -> &[String] {
        &self.projection
    }

    /// Whether the command carries `ALLOWOVERWRITE`.
    pub fn allow_overwrite(&self) -> bool {
        self.allow_overwrite
    }

    /// `SELECT <projection> FROM "<table>"`
    pub fn select_statement(&self) -> String {
        format!(
            "SELECT {} FROM {}",
            self.projection.join(", "),
            self.quoted_table
        )
    }

    /// Command text to send to the warehouse.
    pub fn sql(&self) -> String {
        self.render(&self.credentials)
    }

    /// Command text with the secret key and token masked, safe to log.
    pub fn redacted_sql(&self) -> String {
        self.render(&self.redacted_credentials)
    }

    fn render(&self, credentials: &str) -> String {
        let mut clauses = vec![
            format!("UNLOAD ('{}')", escape_literal(&self.select_statement())),
            format!("TO {}", self.destination_literal),
            format!("CREDENTIALS '{}'", credentials),
            MANIFEST_CLAUSE.to_string(),
            DELIMITER_CLAUSE.to_string(),
        ];
        if self.allow_overwrite {
            clauses.push(ALLOW_OVERWRITE_CLAUSE.to_string());
        }
        clauses.join("\n")
    }
}

impl fmt::Display for UnloadCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted_sql())
    }
}

impl fmt::Debug for UnloadCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnloadCommand")
            .field("table", &self.table)
            .field("projection", &self.projection)
            .field("destination", &self.destination)
            .field("credentials", &self.redacted_credentials)
            .field("allow_overwrite", &self.allow_overwrite)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unload::credentials::{ACCESS_KEY_ID, SECRET_ACCESS_KEY};

    fn credentials() -> CredentialSet {
        [(ACCESS_KEY_ID, "foo"), (SECRET_ACCESS_KEY, "bar")]
            .into_iter()
            .collect()
    }

    fn projection() -> Vec<String> {
        vec!["\"id\"".to_string(), "\"name\"".to_string()]
    }

    #[test]
    fn test_clause_order() {
        let cmd = UnloadCommand::new(
            "my_table",
            projection(),
            "s3://my-bucket/here/",
            &credentials(),
            &UnloadOptions::default(),
        )
        .unwrap();

        assert_eq!(
            cmd.sql(),
            "UNLOAD ('SELECT \"id\", \"name\" FROM \"my_table\"')\n\
             TO 's3://my-bucket/here/'\n\
             CREDENTIALS 'aws_access_key_id=foo;aws_secret_access_key=bar'\n\
             MANIFEST\n\
             DELIMITER '\\t'"
        );
    }

    #[test]
    fn test_allow_overwrite_is_last() {
        let options = UnloadOptions {
            allow_overwrite: true,
        };
        let cmd = UnloadCommand::new(
            "my_table",
            projection(),
            "s3://my-bucket/here/",
            &credentials(),
            &options,
        )
        .unwrap();

        let sql = cmd.sql();
        assert!(sql.ends_with("\nALLOWOVERWRITE"));
        assert_eq!(sql.matches("ALLOWOVERWRITE").count(), 1);
    }

    #[test]
    fn test_select_quotes_are_escaped_inside_unload_literal() {
        let cmd = UnloadCommand::new(
            "o'brien",
            vec!["\"it's\"".to_string()],
            "s3://b/p/",
            &credentials(),
            &UnloadOptions::default(),
        )
        .unwrap();

        assert_eq!(cmd.select_statement(), "SELECT \"it's\" FROM \"o'brien\"");
        assert!(cmd
            .sql()
            .starts_with("UNLOAD ('SELECT \"it''s\" FROM \"o''brien\"')"));
    }

    #[test]
    fn test_destination_is_verbatim() {
        let cmd = UnloadCommand::new(
            "t",
            projection(),
            "s3://bucket/no-trailing-slash",
            &credentials(),
            &UnloadOptions::default(),
        )
        .unwrap();
        assert!(cmd.sql().contains("TO 's3://bucket/no-trailing-slash'\n"));
        assert_eq!(cmd.destination(), "s3://bucket/no-trailing-slash");
    }

    #[test]
    fn test_empty_projection_is_rejected() {
        let err = UnloadCommand::new(
            "t",
            Vec::new(),
            "s3://b/",
            &credentials(),
            &UnloadOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, UnloadError::EmptyTable(ref t) if t == "t"));
    }

    #[test]
    fn test_destination_with_backslash_is_rejected() {
        let result = UnloadCommand::new(
            "t",
            projection(),
            "s3://b/\\",
            &credentials(),
            &UnloadOptions::default(),
        );
        assert!(matches!(result, Err(UnloadError::Config(_))));
    }

    #[test]
    fn test_display_and_debug_are_redacted() {
        let cmd = UnloadCommand::new(
            "t",
            projection(),
            "s3://b/",
            &credentials(),
            &UnloadOptions::default(),
        )
        .unwrap();

        let shown = format!("{}", cmd);
        assert!(shown.contains("aws_secret_access_key=[REDACTED]"));
        assert!(!shown.contains("=bar"));
        assert!(!format!("{:?}", cmd).contains("=bar"));
        assert!(cmd.sql().contains("aws_secret_access_key=bar"));
    }
}
