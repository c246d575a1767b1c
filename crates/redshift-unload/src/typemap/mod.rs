//! Per-type select expressions for unloaded columns.
//!
//! Most columns unload as-is. Types the downstream warehouse cannot load from
//! Redshift's text rendering get a conversion expression instead. Rules live
//! in a [`ConversionRegistry`], so supporting a new type means registering a
//! rule rather than touching the builder.

use crate::core::identifier::quote_ident;
use crate::core::schema::ColumnDescriptor;
use crate::error::Result;

/// A single type conversion.
#[derive(Debug, Clone, Copy)]
pub struct ConversionRule {
    /// Short name used in diagnostics.
    pub name: &'static str,

    /// Whether the rule applies to a base type (lowercase, parameters stripped).
    pub matches: fn(&str) -> bool,

    /// Build the select expression from the column and its quoted identifier.
    pub expression: fn(&ColumnDescriptor, &str) -> String,
}

/// Ordered set of conversion rules. The first match wins.
#[derive(Debug, Clone, Default)]
pub struct ConversionRegistry {
    rules: Vec<ConversionRule>,
}

impl ConversionRegistry {
    /// Create an empty registry; every column projects unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in Redshift rules registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(BOOLEAN_AS_INTEGER);
        registry
    }

    /// Append a rule. Earlier rules take precedence.
    pub fn register(&mut self, rule: ConversionRule) {
        self.rules.push(rule);
    }

    /// Registered rules in precedence order.
    pub fn rules(&self) -> &[ConversionRule] {
        &self.rules
    }

    /// Find the rule for a column, if any.
    pub fn rule_for(&self, column: &ColumnDescriptor) -> Option<&ConversionRule> {
        let base_type = column.base_type();
        self.rules.iter().find(|rule| (rule.matches)(&base_type))
    }

    /// Select expression for a column: its quoted identifier, or the
    /// conversion expression of the first matching rule.
    pub fn select_expression(&self, column: &ColumnDescriptor) -> Result<String> {
        let quoted = quote_ident(&column.name)?;
        Ok(match self.rule_for(column) {
            Some(rule) => (rule.expression)(column, &quoted),
            None => quoted,
        })
    }
}

/// Booleans unload as `1`/`0`.
pub const BOOLEAN_AS_INTEGER: ConversionRule = ConversionRule {
    name: "boolean",
    matches: is_boolean,
    expression: boolean_expression,
};

fn is_boolean(base_type: &str) -> bool {
    matches!(base_type, "boolean" | "bool")
}

// A nullable column needs both branches spelled out so NULL falls through
// the CASE and stays NULL.
fn boolean_expression(column: &ColumnDescriptor, quoted: &str) -> String {
    if column.nullable {
        format!(
            "(CASE WHEN {0} THEN 1 WHEN NOT {0} THEN 0 END)",
            quoted
        )
    } else {
        format!("(CASE WHEN {} THEN 1 ELSE 0 END)", quoted)
    }
}
