//! Store error types
//!
//! All validation failures are fail-fast: the first violation aborts the
//! operation and nothing is committed. Every error is terminal for the
//! operation; the calling layer decides user-visible status codes.

use serde_json::Value;
use thiserror::Error;

use super::types::{Constraint, DataType};

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised while validating a table definition
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// A column name appears more than once in the definition
    #[error("duplicate column '{0}' in table definition")]
    DuplicateColumn(String),

    /// Data type name outside the closed enumeration
    #[error("invalid data type '{0}'")]
    UnknownDataType(String),

    /// Constraint name outside the closed enumeration
    #[error("invalid constraint '{0}'")]
    UnknownConstraint(String),
}

/// Errors raised by table store operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// Table definition rejected
    #[error("{0}")]
    Schema(#[from] SchemaError),

    /// Operation against an unregistered table (programmer error at runtime)
    #[error("table '{0}' does not exist")]
    TableNotFound(String),

    /// Row field that is not part of the table schema
    #[error("column '{column}' does not exist in table '{table}'")]
    ColumnNotFound { table: String, column: String },

    /// Value shape does not match the column's data type
    #[error("invalid {expected} value for column '{column}': {value}")]
    InvalidDataType {
        column: String,
        expected: DataType,
        value: Value,
    },

    /// First failing constraint, checked in declaration order
    #[error("{constraint} constraint failed on column '{column}': {value}")]
    ConstraintViolation {
        constraint: Constraint,
        column: String,
        value: Value,
    },
}

impl StoreError {
    /// Returns the violated constraint, if this is a constraint failure
    pub fn constraint(&self) -> Option<Constraint> {
        match self {
            StoreError::ConstraintViolation { constraint, .. } => Some(*constraint),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_constraint_violation_names_constraint_and_column() {
        let err = StoreError::ConstraintViolation {
            constraint: Constraint::Unique,
            column: "id".to_string(),
            value: json!("a"),
        };
        let display = format!("{}", err);
        assert!(display.contains("UNIQUE"));
        assert!(display.contains("id"));
        assert!(display.contains("\"a\""));
        assert_eq!(err.constraint(), Some(Constraint::Unique));
    }

    #[test]
    fn test_schema_error_converts_to_store_error() {
        let err: StoreError = SchemaError::UnknownDataType("BLOB".to_string()).into();
        assert!(matches!(err, StoreError::Schema(_)));
    }
}
