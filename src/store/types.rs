//! Store type definitions
//!
//! Closed enumerations (data types, constraints, where conditions) plus the
//! column and where-clause shapes built from them. Anything outside the
//! enumerations is rejected at schema-creation time.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::errors::SchemaError;

/// A stored row: column name -> JSON value.
pub type Row = serde_json::Map<String, Value>;

/// Supported column data types (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
    /// UTF-8 string
    String,
    /// Numeric value, or a string coercible to one
    Number,
    /// Array whose every element is a string
    ArrayOfStrings,
}

impl DataType {
    /// Returns the wire name for error messages and parsing
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::String => "STRING",
            DataType::Number => "NUMBER",
            DataType::ArrayOfStrings => "ARRAY_OF_STRINGS",
        }
    }

    /// Parses a wire name, rejecting anything outside the enumeration
    pub fn parse(name: &str) -> Result<Self, SchemaError> {
        match name {
            "STRING" => Ok(DataType::String),
            "NUMBER" => Ok(DataType::Number),
            "ARRAY_OF_STRINGS" => Ok(DataType::ArrayOfStrings),
            other => Err(SchemaError::UnknownDataType(other.to_string())),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Supported column constraints (closed set), checked in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Constraint {
    /// Value must be present and non-falsy (safe integer for numbers)
    Required,
    /// Value must not already appear in the column
    Unique,
}

impl Constraint {
    /// Returns the wire name for error messages and parsing
    pub fn as_str(&self) -> &'static str {
        match self {
            Constraint::Required => "REQUIRED",
            Constraint::Unique => "UNIQUE",
        }
    }

    /// Parses a wire name, rejecting anything outside the enumeration
    pub fn parse(name: &str) -> Result<Self, SchemaError> {
        match name {
            "REQUIRED" => Ok(Constraint::Required),
            "UNIQUE" => Ok(Constraint::Unique),
            other => Err(SchemaError::UnknownConstraint(other.to_string())),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Supported where-clause conditions (closed set)
///
/// The condition -> predicate mapping lives in [`Condition::checker`]; new
/// conditions (range, prefix, ...) extend the enum and that mapping only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Condition {
    /// Strict equality, no coercion
    Equal,
}

impl Condition {
    /// Returns the wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Equal => "EQUAL",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Column definition as supplied by callers, wire-shaped
///
/// Data type and constraint names are raw strings here; they are validated
/// against the closed enumerations when the table is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name, unique within a table
    pub name: String,
    /// Wire name of the data type (e.g. "STRING")
    #[serde(rename = "dataType")]
    pub data_type: String,
    /// Wire names of the constraints, in declaration order
    #[serde(default)]
    pub constraints: Vec<String>,
}

impl ColumnSpec {
    pub fn new(name: &str, data_type: &str, constraints: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            data_type: data_type.to_string(),
            constraints: constraints.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Validated column schema held by a table
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data_type: DataType,
    pub constraints: Vec<Constraint>,
}

/// A single filter clause: column, target value, condition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhereClause {
    pub name: String,
    pub value: Value,
    pub condition: Condition,
}

impl WhereClause {
    /// Equality clause on `column == value`
    pub fn equal(column: &str, value: Value) -> Self {
        Self {
            name: column.to_string(),
            value,
            condition: Condition::Equal,
        }
    }
}
