//! Value checkers bound to the registry enumerations
//!
//! Pure predicates only: no coercion of stored data, no mutation. Each
//! enumeration variant maps to exactly one checker.

use serde_json::Value;

use super::types::{Condition, DataType, Row};

/// Largest integer exactly representable in an f64 (2^53 - 1)
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

impl DataType {
    /// Checks that a value's runtime shape matches this data type
    pub fn check(&self, value: &Value) -> bool {
        match self {
            DataType::String => value.is_string(),
            // Numeric, or a string that parses as a number (coercible)
            DataType::Number => match value {
                Value::Number(_) => true,
                Value::String(s) => s.trim().parse::<f64>().is_ok(),
                _ => false,
            },
            DataType::ArrayOfStrings => match value {
                Value::Array(items) => items.iter().all(Value::is_string),
                _ => false,
            },
        }
    }
}

impl Condition {
    /// Returns the predicate bound to this condition
    ///
    /// `checker(stored, target)` — the extension point for future
    /// conditions: add a variant and its arm here.
    pub fn checker(&self) -> fn(&Value, &Value) -> bool {
        match self {
            Condition::Equal => |stored, target| stored == target,
        }
    }
}

/// REQUIRED check: safe integer for numbers, non-empty/non-falsy otherwise
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n
            .as_f64()
            .map(|f| f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER)
            .unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// UNIQUE check: the value must not already appear in `column` across `rows`
pub fn is_unique(value: &Value, column: &str, rows: &[Row]) -> bool {
    !rows.iter().any(|row| row.get(column) == Some(value))
}
