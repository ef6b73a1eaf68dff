//! Schema-validated in-memory table store
//!
//! Tables are created once with an immutable column schema; rows are
//! validated on every write against a closed set of data types and
//! constraints, checked in declaration order.
//!
//! # Design Principles
//!
//! - Closed enumerations for data types, constraints, and conditions
//! - Fail-fast validation, no partial writes
//! - Append-only row ordering, preserved by `select`
//! - No module-level state: the store is an explicit instance

mod checks;
mod errors;
mod memory;
mod types;

pub use errors::{SchemaError, StoreError, StoreResult};
pub use memory::{MemoryStore, ALL_COLUMNS};
pub use types::{Column, ColumnSpec, Condition, Constraint, DataType, Row, WhereClause};
