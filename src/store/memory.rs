//! In-memory table store
//!
//! Owns every table's schema and row sequence behind one instance; no
//! module-level state. Operations are async at the interface so a
//! persistent backend can be substituted without touching callers, but the
//! in-memory implementation never suspends while holding the lock.
//!
//! Concurrency discipline: a single `RwLock` over the table map gives each
//! table at most one concurrent writer, and readers observe either the
//! pre- or post-mutation row sequence, never a partial one.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use crate::observability::Logger;

use super::checks;
use super::errors::{SchemaError, StoreError, StoreResult};
use super::types::{Column, ColumnSpec, Constraint, Row, WhereClause};

/// The "all columns" selector — the only projection the store supports
pub const ALL_COLUMNS: &str = "*";

/// A single table: immutable ordered schema plus its mutable row sequence
#[derive(Debug)]
struct Table {
    columns: Vec<Column>,
    rows: Vec<Row>,
}

impl Table {
    fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }
}

/// Schema-validated in-memory table store
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Table>>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a table from wire-shaped column definitions.
    ///
    /// Idempotent: if the table already exists the call is a no-op and the
    /// existing schema and rows are left untouched. Fails with
    /// [`SchemaError`] on a duplicate column name or a data type or
    /// constraint outside the closed enumerations; nothing is registered
    /// on failure.
    pub async fn create_table(&self, name: &str, columns: &[ColumnSpec]) -> Result<(), SchemaError> {
        let mut tables = self.tables.write().unwrap();
        if tables.contains_key(name) {
            return Ok(());
        }

        let mut schema = Vec::with_capacity(columns.len());
        let mut seen = HashSet::new();
        for spec in columns {
            if !seen.insert(spec.name.as_str()) {
                return Err(SchemaError::DuplicateColumn(spec.name.clone()));
            }
            let data_type = super::types::DataType::parse(&spec.data_type)?;
            let constraints = spec
                .constraints
                .iter()
                .map(|c| Constraint::parse(c))
                .collect::<Result<Vec<_>, _>>()?;
            schema.push(Column {
                name: spec.name.clone(),
                data_type,
                constraints,
            });
        }

        tables.insert(
            name.to_string(),
            Table {
                columns: schema,
                rows: Vec::new(),
            },
        );
        Logger::info("TABLE_CREATED", &[("table", name)]);
        Ok(())
    }

    /// Validates and appends a row, returning it verbatim.
    ///
    /// Every field must name a schema column; its value must match the
    /// column's data type; constraints run in declaration order and the
    /// first failure aborts with nothing committed. A REQUIRED column that
    /// is absent from the row altogether fails REQUIRED as well.
    pub async fn insert(&self, table: &str, row: Row) -> StoreResult<Row> {
        let mut tables = self.tables.write().unwrap();
        let data = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;

        for (field, value) in &row {
            let column = data.column(field).ok_or_else(|| StoreError::ColumnNotFound {
                table: table.to_string(),
                column: field.clone(),
            })?;
            validate_value(column, value, &data.rows)?;
        }

        for column in &data.columns {
            if column.constraints.contains(&Constraint::Required) && !row.contains_key(&column.name)
            {
                return Err(StoreError::ConstraintViolation {
                    constraint: Constraint::Required,
                    column: column.name.clone(),
                    value: serde_json::Value::Null,
                });
            }
        }

        data.rows.push(row.clone());
        Ok(row)
    }

    /// Validates a patch and merges it into matching rows.
    ///
    /// Clauses apply as sequential passes over the evolving row set: each
    /// pass merges the patch into every row satisfying that clause. The
    /// return value is the most recently merged row from the final pass,
    /// or `None` if no row ever matched. Unmatched rows persist unchanged.
    ///
    /// UNIQUE is checked against the full current row sequence, including
    /// the row about to be overwritten, so updating a row to its own
    /// unique value is rejected.
    pub async fn update(
        &self,
        table: &str,
        patch: &Row,
        clauses: &[WhereClause],
    ) -> StoreResult<Option<Row>> {
        let mut tables = self.tables.write().unwrap();
        let data = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;

        for (field, value) in patch {
            let column = data.column(field).ok_or_else(|| StoreError::ColumnNotFound {
                table: table.to_string(),
                column: field.clone(),
            })?;
            validate_value(column, value, &data.rows)?;
        }

        let mut updated: Option<Row> = None;
        let mut rows = std::mem::take(&mut data.rows);
        for clause in clauses {
            let check = clause.condition.checker();
            rows = rows
                .into_iter()
                .map(|row| {
                    let matched = row
                        .get(&clause.name)
                        .map_or(false, |stored| check(stored, &clause.value));
                    if matched {
                        let mut merged = row;
                        for (field, value) in patch {
                            merged.insert(field.clone(), value.clone());
                        }
                        updated = Some(merged.clone());
                        merged
                    } else {
                        row
                    }
                })
                .collect();
        }
        data.rows = rows;

        Ok(updated)
    }

    /// Returns rows in insertion order.
    ///
    /// Only the `"*"` selector is supported; anything else yields an empty
    /// sequence. Clauses apply as sequential AND-filters, each pass
    /// narrowing the previous pass's survivors.
    pub async fn select(
        &self,
        table: &str,
        columns: &str,
        clauses: Option<&[WhereClause]>,
    ) -> StoreResult<Vec<Row>> {
        let tables = self.tables.read().unwrap();
        let data = tables
            .get(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;

        let mut rows = if columns == ALL_COLUMNS {
            data.rows.clone()
        } else {
            Vec::new()
        };

        if let Some(clauses) = clauses {
            for clause in clauses {
                let check = clause.condition.checker();
                rows.retain(|row| {
                    row.get(&clause.name)
                        .map_or(false, |stored| check(stored, &clause.value))
                });
            }
        }

        Ok(rows)
    }

    /// Removes every row satisfying all clauses.
    ///
    /// Clauses apply as sequential exclusion passes, equivalent to removing
    /// the conjunction. Rows failing any clause are retained.
    pub async fn remove(&self, table: &str, clauses: &[WhereClause]) -> StoreResult<()> {
        let mut tables = self.tables.write().unwrap();
        let data = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;

        for clause in clauses {
            let check = clause.condition.checker();
            data.rows.retain(|row| {
                !row.get(&clause.name)
                    .map_or(false, |stored| check(stored, &clause.value))
            });
        }

        Ok(())
    }
}

/// Runs the data-type checker, then each constraint in declaration order
fn validate_value(column: &Column, value: &serde_json::Value, rows: &[Row]) -> StoreResult<()> {
    if !column.data_type.check(value) {
        return Err(StoreError::InvalidDataType {
            column: column.name.clone(),
            expected: column.data_type,
            value: value.clone(),
        });
    }

    for constraint in &column.constraints {
        let ok = match constraint {
            Constraint::Required => checks::is_present(value),
            Constraint::Unique => checks::is_unique(value, &column.name, rows),
        };
        if !ok {
            return Err(StoreError::ConstraintViolation {
                constraint: *constraint,
                column: column.name.clone(),
                value: value.clone(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn users_columns() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("id", "STRING", &["REQUIRED", "UNIQUE"]),
            ColumnSpec::new("age", "NUMBER", &["REQUIRED"]),
        ]
    }

    fn row(pairs: &[(&str, serde_json::Value)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_create_table_is_idempotent() {
        let store = MemoryStore::new();
        store.create_table("users", &users_columns()).await.unwrap();
        store
            .insert("users", row(&[("id", json!("a")), ("age", json!(30))]))
            .await
            .unwrap();

        // Second create must not touch schema or rows
        store.create_table("users", &users_columns()).await.unwrap();
        let rows = store.select("users", ALL_COLUMNS, None).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_create_table_rejects_duplicate_column() {
        let store = MemoryStore::new();
        let columns = vec![
            ColumnSpec::new("id", "STRING", &[]),
            ColumnSpec::new("id", "NUMBER", &[]),
        ];
        assert!(matches!(
            store.create_table("t", &columns).await,
            Err(SchemaError::DuplicateColumn(name)) if name == "id"
        ));
    }

    #[tokio::test]
    async fn test_create_table_rejects_unknown_type_and_constraint() {
        let store = MemoryStore::new();
        let bad_type = vec![ColumnSpec::new("id", "BLOB", &[])];
        assert!(matches!(
            store.create_table("t", &bad_type).await,
            Err(SchemaError::UnknownDataType(_))
        ));

        let bad_constraint = vec![ColumnSpec::new("id", "STRING", &["PRIMARY"])];
        assert!(matches!(
            store.create_table("t", &bad_constraint).await,
            Err(SchemaError::UnknownConstraint(_))
        ));
    }

    #[tokio::test]
    async fn test_insert_unknown_table() {
        let store = MemoryStore::new();
        let err = store.insert("ghosts", Row::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::TableNotFound(name) if name == "ghosts"));
    }

    #[tokio::test]
    async fn test_insert_unknown_column() {
        let store = MemoryStore::new();
        store.create_table("users", &users_columns()).await.unwrap();
        let err = store
            .insert(
                "users",
                row(&[("id", json!("a")), ("age", json!(1)), ("email", json!("x"))]),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ColumnNotFound { column, .. } if column == "email"));
    }

    #[tokio::test]
    async fn test_insert_type_mismatch() {
        let store = MemoryStore::new();
        store.create_table("users", &users_columns()).await.unwrap();
        let err = store
            .insert("users", row(&[("id", json!(5)), ("age", json!(30))]))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidDataType { column, .. } if column == "id"));
    }

    #[tokio::test]
    async fn test_missing_required_field_fails() {
        let store = MemoryStore::new();
        store.create_table("users", &users_columns()).await.unwrap();
        let err = store
            .insert("users", row(&[("id", json!("a"))]))
            .await
            .unwrap_err();
        assert_eq!(err.constraint(), Some(Constraint::Required));
    }

    #[tokio::test]
    async fn test_unique_violation_on_second_insert() {
        let store = MemoryStore::new();
        store.create_table("users", &users_columns()).await.unwrap();
        store
            .insert("users", row(&[("id", json!("a")), ("age", json!(30))]))
            .await
            .unwrap();
        let err = store
            .insert("users", row(&[("id", json!("a")), ("age", json!(40))]))
            .await
            .unwrap_err();
        match err {
            StoreError::ConstraintViolation {
                constraint, column, ..
            } => {
                assert_eq!(constraint, Constraint::Unique);
                assert_eq!(column, "id");
            }
            other => panic!("expected constraint violation, got {other:?}"),
        }
        // Failed insert must not have committed anything
        let rows = store.select("users", ALL_COLUMNS, None).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_select_preserves_insertion_order() {
        let store = MemoryStore::new();
        store.create_table("users", &users_columns()).await.unwrap();
        for i in 0..5 {
            store
                .insert(
                    "users",
                    row(&[("id", json!(format!("u{i}"))), ("age", json!(20 + i))]),
                )
                .await
                .unwrap();
        }
        let rows = store.select("users", ALL_COLUMNS, None).await.unwrap();
        let ids: Vec<_> = rows.iter().map(|r| r["id"].as_str().unwrap()).collect();
        assert_eq!(ids, ["u0", "u1", "u2", "u3", "u4"]);
    }

    #[tokio::test]
    async fn test_select_with_non_star_selector_yields_nothing() {
        let store = MemoryStore::new();
        store.create_table("users", &users_columns()).await.unwrap();
        store
            .insert("users", row(&[("id", json!("a")), ("age", json!(30))]))
            .await
            .unwrap();
        let rows = store.select("users", "id", None).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_select_filters_with_equal_clause() {
        let store = MemoryStore::new();
        store.create_table("users", &users_columns()).await.unwrap();
        store
            .insert("users", row(&[("id", json!("a")), ("age", json!(30))]))
            .await
            .unwrap();
        store
            .insert("users", row(&[("id", json!("b")), ("age", json!(30))]))
            .await
            .unwrap();
        store
            .insert("users", row(&[("id", json!("c")), ("age", json!(40))]))
            .await
            .unwrap();

        let clauses = [
            WhereClause::equal("age", json!(30)),
            WhereClause::equal("id", json!("b")),
        ];
        let rows = store
            .select("users", ALL_COLUMNS, Some(&clauses))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], json!("b"));
    }

    #[tokio::test]
    async fn test_update_returns_last_merged_row() {
        let store = MemoryStore::new();
        store.create_table("users", &users_columns()).await.unwrap();
        store
            .insert("users", row(&[("id", json!("a")), ("age", json!(30))]))
            .await
            .unwrap();
        store
            .insert("users", row(&[("id", json!("b")), ("age", json!(30))]))
            .await
            .unwrap();

        let patch = row(&[("age", json!(35))]);
        let clauses = [WhereClause::equal("age", json!(30))];
        let updated = store.update("users", &patch, &clauses).await.unwrap();

        // Both rows matched; the most recently merged one comes back
        let updated = updated.unwrap();
        assert_eq!(updated["id"], json!("b"));
        assert_eq!(updated["age"], json!(35));

        let rows = store.select("users", ALL_COLUMNS, None).await.unwrap();
        assert!(rows.iter().all(|r| r["age"] == json!(35)));
    }

    #[tokio::test]
    async fn test_update_without_match_returns_none_and_keeps_rows() {
        let store = MemoryStore::new();
        store.create_table("users", &users_columns()).await.unwrap();
        store
            .insert("users", row(&[("id", json!("a")), ("age", json!(30))]))
            .await
            .unwrap();

        let patch = row(&[("age", json!(99))]);
        let clauses = [WhereClause::equal("id", json!("missing"))];
        let updated = store.update("users", &patch, &clauses).await.unwrap();
        assert!(updated.is_none());

        let rows = store.select("users", ALL_COLUMNS, None).await.unwrap();
        assert_eq!(rows[0]["age"], json!(30));
    }

    #[tokio::test]
    async fn test_update_to_own_unique_value_is_rejected() {
        // Inherited behavior: UNIQUE scans all current rows, including the
        // row being overwritten.
        let store = MemoryStore::new();
        store.create_table("users", &users_columns()).await.unwrap();
        store
            .insert("users", row(&[("id", json!("a")), ("age", json!(30))]))
            .await
            .unwrap();

        let patch = row(&[("id", json!("a"))]);
        let clauses = [WhereClause::equal("id", json!("a"))];
        let err = store.update("users", &patch, &clauses).await.unwrap_err();
        assert_eq!(err.constraint(), Some(Constraint::Unique));
    }

    #[tokio::test]
    async fn test_remove_is_precise() {
        let store = MemoryStore::new();
        store.create_table("users", &users_columns()).await.unwrap();
        store
            .insert("users", row(&[("id", json!("a")), ("age", json!(30))]))
            .await
            .unwrap();
        store
            .insert("users", row(&[("id", json!("b")), ("age", json!(30))]))
            .await
            .unwrap();
        store
            .insert("users", row(&[("id", json!("c")), ("age", json!(40))]))
            .await
            .unwrap();

        store
            .remove("users", &[WhereClause::equal("age", json!(30))])
            .await
            .unwrap();

        let rows = store.select("users", ALL_COLUMNS, None).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], json!("c"));
    }
}
