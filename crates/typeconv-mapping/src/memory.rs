//! In-memory keyspace for tests and ephemeral use.
//!
//! [`InMemoryKeyspace`] keeps every table in a `HashMap` protected by a
//! `RwLock`. It implements the full [`RowStore`] trait, including schema
//! validation, so mapping code sees the same failures it would from a real
//! backend.

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use crate::config::KeyspaceConfig;
use crate::error::{StoreError, StoreResult};
use crate::row::{Cell, Row};
use crate::schema::TableSpec;
use crate::traits::RowStore;

#[derive(Debug)]
struct Table {
    spec: TableSpec,
    rows: BTreeMap<String, Row>,
}

impl Table {
    /// Validate a row against the table layout and return its key.
    fn check_row(&self, row: &Row) -> StoreResult<String> {
        for (column, cell) in row.columns() {
            let spec = self
                .spec
                .find(column)
                .ok_or_else(|| StoreError::UnknownColumn {
                    table: self.spec.name.clone(),
                    column: column.to_string(),
                })?;
            if spec.kind != cell.kind() {
                return Err(StoreError::KindMismatch {
                    table: self.spec.name.clone(),
                    column: column.to_string(),
                    expected: spec.kind,
                    actual: cell.kind(),
                });
            }
        }
        row.text(&self.spec.key_column)
            .map(str::to_string)
            .ok_or_else(|| StoreError::MissingKey {
                table: self.spec.name.clone(),
                column: self.spec.key_column.clone(),
            })
    }

    fn check_projection(&self, columns: &[&str]) -> StoreResult<()> {
        match columns.iter().find(|c| self.spec.find(c).is_none()) {
            Some(unknown) => Err(StoreError::UnknownColumn {
                table: self.spec.name.clone(),
                column: unknown.to_string(),
            }),
            None => Ok(()),
        }
    }
}

fn is_empty_collection(cell: &Cell) -> bool {
    matches!(cell, Cell::List(_) | Cell::Set(_)) && cell.is_empty()
}

/// An in-memory implementation of [`RowStore`].
///
/// Data is lost when the keyspace is dropped.
#[derive(Debug)]
pub struct InMemoryKeyspace {
    name: String,
    tables: RwLock<HashMap<String, Table>>,
}

impl InMemoryKeyspace {
    /// Open an empty keyspace after validating its name.
    pub fn open(config: &KeyspaceConfig) -> StoreResult<Self> {
        config.validate()?;
        info!(keyspace = %config.name, "keyspace opened");
        Ok(Self {
            name: config.name.clone(),
            tables: RwLock::new(HashMap::new()),
        })
    }

    /// The keyspace name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of all tables, sorted.
    pub fn table_names(&self) -> StoreResult<Vec<String>> {
        let tables = self.read_tables()?;
        let mut names: Vec<String> = tables.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    /// Drop a table and its rows. Returns `true` if it existed.
    pub fn drop_table(&self, table: &str) -> StoreResult<bool> {
        let mut tables = self.write_tables()?;
        Ok(tables.remove(table).is_some())
    }

    fn read_tables(&self) -> StoreResult<RwLockReadGuard<'_, HashMap<String, Table>>> {
        self.tables
            .read()
            .map_err(|e| StoreError::Lock(e.to_string()))
    }

    fn write_tables(&self) -> StoreResult<RwLockWriteGuard<'_, HashMap<String, Table>>> {
        self.tables
            .write()
            .map_err(|e| StoreError::Lock(e.to_string()))
    }
}

fn table_mut<'a>(tables: &'a mut HashMap<String, Table>, name: &str) -> StoreResult<&'a mut Table> {
    tables
        .get_mut(name)
        .ok_or_else(|| StoreError::TableNotFound(name.to_string()))
}

impl RowStore for InMemoryKeyspace {
    fn create_table(&self, spec: &TableSpec) -> StoreResult<bool> {
        let mut tables = self.write_tables()?;
        if tables.contains_key(&spec.name) {
            return Ok(false);
        }
        debug!(keyspace = %self.name, table = %spec.name, "table created");
        tables.insert(
            spec.name.clone(),
            Table {
                spec: spec.clone(),
                rows: BTreeMap::new(),
            },
        );
        Ok(true)
    }

    fn truncate(&self, table: &str) -> StoreResult<()> {
        let mut tables = self.write_tables()?;
        let t = table_mut(&mut tables, table)?;
        debug!(table, removed = t.rows.len(), "table truncated");
        t.rows.clear();
        Ok(())
    }

    fn upsert(&self, table: &str, row: &Row) -> StoreResult<()> {
        let mut tables = self.write_tables()?;
        let t = table_mut(&mut tables, table)?;
        let key = t.check_row(row)?;
        let stored = t.rows.entry(key).or_default();
        for (column, cell) in row.columns() {
            if is_empty_collection(cell) {
                stored.clear(column);
            } else {
                stored.set(column, cell.clone());
            }
        }
        Ok(())
    }

    fn replace(&self, table: &str, row: &Row) -> StoreResult<()> {
        let mut tables = self.write_tables()?;
        let t = table_mut(&mut tables, table)?;
        let key = t.check_row(row)?;
        let mut image = Row::new();
        for (column, cell) in row.columns().filter(|(_, cell)| !is_empty_collection(cell)) {
            image.set(column, cell.clone());
        }
        t.rows.insert(key, image);
        Ok(())
    }

    fn select(&self, table: &str, key: &str, columns: Option<&[&str]>) -> StoreResult<Option<Row>> {
        let tables = self.read_tables()?;
        let t = tables
            .get(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;
        if let Some(columns) = columns {
            t.check_projection(columns)?;
        }
        Ok(t.rows.get(key).map(|row| match columns {
            Some(columns) => row.project(columns),
            None => row.clone(),
        }))
    }

    fn count(&self, table: &str) -> StoreResult<usize> {
        let tables = self.read_tables()?;
        tables
            .get(table)
            .map(|t| t.rows.len())
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::schema::ColumnKind;

    fn employee_table() -> TableSpec {
        TableSpec::new("employee", "id")
            .column("person", ColumnKind::Text)
            .column("friends", ColumnKind::List)
            .column("people", ColumnKind::Set)
    }

    fn keyspace() -> InMemoryKeyspace {
        let ks = InMemoryKeyspace::open(&KeyspaceConfig::default()).unwrap();
        assert!(ks.create_table(&employee_table()).unwrap());
        ks
    }

    #[test]
    fn open_rejects_invalid_name() {
        let err = InMemoryKeyspace::open(&KeyspaceConfig::named("bad-name")).unwrap_err();
        assert!(matches!(err, StoreError::InvalidKeyspace { .. }));
    }

    #[test]
    fn create_table_is_idempotent() {
        let ks = keyspace();
        assert!(!ks.create_table(&employee_table()).unwrap());
        assert_eq!(ks.table_names().unwrap(), vec!["employee".to_string()]);
    }

    #[test]
    fn upsert_merges_columns() {
        let ks = keyspace();
        ks.upsert("employee", &Row::new().with("id", "e1").with("person", "p1"))
            .unwrap();
        ks.upsert(
            "employee",
            &Row::new().with("id", "e1").with("friends", vec!["f".to_string()]),
        )
        .unwrap();

        let row = ks.select("employee", "e1", None).unwrap().unwrap();
        assert_eq!(row.text("person"), Some("p1"));
        assert_eq!(row.list("friends").map(<[String]>::len), Some(1));
        assert_eq!(ks.count("employee").unwrap(), 1);
    }

    #[test]
    fn replace_clears_missing_columns() {
        let ks = keyspace();
        ks.upsert("employee", &Row::new().with("id", "e1").with("person", "p1"))
            .unwrap();
        ks.replace(
            "employee",
            &Row::new().with("id", "e1").with("friends", vec!["f".to_string()]),
        )
        .unwrap();

        let row = ks.select("employee", "e1", None).unwrap().unwrap();
        assert!(!row.contains("person"));
        assert!(row.contains("friends"));
    }

    #[test]
    fn empty_collections_are_stored_as_null() {
        let ks = keyspace();
        ks.upsert(
            "employee",
            &Row::new()
                .with("id", "e1")
                .with("people", BTreeSet::<String>::new()),
        )
        .unwrap();
        let row = ks.select("employee", "e1", None).unwrap().unwrap();
        assert!(!row.contains("people"));
    }

    #[test]
    fn rejects_unknown_column_and_kind_mismatch() {
        let ks = keyspace();
        let err = ks
            .upsert("employee", &Row::new().with("id", "e1").with("salary", "1"))
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownColumn { .. }));

        let err = ks
            .upsert("employee", &Row::new().with("id", "e1").with("friends", "x"))
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::KindMismatch {
                expected: ColumnKind::List,
                actual: ColumnKind::Text,
                ..
            }
        ));
    }

    #[test]
    fn rejects_row_without_key() {
        let ks = keyspace();
        let err = ks
            .upsert("employee", &Row::new().with("person", "p"))
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingKey { .. }));
    }

    #[test]
    fn select_projects_columns() {
        let ks = keyspace();
        ks.upsert(
            "employee",
            &Row::new()
                .with("id", "e1")
                .with("person", "p")
                .with("friends", vec!["f".to_string()]),
        )
        .unwrap();

        let row = ks
            .select("employee", "e1", Some(&["id", "person"]))
            .unwrap()
            .unwrap();
        assert_eq!(row.len(), 2);

        let err = ks
            .select("employee", "e1", Some(&["id", "salary"]))
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownColumn { .. }));
        assert!(ks.select("employee", "missing", None).unwrap().is_none());
    }

    #[test]
    fn truncate_and_drop() {
        let ks = keyspace();
        ks.upsert("employee", &Row::new().with("id", "e1")).unwrap();
        ks.truncate("employee").unwrap();
        assert_eq!(ks.count("employee").unwrap(), 0);

        assert!(ks.drop_table("employee").unwrap());
        assert!(matches!(
            ks.count("employee").unwrap_err(),
            StoreError::TableNotFound(_)
        ));
    }
}
