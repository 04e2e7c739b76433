use crate::error::StoreResult;
use crate::row::Row;
use crate::schema::TableSpec;

/// Row storage for mapped entities.
///
/// All implementations must satisfy these invariants:
/// - Every stored row carries its table's key column.
/// - Rows are validated against the table's [`TableSpec`] before they are
///   stored; unknown columns and mismatched cell kinds are rejected.
/// - A missing column is null. Empty collections are never stored.
/// - The store never interprets cell contents.
pub trait RowStore: Send + Sync {
    /// Create a table if it does not exist yet.
    ///
    /// Returns `true` if the table was created by this call.
    fn create_table(&self, spec: &TableSpec) -> StoreResult<bool>;

    /// Remove every row from a table.
    fn truncate(&self, table: &str) -> StoreResult<()>;

    /// Insert semantics: the row's columns overwrite stored ones, columns the
    /// row does not mention keep their stored value.
    fn upsert(&self, table: &str, row: &Row) -> StoreResult<()>;

    /// Update semantics: the row is the full image of the record; stored
    /// columns missing from it are cleared.
    fn replace(&self, table: &str, row: &Row) -> StoreResult<()>;

    /// Read a row by key, optionally restricted to the named columns.
    ///
    /// Returns `Ok(None)` if no row has this key.
    fn select(&self, table: &str, key: &str, columns: Option<&[&str]>) -> StoreResult<Option<Row>>;

    /// Number of rows in a table.
    fn count(&self, table: &str) -> StoreResult<usize>;
}
