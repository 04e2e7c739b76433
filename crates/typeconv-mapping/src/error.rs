use typeconv_registry::RegistryError;

use crate::schema::ColumnKind;

/// Errors from row store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The table has not been created in this keyspace.
    #[error("table not found: {0}")]
    TableNotFound(String),

    /// The row or projection names a column the table does not declare.
    #[error("unknown column {column} in table {table}")]
    UnknownColumn { table: String, column: String },

    /// A cell does not match the declared column kind.
    #[error("column {column} in table {table} expects {expected}, got {actual}")]
    KindMismatch {
        table: String,
        column: String,
        expected: ColumnKind,
        actual: ColumnKind,
    },

    /// The row has no value for the table's key column.
    #[error("row for table {table} has no key column {column}")]
    MissingKey { table: String, column: String },

    /// The keyspace name is not usable.
    #[error("invalid keyspace name {name:?}: {reason}")]
    InvalidKeyspace { name: String, reason: String },

    /// An internal lock was poisoned by a panicking writer.
    #[error("lock poisoned: {0}")]
    Lock(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised while mapping entities to and from rows.
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A registered custom converter failed, or registration was invalid.
    #[error("conversion error: {0}")]
    Conversion(#[from] RegistryError),

    /// The default (non-custom) conversion path failed.
    #[error("default conversion failed for column {column}: {reason}")]
    Default { column: String, reason: String },

    /// A required column was null.
    #[error("column {0} is null")]
    MissingColumn(String),

    /// A column held a different cell kind than the entity expects.
    #[error("column {column} holds a {actual} cell, expected {expected}")]
    UnexpectedCell {
        column: String,
        expected: ColumnKind,
        actual: ColumnKind,
    },
}

impl MappingError {
    pub(crate) fn default_path(column: &str, reason: impl ToString) -> Self {
        Self::Default {
            column: column.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result alias for mapping operations.
pub type MappingResult<T> = Result<T, MappingError>;
