//! Field-level conversion between entity values and row cells.
//!
//! Every value is first offered to the [`ConversionRegistry`]. When the
//! registry has no custom converter for the value's type, the default path
//! applies: strings are stored as-is and any other serde value is stored as
//! its JSON text.

use std::any::Any;
use std::collections::{BTreeSet, HashSet};
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;
use typeconv_registry::{ConversionRegistry, RegistryError};

use crate::error::{MappingError, MappingResult};
use crate::row::{Cell, Row};
use crate::schema::ColumnKind;

fn encode<T>(registry: &ConversionRegistry, column: &str, value: &T) -> MappingResult<String>
where
    T: Any + Serialize,
{
    match registry.convert_for_write(value) {
        Ok(stored) => Ok(stored),
        Err(RegistryError::NoConverter { .. }) => match serde_json::to_value(value) {
            Ok(Value::String(s)) => Ok(s),
            Ok(other) => Ok(other.to_string()),
            Err(e) => Err(MappingError::default_path(column, e)),
        },
        Err(e) => Err(e.into()),
    }
}

/// Inverse of [`encode`]. On the default path the stored text is parsed as
/// JSON first; only when that fails, or when the parsed value would itself
/// have been written as a bare string, is the text taken as a string.
fn decode<T>(registry: &ConversionRegistry, column: &str, stored: &str) -> MappingResult<Option<T>>
where
    T: Any + Serialize + DeserializeOwned,
{
    match registry.read::<T>(stored) {
        Ok(value) => Ok(value),
        Err(RegistryError::NoConverter { .. }) => match serde_json::from_str::<T>(stored) {
            Ok(value) if !encodes_as_string(&value) => Ok(Some(value)),
            _ => serde_json::from_value::<T>(Value::String(stored.to_string()))
                .map(Some)
                .map_err(|e| MappingError::default_path(column, e)),
        },
        Err(e) => Err(e.into()),
    }
}

fn encodes_as_string<T: Serialize>(value: &T) -> bool {
    matches!(serde_json::to_value(value), Ok(Value::String(_)))
}

// ---------------------------------------------------------------------------
// RowWriter
// ---------------------------------------------------------------------------

/// Builds a [`Row`] from entity fields.
///
/// `None` scalars and empty collections leave the column null.
pub struct RowWriter<'a> {
    registry: &'a ConversionRegistry,
    row: Row,
}

impl<'a> RowWriter<'a> {
    pub fn new(registry: &'a ConversionRegistry) -> Self {
        Self {
            registry,
            row: Row::new(),
        }
    }

    /// Write the key column. Keys never go through custom conversion.
    pub fn put_key(&mut self, column: &str, key: &str) -> &mut Self {
        self.row.set(column, key);
        self
    }

    /// Write a scalar field.
    pub fn put<T>(&mut self, column: &str, value: Option<&T>) -> MappingResult<&mut Self>
    where
        T: Any + Serialize,
    {
        if let Some(value) = value {
            let stored = encode(self.registry, column, value)?;
            self.row.set(column, stored);
        }
        Ok(self)
    }

    /// Write an ordered collection, converting element by element.
    pub fn put_list<'v, T, I>(&mut self, column: &str, values: I) -> MappingResult<&mut Self>
    where
        T: Any + Serialize + 'v,
        I: IntoIterator<Item = &'v T>,
    {
        let items = values
            .into_iter()
            .map(|v| encode(self.registry, column, v))
            .collect::<MappingResult<Vec<String>>>()?;
        if !items.is_empty() {
            self.row.set(column, Cell::List(items));
        }
        Ok(self)
    }

    /// Write a set-typed collection, converting element by element.
    pub fn put_set<'v, T, I>(&mut self, column: &str, values: I) -> MappingResult<&mut Self>
    where
        T: Any + Serialize + 'v,
        I: IntoIterator<Item = &'v T>,
    {
        let items = values
            .into_iter()
            .map(|v| encode(self.registry, column, v))
            .collect::<MappingResult<BTreeSet<String>>>()?;
        if !items.is_empty() {
            self.row.set(column, Cell::Set(items));
        }
        Ok(self)
    }

    pub fn finish(self) -> Row {
        self.row
    }
}

// ---------------------------------------------------------------------------
// RowReader
// ---------------------------------------------------------------------------

/// Reads entity fields back out of a [`Row`].
pub struct RowReader<'a> {
    registry: &'a ConversionRegistry,
    row: &'a Row,
}

impl<'a> RowReader<'a> {
    pub fn new(registry: &'a ConversionRegistry, row: &'a Row) -> Self {
        Self { registry, row }
    }

    /// Read the key column.
    pub fn key(&self, column: &str) -> MappingResult<String> {
        match self.row.get(column) {
            Some(Cell::Text(key)) => Ok(key.clone()),
            Some(other) => Err(unexpected(column, ColumnKind::Text, other)),
            None => Err(MappingError::MissingColumn(column.to_string())),
        }
    }

    /// Read a scalar field. A null column, or a stored value the converter
    /// treats as absent, yields `None`.
    pub fn get<T>(&self, column: &str) -> MappingResult<Option<T>>
    where
        T: Any + Serialize + DeserializeOwned,
    {
        match self.row.get(column) {
            Some(Cell::Text(stored)) => decode(self.registry, column, stored),
            Some(other) => Err(unexpected(column, ColumnKind::Text, other)),
            None => Ok(None),
        }
    }

    /// Read an ordered collection, preserving element order.
    pub fn get_list<T>(&self, column: &str) -> MappingResult<Vec<T>>
    where
        T: Any + Serialize + DeserializeOwned,
    {
        match self.row.get(column) {
            Some(Cell::List(items)) => self.decode_all::<T, _>(column, items),
            Some(other) => Err(unexpected(column, ColumnKind::List, other)),
            None => Ok(Vec::new()),
        }
    }

    /// Read a set-typed collection; equal elements collapse into one.
    pub fn get_set<T>(&self, column: &str) -> MappingResult<HashSet<T>>
    where
        T: Any + Serialize + DeserializeOwned + Eq + Hash,
    {
        match self.row.get(column) {
            Some(Cell::Set(items)) => Ok(self.decode_all::<T, _>(column, items)?.into_iter().collect()),
            Some(other) => Err(unexpected(column, ColumnKind::Set, other)),
            None => Ok(HashSet::new()),
        }
    }

    fn decode_all<'s, T, I>(&self, column: &str, items: I) -> MappingResult<Vec<T>>
    where
        T: Any + Serialize + DeserializeOwned,
        I: IntoIterator<Item = &'s String>,
    {
        let mut decoded = Vec::new();
        for stored in items {
            match decode::<T>(self.registry, column, stored)? {
                Some(value) => decoded.push(value),
                None => warn!(column, "skipping absent collection element"),
            }
        }
        Ok(decoded)
    }
}

fn unexpected(column: &str, expected: ColumnKind, actual: &Cell) -> MappingError {
    MappingError::UnexpectedCell {
        column: column.to_string(),
        expected,
        actual: actual.kind(),
    }
}
