use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::schema::ColumnKind;

/// A stored column value. A null column is represented by its absence from
/// the [`Row`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    List(Vec<String>),
    Set(BTreeSet<String>),
}

impl Cell {
    pub fn kind(&self) -> ColumnKind {
        match self {
            Self::Text(_) => ColumnKind::Text,
            Self::List(_) => ColumnKind::List,
            Self::Set(_) => ColumnKind::Set,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Number of elements; a text cell counts as one.
    pub fn len(&self) -> usize {
        match self {
            Self::Text(_) => 1,
            Self::List(items) => items.len(),
            Self::Set(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for Cell {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<BTreeSet<String>> for Cell {
    fn from(value: BTreeSet<String>) -> Self {
        Self::Set(value)
    }
}

/// One stored record: column name to cell, ordered by column name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Row {
    columns: BTreeMap<String, Cell>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column (builder style).
    pub fn with(mut self, column: impl Into<String>, cell: impl Into<Cell>) -> Self {
        self.set(column, cell);
        self
    }

    pub fn set(&mut self, column: impl Into<String>, cell: impl Into<Cell>) {
        self.columns.insert(column.into(), cell.into());
    }

    /// Null out a column, returning its previous value.
    pub fn clear(&mut self, column: &str) -> Option<Cell> {
        self.columns.remove(column)
    }

    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.columns.get(column)
    }

    pub fn text(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(Cell::as_text)
    }

    pub fn list(&self, column: &str) -> Option<&[String]> {
        match self.get(column) {
            Some(Cell::List(items)) => Some(items),
            _ => None,
        }
    }

    pub fn set_items(&self, column: &str) -> Option<&BTreeSet<String>> {
        match self.get(column) {
            Some(Cell::Set(items)) => Some(items),
            _ => None,
        }
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Keep only the named columns.
    pub fn project(&self, columns: &[&str]) -> Row {
        Row {
            columns: self
                .columns
                .iter()
                .filter(|(name, _)| columns.contains(&name.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_and_accessors() {
        let people: BTreeSet<String> = ["apu".to_string()].into_iter().collect();
        let row = Row::new()
            .with("id", "employee-id")
            .with("friends", vec!["a".to_string(), "b".to_string()])
            .with("people", people);

        assert_eq!(row.text("id"), Some("employee-id"));
        assert_eq!(row.list("friends").map(<[String]>::len), Some(2));
        assert_eq!(row.set_items("people").map(BTreeSet::len), Some(1));
        assert!(row.text("friends").is_none());
        assert!(!row.contains("person"));
    }

    #[test]
    fn projection_keeps_requested_columns() {
        let row = Row::new()
            .with("id", "e1")
            .with("person", "{}")
            .with("friends", Vec::<String>::new());
        let projected = row.project(&["id", "person", "salary"]);
        assert_eq!(projected.len(), 2);
        assert!(projected.contains("person"));
        assert!(!projected.contains("friends"));
    }

    #[test]
    fn clear_removes_column() {
        let mut row = Row::new().with("person", "{}");
        assert_eq!(row.clear("person"), Some(Cell::from("{}")));
        assert!(row.is_empty());
    }

    #[test]
    fn serializes_as_plain_json_object() {
        let row = Row::new()
            .with("id", "e1")
            .with("friends", vec!["x".to_string()]);
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"friends":["x"],"id":"e1"}"#);
    }

    #[test]
    fn cell_kinds() {
        assert_eq!(Cell::from("x").kind(), ColumnKind::Text);
        assert_eq!(Cell::List(vec![]).kind(), ColumnKind::List);
        assert!(Cell::Set(BTreeSet::new()).is_empty());
    }
}
