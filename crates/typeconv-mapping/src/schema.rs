use std::fmt;

use serde::{Deserialize, Serialize};

/// Shape of a column's stored value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// A single string.
    Text,
    /// An ordered sequence of strings.
    List,
    /// A deduplicated set of strings.
    Set,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::List => f.write_str("list<text>"),
            Self::Set => f.write_str("set<text>"),
        }
    }
}

/// A declared column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Table layout used to validate rows.
///
/// The key column is always [`ColumnKind::Text`] and is listed first in
/// [`TableSpec::columns`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSpec {
    pub name: String,
    pub key_column: String,
    pub columns: Vec<ColumnSpec>,
}

impl TableSpec {
    /// Start a table with a text key column.
    pub fn new(name: impl Into<String>, key_column: impl Into<String>) -> Self {
        let key_column = key_column.into();
        Self {
            name: name.into(),
            columns: vec![ColumnSpec::new(key_column.clone(), ColumnKind::Text)],
            key_column,
        }
    }

    /// Add a column (builder style).
    pub fn column(mut self, name: impl Into<String>, kind: ColumnKind) -> Self {
        self.columns.push(ColumnSpec::new(name, kind));
        self
    }

    /// Look up a declared column.
    pub fn find(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Names of every non-key column.
    pub fn value_columns(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .map(|c| c.name.as_str())
            .filter(move |name| *name != self.key_column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee() -> TableSpec {
        TableSpec::new("employee", "id")
            .column("person", ColumnKind::Text)
            .column("friends", ColumnKind::List)
            .column("people", ColumnKind::Set)
    }

    #[test]
    fn key_column_comes_first() {
        let spec = employee();
        assert_eq!(spec.columns[0], ColumnSpec::new("id", ColumnKind::Text));
        assert_eq!(spec.columns.len(), 4);
    }

    #[test]
    fn value_columns_skip_key() {
        let spec = employee();
        let names: Vec<&str> = spec.value_columns().collect();
        assert_eq!(names, vec!["person", "friends", "people"]);
    }

    #[test]
    fn find_column() {
        let spec = employee();
        assert_eq!(spec.find("friends").map(|c| c.kind), Some(ColumnKind::List));
        assert!(spec.find("salary").is_none());
    }

    #[test]
    fn kind_display_uses_storage_names() {
        assert_eq!(ColumnKind::Set.to_string(), "set<text>");
    }
}
