use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Maximum length of a keyspace name.
pub const MAX_KEYSPACE_NAME_LEN: usize = 48;

/// Keyspace used by the integration walkthrough and tests.
pub const DEFAULT_KEYSPACE: &str = "kcc";

/// Configuration for opening a keyspace and preparing entity tables.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyspaceConfig {
    /// Keyspace name: a letter followed by letters, digits or underscores.
    pub name: String,
    /// Create an entity's table on first use if it does not exist.
    pub create_tables: bool,
    /// Remove all rows from an entity's table when it is prepared.
    pub truncate_on_setup: bool,
}

impl Default for KeyspaceConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_KEYSPACE.to_string(),
            create_tables: true,
            truncate_on_setup: true,
        }
    }
}

impl KeyspaceConfig {
    /// A config for `name` with default table handling.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Check that the keyspace name is usable.
    pub fn validate(&self) -> StoreResult<()> {
        let invalid = |reason: &str| StoreError::InvalidKeyspace {
            name: self.name.clone(),
            reason: reason.to_string(),
        };
        let mut chars = self.name.chars();
        match chars.next() {
            None => return Err(invalid("name is empty")),
            Some(first) if !first.is_ascii_alphabetic() => {
                return Err(invalid("name must start with a letter"))
            }
            Some(_) => {}
        }
        if self.name.len() > MAX_KEYSPACE_NAME_LEN {
            return Err(invalid("name is longer than 48 characters"));
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(invalid("only letters, digits and '_' are allowed"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = KeyspaceConfig::default();
        assert_eq!(c.name, "kcc");
        assert!(c.create_tables);
        assert!(c.truncate_on_setup);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn parses_partial_toml() {
        let c: KeyspaceConfig = toml::from_str("truncate_on_setup = false").unwrap();
        assert_eq!(c.name, "kcc");
        assert!(!c.truncate_on_setup);
    }

    #[test]
    fn rejects_bad_names() {
        for name in ["", "1abc", "has-dash", "with space"] {
            let err = KeyspaceConfig::named(name).validate().unwrap_err();
            assert!(matches!(err, StoreError::InvalidKeyspace { .. }), "{name}");
        }
        let long = "k".repeat(MAX_KEYSPACE_NAME_LEN + 1);
        assert!(KeyspaceConfig::named(long).validate().is_err());
    }

    #[test]
    fn accepts_underscores_and_digits() {
        assert!(KeyspaceConfig::named("custom_conversion_2").validate().is_ok());
    }
}
