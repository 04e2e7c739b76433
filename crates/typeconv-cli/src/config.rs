use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use typeconv_mapping::KeyspaceConfig;
use typeconv_registry::ConversionConfig;

/// Top-level configuration file layout.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub keyspace: KeyspaceConfig,
    pub conversion: ConversionConfig,
}

impl AppConfig {
    /// Load from a TOML file, or use defaults when no path is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = toml::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.keyspace.validate()?;
        tracing::debug!(path = %path.display(), keyspace = %config.keyspace.name, "config loaded");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_without_file() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config.keyspace.name, "kcc");
        assert!(config.conversion.blank_source_is_absent);
    }

    #[test]
    fn loads_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[keyspace]\nname = \"custom_conversion\"\ntruncate_on_setup = false\n\n[conversion]\nblank_source_is_absent = false"
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.keyspace.name, "custom_conversion");
        assert!(config.keyspace.create_tables);
        assert!(!config.keyspace.truncate_on_setup);
        assert!(!config.conversion.blank_source_is_absent);
    }

    #[test]
    fn rejects_invalid_keyspace_name() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[keyspace]\nname = \"no-dashes\"").unwrap();
        assert!(AppConfig::load(Some(file.path())).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(err.to_string().contains("reading config"));
    }
}
