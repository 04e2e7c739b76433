use serde::{Deserialize, Serialize};

/// Behavioural switches for a [`ConversionRegistry`](crate::ConversionRegistry).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// When `true`, reading an empty or whitespace-only stored value yields
    /// an absent result without invoking the reader. When `false`, the
    /// reader receives the blank input and decides for itself.
    pub blank_source_is_absent: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            blank_source_is_absent: true,
        }
    }
}

impl ConversionConfig {
    /// A configuration that hands every stored value to the reader.
    pub fn strict() -> Self {
        Self {
            blank_source_is_absent: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_short_circuits_blank() {
        assert!(ConversionConfig::default().blank_source_is_absent);
        assert!(!ConversionConfig::strict().blank_source_is_absent);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: ConversionConfig = toml::from_str("").unwrap();
        assert_eq!(config, ConversionConfig::default());

        let config: ConversionConfig = toml::from_str("blank_source_is_absent = false").unwrap();
        assert_eq!(config, ConversionConfig::strict());
    }
}
