use std::fmt;

/// Boxed cause carried by a failed converter.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Which way a conversion was running when it failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Domain value to storage value.
    Write,
    /// Storage value to domain value.
    Read,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Write => f.write_str("write"),
            Self::Read => f.write_str("read"),
        }
    }
}

/// Errors produced while building or using a conversion registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Duplicate or invalid registration. Fatal at setup time.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// No custom converter is registered for the type. Callers should fall
    /// back to their default conversion path.
    #[error("no custom converter registered for {type_name}")]
    NoConverter { type_name: &'static str },

    /// A registered converter function itself failed.
    #[error("{direction} conversion failed for {type_name}: {source}")]
    Conversion {
        type_name: &'static str,
        direction: Direction,
        #[source]
        source: BoxError,
    },
}

impl RegistryError {
    /// Returns `true` for the "no custom path" signal.
    pub fn is_no_converter(&self) -> bool {
        matches!(self, Self::NoConverter { .. })
    }

    pub(crate) fn conversion(
        type_name: &'static str,
        direction: Direction,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Conversion {
            type_name,
            direction,
            source: source.into(),
        }
    }
}

/// Result alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
