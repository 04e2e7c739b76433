use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::ConversionConfig;
use crate::error::{BoxError, Direction, RegistryError, RegistryResult};
use crate::key::TypeKey;
use crate::pair::ConverterPair;

// ---------------------------------------------------------------------------
// RegistryBuilder
// ---------------------------------------------------------------------------

/// Collects converter pairs during application setup.
///
/// Registering a type twice is a configuration error; the first pair is kept
/// and the builder reports the duplicate instead of silently replacing it.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    pairs: HashMap<TypeId, ConverterPair>,
    config: ConversionConfig,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the registry configuration.
    pub fn with_config(mut self, config: ConversionConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a reader and writer for `T`.
    pub fn register<T, R, W, RE, WE>(&mut self, reader: R, writer: W) -> RegistryResult<&mut Self>
    where
        T: Any + Send,
        R: Fn(&str) -> Result<T, RE> + Send + Sync + 'static,
        W: Fn(&T) -> Result<String, WE> + Send + Sync + 'static,
        RE: Into<BoxError>,
        WE: Into<BoxError>,
    {
        self.register_pair(ConverterPair::new(reader, writer))
    }

    /// Register a serde-JSON converter pair for `T`.
    pub fn register_json<T>(&mut self) -> RegistryResult<&mut Self>
    where
        T: Serialize + DeserializeOwned + Any + Send,
    {
        self.register_pair(ConverterPair::json::<T>())
    }

    /// Register a prebuilt pair.
    pub fn register_pair(&mut self, pair: ConverterPair) -> RegistryResult<&mut Self> {
        let key = pair.key();
        if self.pairs.contains_key(&key.id()) {
            return Err(RegistryError::Configuration(format!(
                "converter for {} is already registered",
                key.name()
            )));
        }
        debug!(target_type = key.name(), "registered converter pair");
        self.pairs.insert(key.id(), pair);
        Ok(self)
    }

    /// Freeze the collected pairs into an immutable registry.
    pub fn build(self) -> ConversionRegistry {
        info!(
            converters = self.pairs.len(),
            blank_source_is_absent = self.config.blank_source_is_absent,
            "conversion registry built"
        );
        ConversionRegistry {
            pairs: self.pairs,
            config: self.config,
        }
    }
}

// ---------------------------------------------------------------------------
// ConversionRegistry
// ---------------------------------------------------------------------------

/// Immutable lookup table from domain types to their converter pairs.
///
/// Built once at startup through a [`RegistryBuilder`] and shared read-only
/// afterwards (typically behind an `Arc`). No operation mutates state, so
/// concurrent encode/decode calls need no synchronization.
///
/// Lookup is by exact type only. Collections are not handled here: callers
/// iterate and convert element by element.
pub struct ConversionRegistry {
    pairs: HashMap<TypeId, ConverterPair>,
    config: ConversionConfig,
}

impl ConversionRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// A registry with no custom converters.
    pub fn empty() -> Self {
        RegistryBuilder::new().build()
    }

    /// Build a registry from a list of pairs, failing on duplicates.
    pub fn from_pairs(pairs: impl IntoIterator<Item = ConverterPair>) -> RegistryResult<Self> {
        let mut builder = RegistryBuilder::new();
        for pair in pairs {
            builder.register_pair(pair)?;
        }
        Ok(builder.build())
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Number of registered pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Whether a custom reader produces values of `target`.
    pub fn has_custom_read_target(&self, target: TypeKey) -> bool {
        self.pairs.contains_key(&target.id())
    }

    /// Whether a custom writer accepts values of `source`.
    pub fn has_custom_write_source(&self, source: TypeKey) -> bool {
        self.pairs.contains_key(&source.id())
    }

    pub fn has_custom_read_target_of<T: Any>(&self) -> bool {
        self.has_custom_read_target(TypeKey::of::<T>())
    }

    pub fn has_custom_write_source_of<T: Any>(&self) -> bool {
        self.has_custom_write_source(TypeKey::of::<T>())
    }

    /// Encode `value` with the writer registered for `T`.
    ///
    /// Returns [`RegistryError::NoConverter`] naming `T` when the type has no
    /// custom writer; the caller should then take its default path.
    pub fn convert_for_write<T: Any>(&self, value: &T) -> RegistryResult<String> {
        let key = TypeKey::of::<T>();
        let pair = self.pairs.get(&key.id()).ok_or(RegistryError::NoConverter {
            type_name: key.name(),
        })?;
        pair.write(value)
    }

    /// Decode `source` with the reader registered for `target`.
    ///
    /// A blank source yields `Ok(None)` without invoking the reader, unless
    /// [`ConversionConfig::blank_source_is_absent`] is switched off.
    pub fn convert_for_read(
        &self,
        source: &str,
        target: TypeKey,
    ) -> RegistryResult<Option<Box<dyn Any + Send>>> {
        let pair = self.pairs.get(&target.id()).ok_or(RegistryError::NoConverter {
            type_name: target.name(),
        })?;
        if self.config.blank_source_is_absent && source.trim().is_empty() {
            debug!(target_type = target.name(), "blank source read as absent");
            return Ok(None);
        }
        pair.read(source).map(Some)
    }

    /// Shorthand for [`Self::convert_for_write`].
    pub fn write<T: Any>(&self, value: &T) -> RegistryResult<String> {
        self.convert_for_write(value)
    }

    /// Typed form of [`Self::convert_for_read`].
    pub fn read<T: Any>(&self, source: &str) -> RegistryResult<Option<T>> {
        let key = TypeKey::of::<T>();
        match self.convert_for_read(source, key)? {
            Some(boxed) => {
                let value = boxed.downcast::<T>().map_err(|_| {
                    RegistryError::conversion(
                        key.name(),
                        Direction::Read,
                        format!("reader did not produce a {}", key.name()),
                    )
                })?;
                Ok(Some(*value))
            }
            None => Ok(None),
        }
    }

    /// Registered types, in no particular order.
    pub fn registered_types(&self) -> impl Iterator<Item = TypeKey> + '_ {
        self.pairs.values().map(ConverterPair::key)
    }
}

impl Default for ConversionRegistry {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for ConversionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.pairs.values().map(|pair| pair.key().name()).collect();
        names.sort_unstable();
        f.debug_struct("ConversionRegistry")
            .field("types", &names)
            .field("config", &self.config)
            .finish()
    }
}
