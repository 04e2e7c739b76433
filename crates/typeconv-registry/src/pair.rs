use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{BoxError, Direction, RegistryError, RegistryResult};
use crate::key::TypeKey;

type ReadFn = dyn Fn(&str) -> Result<Box<dyn Any + Send>, BoxError> + Send + Sync;
type WriteFn = dyn Fn(&dyn Any) -> Result<String, BoxError> + Send + Sync;

// ---------------------------------------------------------------------------
// Converter traits
// ---------------------------------------------------------------------------

/// Converts a stored string into a domain value.
///
/// Implementations must be pure and synchronous; they may be called from
/// many threads at once.
pub trait ReadConverter: Send + Sync + 'static {
    /// The domain type produced.
    type Target: Any + Send;

    fn read(&self, source: &str) -> Result<Self::Target, BoxError>;
}

/// Converts a domain value into its stored string form.
pub trait WriteConverter: Send + Sync + 'static {
    /// The domain type consumed.
    type Source: Any;

    fn write(&self, value: &Self::Source) -> Result<String, BoxError>;
}

// ---------------------------------------------------------------------------
// ConverterPair
// ---------------------------------------------------------------------------

/// A reader/writer pair bound to exactly one domain type.
///
/// The pair is type-erased so that pairs for different types can live in the
/// same registry. It is cheap to clone and immutable once built.
#[derive(Clone)]
pub struct ConverterPair {
    key: TypeKey,
    reader: Arc<ReadFn>,
    writer: Arc<WriteFn>,
}

impl ConverterPair {
    /// Build a pair for `T` from two closures.
    pub fn new<T, R, W, RE, WE>(reader: R, writer: W) -> Self
    where
        T: Any + Send,
        R: Fn(&str) -> Result<T, RE> + Send + Sync + 'static,
        W: Fn(&T) -> Result<String, WE> + Send + Sync + 'static,
        RE: Into<BoxError>,
        WE: Into<BoxError>,
    {
        let key = TypeKey::of::<T>();
        let reader = move |source: &str| -> Result<Box<dyn Any + Send>, BoxError> {
            let value = reader(source).map_err(Into::into)?;
            Ok(Box::new(value))
        };
        let writer = move |value: &dyn Any| -> Result<String, BoxError> {
            let typed = value
                .downcast_ref::<T>()
                .ok_or_else(|| BoxError::from(format!("value is not a {}", key.name())))?;
            writer(typed).map_err(Into::into)
        };
        Self {
            key,
            reader: Arc::new(reader),
            writer: Arc::new(writer),
        }
    }

    /// Build a pair from a matching reader and writer implementation.
    pub fn from_converters<R, W>(reader: R, writer: W) -> Self
    where
        R: ReadConverter,
        W: WriteConverter<Source = R::Target>,
    {
        Self::new(
            move |source: &str| reader.read(source),
            move |value: &R::Target| writer.write(value),
        )
    }

    /// A pair that stores `T` as compact JSON via serde.
    ///
    /// Struct fields are emitted in declaration order, so a two-field record
    /// becomes `{"firstname":"Homer","lastname":"Simpson"}`.
    pub fn json<T>() -> Self
    where
        T: Serialize + DeserializeOwned + Any + Send,
    {
        Self::new(
            |source: &str| serde_json::from_str::<T>(source),
            |value: &T| serde_json::to_string(value),
        )
    }

    /// The domain type this pair converts.
    pub fn key(&self) -> TypeKey {
        self.key
    }

    pub(crate) fn read(&self, source: &str) -> RegistryResult<Box<dyn Any + Send>> {
        (self.reader)(source)
            .map_err(|e| RegistryError::conversion(self.key.name(), Direction::Read, e))
    }

    pub(crate) fn write(&self, value: &dyn Any) -> RegistryResult<String> {
        (self.writer)(value)
            .map_err(|e| RegistryError::conversion(self.key.name(), Direction::Write, e))
    }
}

impl fmt::Debug for ConverterPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterPair")
            .field("type", &self.key.name())
            .finish()
    }
}
