//! Custom conversion registry for typeconv.
//!
//! A [`ConversionRegistry`] maps domain types to a reader/writer
//! [`ConverterPair`] that turns values into an opaque stored string and back.
//! It is populated once during setup and is read-only afterwards, so it can
//! be shared across threads without locks.
//!
//! # Quick Start
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use typeconv_registry::ConversionRegistry;
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Person {
//!     firstname: String,
//!     lastname: String,
//! }
//!
//! let mut builder = ConversionRegistry::builder();
//! builder.register_json::<Person>().unwrap();
//! let registry = builder.build();
//!
//! let homer = Person { firstname: "Homer".into(), lastname: "Simpson".into() };
//! let stored = registry.convert_for_write(&homer).unwrap();
//! assert_eq!(stored, r#"{"firstname":"Homer","lastname":"Simpson"}"#);
//! assert_eq!(registry.read::<Person>(&stored).unwrap(), Some(homer));
//! ```

pub mod config;
pub mod error;
pub mod key;
pub mod pair;
pub mod registry;

pub use config::ConversionConfig;
pub use error::{BoxError, Direction, RegistryError, RegistryResult};
pub use key::TypeKey;
pub use pair::{ConverterPair, ReadConverter, WriteConverter};
pub use registry::{ConversionRegistry, RegistryBuilder};
