//! Row mapping for typeconv.
//!
//! This crate is the storage-side collaborator of
//! [`typeconv_registry::ConversionRegistry`]: it turns [`Entity`] values into
//! [`Row`]s and back, offering every field (and every element of a list or
//! set field) to the registry before falling back to default handling.
//!
//! # Key Types
//!
//! - [`Entity`] - a domain type mapped to one table
//! - [`RowWriter`] / [`RowReader`] - field-level conversion into and out of cells
//! - [`RowStore`] - row storage trait, with [`InMemoryKeyspace`] as the backend
//! - [`MappingTemplate`] - insert, update and select of entities

pub mod codec;
pub mod config;
pub mod entity;
pub mod error;
pub mod memory;
pub mod row;
pub mod schema;
pub mod template;
pub mod traits;

pub use codec::{RowReader, RowWriter};
pub use config::{KeyspaceConfig, DEFAULT_KEYSPACE, MAX_KEYSPACE_NAME_LEN};
pub use entity::Entity;
pub use error::{MappingError, MappingResult, StoreError, StoreResult};
pub use memory::InMemoryKeyspace;
pub use row::{Cell, Row};
pub use schema::{ColumnKind, ColumnSpec, TableSpec};
pub use template::MappingTemplate;
pub use traits::RowStore;
