use std::sync::Arc;

use tracing::debug;
use typeconv_registry::ConversionRegistry;

use crate::codec::{RowReader, RowWriter};
use crate::config::KeyspaceConfig;
use crate::entity::Entity;
use crate::error::MappingResult;
use crate::row::Row;
use crate::traits::RowStore;

/// Persists and loads [`Entity`] values through a [`RowStore`], applying
/// the registry's custom conversions field by field.
///
/// Conversion failures abort the whole operation before the store is
/// touched; nothing is partially written by the template itself.
pub struct MappingTemplate<S: RowStore> {
    store: Arc<S>,
    registry: Arc<ConversionRegistry>,
    config: KeyspaceConfig,
}

impl<S: RowStore> MappingTemplate<S> {
    pub fn new(store: Arc<S>, registry: Arc<ConversionRegistry>, config: KeyspaceConfig) -> Self {
        Self {
            store,
            registry,
            config,
        }
    }

    /// The underlying store, for raw row access.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn registry(&self) -> &ConversionRegistry {
        &self.registry
    }

    /// Make `E`'s table ready for use: create it if configured to, then
    /// truncate it if configured to.
    pub fn prepare<E: Entity>(&self) -> MappingResult<()> {
        let spec = E::table();
        if self.config.create_tables {
            self.store.create_table(&spec)?;
        }
        if self.config.truncate_on_setup {
            self.store.truncate(&spec.name)?;
        }
        Ok(())
    }

    /// Convert an entity into its row image.
    pub fn to_row<E: Entity>(&self, entity: &E) -> MappingResult<Row> {
        let mut writer = RowWriter::new(&self.registry);
        entity.write_row(&mut writer)?;
        Ok(writer.finish())
    }

    /// Rebuild an entity from a row.
    pub fn from_row<E: Entity>(&self, row: &Row) -> MappingResult<E> {
        E::read_row(&RowReader::new(&self.registry, row))
    }

    /// Insert an entity. Null fields leave stored columns untouched.
    pub fn insert<E: Entity>(&self, entity: &E) -> MappingResult<()> {
        let spec = E::table();
        let row = self.to_row(entity)?;
        debug!(table = %spec.name, key = entity.key(), columns = row.len(), "insert");
        self.store.upsert(&spec.name, &row)?;
        Ok(())
    }

    /// Update an entity. Every mapped column is written; null fields clear
    /// the stored value.
    pub fn update<E: Entity>(&self, entity: &E) -> MappingResult<()> {
        let spec = E::table();
        let row = self.to_row(entity)?;
        debug!(table = %spec.name, key = entity.key(), columns = row.len(), "update");
        self.store.replace(&spec.name, &row)?;
        Ok(())
    }

    /// Load an entity by key.
    pub fn select_one<E: Entity>(&self, key: &str) -> MappingResult<Option<E>> {
        let spec = E::table();
        match self.store.select(&spec.name, key, None)? {
            Some(row) => self.from_row(&row).map(Some),
            None => Ok(None),
        }
    }

    /// Load an entity by key, reading only the named columns.
    pub fn select_one_columns<E: Entity>(&self, key: &str, columns: &[&str]) -> MappingResult<Option<E>> {
        let spec = E::table();
        match self.store.select(&spec.name, key, Some(columns))? {
            Some(row) => self.from_row(&row).map(Some),
            None => Ok(None),
        }
    }

    /// Load a raw row without any conversion.
    pub fn select_row(&self, table: &str, key: &str, columns: &[&str]) -> MappingResult<Option<Row>> {
        Ok(self.store.select(table, key, Some(columns))?)
    }
}
