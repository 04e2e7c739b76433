use crate::codec::{RowReader, RowWriter};
use crate::error::MappingResult;
use crate::schema::TableSpec;

/// A domain type persisted as one row of a table.
///
/// Implementations name each field's column and declared type explicitly,
/// which is what decides whether a custom converter applies to it.
///
/// ```rust
/// use typeconv_mapping::{ColumnKind, Entity, MappingResult, RowReader, RowWriter, TableSpec};
///
/// struct Badge {
///     id: String,
///     label: Option<String>,
/// }
///
/// impl Entity for Badge {
///     fn table() -> TableSpec {
///         TableSpec::new("badge", "id").column("label", ColumnKind::Text)
///     }
///
///     fn key(&self) -> &str {
///         &self.id
///     }
///
///     fn write_row(&self, row: &mut RowWriter<'_>) -> MappingResult<()> {
///         row.put_key("id", &self.id);
///         row.put("label", self.label.as_ref())?;
///         Ok(())
///     }
///
///     fn read_row(row: &RowReader<'_>) -> MappingResult<Self> {
///         Ok(Self {
///             id: row.key("id")?,
///             label: row.get("label")?,
///         })
///     }
/// }
/// ```
pub trait Entity: Sized {
    /// Layout of the backing table.
    fn table() -> TableSpec;

    /// Primary key value.
    fn key(&self) -> &str;

    /// Write every mapped field.
    fn write_row(&self, row: &mut RowWriter<'_>) -> MappingResult<()>;

    /// Rebuild the entity from a stored row.
    fn read_row(row: &RowReader<'_>) -> MappingResult<Self>;
}
