use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use typeconv_mapping::{ColumnKind, Entity, MappingResult, RowReader, RowWriter, TableSpec};
use typeconv_registry::{
    BoxError, ConversionConfig, ConversionRegistry, ConverterPair, ReadConverter, RegistryResult,
    WriteConverter,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Person {
    pub firstname: String,
    pub lastname: String,
}

impl Person {
    pub fn new(firstname: impl Into<String>, lastname: impl Into<String>) -> Self {
        Self {
            firstname: firstname.into(),
            lastname: lastname.into(),
        }
    }
}

/// Reads a person from its JSON object form.
pub struct PersonReader;

impl ReadConverter for PersonReader {
    type Target = Person;

    fn read(&self, source: &str) -> Result<Person, BoxError> {
        Ok(serde_json::from_str(source)?)
    }
}

/// Writes a person as a JSON object with named attributes.
pub struct PersonWriter;

impl WriteConverter for PersonWriter {
    type Source = Person;

    fn write(&self, value: &Person) -> Result<String, BoxError> {
        Ok(serde_json::to_string(value)?)
    }
}

/// The registry used by every command.
pub fn registry(config: ConversionConfig) -> RegistryResult<ConversionRegistry> {
    let mut builder = ConversionRegistry::builder().with_config(config);
    builder.register_pair(ConverterPair::from_converters(PersonReader, PersonWriter))?;
    Ok(builder.build())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Employee {
    pub id: String,
    pub person: Option<Person>,
    pub friends: Vec<Person>,
    pub people: HashSet<Person>,
}

impl Employee {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

impl Entity for Employee {
    fn table() -> TableSpec {
        TableSpec::new("employee", "id")
            .column("person", ColumnKind::Text)
            .column("friends", ColumnKind::List)
            .column("people", ColumnKind::Set)
    }

    fn key(&self) -> &str {
        &self.id
    }

    fn write_row(&self, row: &mut RowWriter<'_>) -> MappingResult<()> {
        row.put_key("id", &self.id);
        row.put("person", self.person.as_ref())?
            .put_list("friends", &self.friends)?
            .put_set("people", &self.people)?;
        Ok(())
    }

    fn read_row(row: &RowReader<'_>) -> MappingResult<Self> {
        Ok(Self {
            id: row.key("id")?,
            person: row.get("person")?,
            friends: row.get_list("friends")?,
            people: row.get_set("people")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_converts_person() {
        let registry = registry(ConversionConfig::default()).unwrap();
        let stored = registry.write(&Person::new("Homer", "Simpson")).unwrap();
        assert_eq!(stored, r#"{"firstname":"Homer","lastname":"Simpson"}"#);
        assert_eq!(
            registry.read::<Person>(&stored).unwrap(),
            Some(Person::new("Homer", "Simpson"))
        );
        assert_eq!(registry.read::<Person>("").unwrap(), None);
    }

    #[test]
    fn employee_table_layout() {
        let spec = Employee::table();
        assert_eq!(spec.name, "employee");
        assert_eq!(spec.key_column, "id");
        assert_eq!(spec.value_columns().count(), 3);
    }
}
