use std::collections::HashSet;

use serde_json::Value;

use crate::entity_metadata::{ColumnMetadata, EntityMetadata, EntityRef};
use crate::find_operators::{Conditions, FindConditions};
use crate::types::{Record, SymbiosisResult, UnknownKeyPolicy};

use super::EntityManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    EntityToDatabase,
    DatabaseToEntity,
}

impl Direction {
    fn lookup<'m>(&self, metadata: &'m EntityMetadata, key: &str) -> Option<&'m ColumnMetadata> {
        match self {
            Direction::EntityToDatabase => metadata.column(key),
            Direction::DatabaseToEntity => metadata.column_by_database_name(key),
        }
    }

    fn target_name<'m>(&self, column: &'m ColumnMetadata) -> &'m str {
        match self {
            Direction::EntityToDatabase => &column.database_name,
            Direction::DatabaseToEntity => &column.name,
        }
    }
}

impl EntityManager {
    /// Rename every key of `entries` following `direction`, passing each value of a
    /// declared column through `convert`.
    ///
    /// Output keeps the input order. An unknown key equal to the target name of a
    /// declared key is dropped with a warning: the declared column's value wins.
    fn rename_keys<V, I>(
        &self,
        metadata: &EntityMetadata,
        entries: I,
        direction: Direction,
        mut convert: impl FnMut(&ColumnMetadata, V) -> SymbiosisResult<V>,
    ) -> SymbiosisResult<Vec<(String, V)>>
    where
        I: IntoIterator<Item = (String, V)>,
    {
        let entries: Vec<(String, V)> = entries.into_iter().collect();
        let claimed: HashSet<&str> = entries
            .iter()
            .filter_map(|(key, _)| direction.lookup(metadata, key))
            .map(|column| direction.target_name(column))
            .collect();

        let mut renamed = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            match direction.lookup(metadata, &key) {
                Some(column) => renamed.push((
                    direction.target_name(column).to_string(),
                    convert(column, value)?,
                )),
                None => match self.unknown_key_policy() {
                    UnknownKeyPolicy::PassThrough if claimed.contains(key.as_str()) => {
                        log::warn!(
                            target: "symbiosis",
                            "dropping unknown key {} of entity {}, it collides with a declared column",
                            key,
                            metadata.class_name
                        );
                    }
                    UnknownKeyPolicy::PassThrough => renamed.push((key, value)),
                    UnknownKeyPolicy::Discard => {
                        log::warn!(
                            target: "symbiosis",
                            "discarding unknown key {} of entity {}",
                            key,
                            metadata.class_name
                        );
                    }
                },
            }
        }
        Ok(renamed)
    }

    fn convert_record(
        &self,
        metadata: &EntityMetadata,
        record: Record,
        direction: Direction,
    ) -> SymbiosisResult<Record> {
        Ok(self
            .rename_keys(metadata, record, direction, |column, value| {
                self.convert_nested(column, value, direction)
            })?
            .into_iter()
            .collect())
    }

    /// Objects stored in an embedded column are converted with the sub entity's
    /// metadata, one by one when the column holds an array
    fn convert_nested(
        &self,
        column: &ColumnMetadata,
        value: Value,
        direction: Direction,
    ) -> SymbiosisResult<Value> {
        let Some(entity) = column.sub_entity else {
            return Ok(value);
        };
        let metadata = self.get_entity_metadata(entity)?;
        let convert_item = |item: Value| match item {
            Value::Object(record) => self
                .convert_record(metadata, record, direction)
                .map(Value::Object),
            other => Ok(other),
        };

        match value {
            Value::Array(items) => items
                .into_iter()
                .map(convert_item)
                .collect::<SymbiosisResult<Vec<_>>>()
                .map(Value::Array),
            other => convert_item(other),
        }
    }

    /// Entity shape to database shape.
    ///
    /// Keys matching no column follow the connection's `UnknownKeyPolicy`.
    /// Values of embedded columns are converted recursively.
    pub fn convert_entity_to_database(
        &self,
        entity: EntityRef,
        data: &Record,
    ) -> SymbiosisResult<Record> {
        let metadata = self.get_entity_metadata(entity)?;
        self.convert_record(metadata, data.clone(), Direction::EntityToDatabase)
    }

    /// Database shape to entity shape
    pub fn convert_database_to_entity(
        &self,
        entity: EntityRef,
        row: &Record,
    ) -> SymbiosisResult<Record> {
        let metadata = self.get_entity_metadata(entity)?;
        self.convert_record(metadata, row.clone(), Direction::DatabaseToEntity)
    }

    /// Rename the keys of a where clause to physical names.
    ///
    /// Each mapping of a sequence is handled on its own; order, length and
    /// operator values are kept as they are.
    pub fn format_conditions(
        &self,
        entity: EntityRef,
        conditions: &Conditions,
    ) -> SymbiosisResult<Conditions> {
        let metadata = self.get_entity_metadata(entity)?;
        conditions.clone().try_map(|mapping| {
            Ok(self
                .rename_keys(metadata, mapping, Direction::EntityToDatabase, |_, value| Ok(value))?
                .into_iter()
                .collect::<FindConditions>())
        })
    }

    /// Rename a list of logical column names, used for `select` and `order` clauses
    pub(crate) fn format_column_names<V>(
        &self,
        entity: EntityRef,
        entries: Vec<(String, V)>,
    ) -> SymbiosisResult<Vec<(String, V)>> {
        let metadata = self.get_entity_metadata(entity)?;
        self.rename_keys(metadata, entries, Direction::EntityToDatabase, |_, value| Ok(value))
    }
}
