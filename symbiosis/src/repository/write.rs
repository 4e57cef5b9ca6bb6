// Shared preparation of write payloads: auto generation, conversion and relation fan-out

use serde_json::Value;

use super::Repository;
use crate::entity_metadata::{EntityRef, RelationMetadata};
use crate::find_operators::{ConditionValue, FindConditions};
use crate::types::{Event, Record, SymbiosisResult};

/// Database-shape record of a related entity, extracted from a parent payload
#[derive(Debug, Clone, PartialEq)]
pub struct RelationData {
    pub entity: EntityRef,
    pub data: Record,
}

impl Repository {
    /// Turn one entity-shape record into its database shape.
    ///
    /// Relation properties are removed from the record and each related record
    /// is pushed to `relations`, joined to the parent through the relation map.
    /// When the record lacks the joined column, an equality in `conditions` is
    /// used instead.
    pub(crate) fn prepare_write(
        &self,
        record: &Record,
        event: Event,
        conditions: Option<&FindConditions>,
        relations: &mut Vec<RelationData>,
    ) -> SymbiosisResult<Record> {
        let entity_manager = self.entity_manager();
        let metadata = self.metadata()?;

        let mut entity_data =
            entity_manager.auto_generate_entity_to_database(self.entity(), record, event)?;

        let extracted: Vec<(&RelationMetadata, Value)> = metadata
            .relations
            .iter()
            .filter_map(|relation| {
                entity_data
                    .remove(&relation.property_name)
                    .map(|value| (relation, value))
            })
            .collect();

        let data = entity_manager.convert_entity_to_database(self.entity(), &entity_data)?;

        for (relation, value) in extracted {
            let column_name = &relation.relation_map.column_name;
            let parent_value = metadata
                .column(column_name)
                .and_then(|column| data.get(&column.database_name))
                .or_else(|| match conditions?.get(column_name)? {
                    ConditionValue::Value(value) => Some(value),
                    ConditionValue::Operator(_) => None,
                })
                .cloned();

            for child in relation_records(relation, value, &metadata.class_name) {
                relations.push(self.prepare_relation(relation, child, parent_value.as_ref(), event)?);
            }
        }

        Ok(data)
    }

    fn prepare_relation(
        &self,
        relation: &RelationMetadata,
        mut child: Record,
        parent_value: Option<&Value>,
        event: Event,
    ) -> SymbiosisResult<RelationData> {
        let entity_manager = self.entity_manager();
        let target = entity_manager.get_entity_metadata(relation.target_entity)?;

        // One level only: relations of the child are not expanded
        for nested in &target.relations {
            if child.remove(&nested.property_name).is_some() {
                log::debug!(
                    target: "symbiosis",
                    "dropping nested relation {}.{}",
                    target.class_name,
                    nested.property_name
                );
            }
        }

        match parent_value {
            Some(value) => {
                child.insert(relation.relation_map.target_column_name.clone(), value.clone());
            }
            None => log::debug!(
                target: "symbiosis",
                "parent has no {} value, {} left unjoined",
                relation.relation_map.column_name,
                relation.property_name
            ),
        }

        let child = entity_manager.auto_generate_entity_to_database(relation.target_entity, &child, event)?;
        Ok(RelationData {
            entity: relation.target_entity,
            data: entity_manager.convert_entity_to_database(relation.target_entity, &child)?,
        })
    }
}

/// Records held by a relation property: a list, a single object, or nothing
fn relation_records(relation: &RelationMetadata, value: Value, class_name: &str) -> Vec<Record> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(record) => Some(record),
                other => {
                    skip_relation_value(relation, &other, class_name);
                    None
                }
            })
            .collect(),
        Value::Object(record) => vec![record],
        Value::Null => Vec::new(),
        other => {
            skip_relation_value(relation, &other, class_name);
            Vec::new()
        }
    }
}

fn skip_relation_value(relation: &RelationMetadata, value: &Value, class_name: &str) {
    log::warn!(
        target: "symbiosis",
        "skipping non object value {} of relation {}.{}",
        value,
        class_name,
        relation.property_name
    );
}
