// Two-phase construction of the entity registry

use std::collections::{HashMap, HashSet, VecDeque};

use crate::column_type::resolve_primary_type;
use crate::connection::NamingStrategyOptions;
use crate::entity_metadata::{
    ColumnDeclaration, ColumnKind, ColumnMetadata, EntityMetadata, EntityRef, RelationMetadata,
};
use crate::generators::GeneratorRegistry;
use crate::naming::resolve_database_name;
use crate::types::{AutoGenerationType, SymbiosisError, SymbiosisResult};

/// Registry under construction, consumed into the `EntityManager` once both phases ran
pub(crate) struct Registry<'a> {
    naming: NamingStrategyOptions,
    generators: &'a GeneratorRegistry,
    entities: Vec<EntityMetadata>,
    index: HashMap<String, usize>,
}

impl<'a> Registry<'a> {
    pub(crate) fn new(naming: NamingStrategyOptions, generators: &'a GeneratorRegistry) -> Self {
        Self {
            naming,
            generators,
            entities: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub(crate) fn finish(self) -> (Vec<EntityMetadata>, HashMap<String, usize>) {
        (self.entities, self.index)
    }

    fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    fn insert(&mut self, metadata: EntityMetadata) {
        log::trace!(
            target: "symbiosis",
            "registered entity {} as {} ({} columns, {} relations, sub entity: {})",
            metadata.class_name,
            metadata.database_name,
            metadata.columns.len(),
            metadata.relations.len(),
            metadata.is_sub_entity
        );
        self.index
            .insert(metadata.class_name.clone(), self.entities.len());
        self.entities.push(metadata);
    }

    fn get(&self, name: &str) -> Option<&EntityMetadata> {
        self.index.get(name).map(|&position| &self.entities[position])
    }

    /// Resolve the declaration of `entity` into metadata
    fn build(&self, entity: EntityRef, embedded: bool) -> SymbiosisResult<EntityMetadata> {
        let class_name = entity.name();
        let declaration = entity.declare();

        let (database_name, is_name_already_formatted) =
            resolve_database_name(declaration.name.as_deref(), class_name, self.naming.table);

        let mut logical_names = HashSet::new();
        let mut physical_names = HashSet::new();
        let mut columns = Vec::with_capacity(declaration.columns.len());

        for column in &declaration.columns {
            let metadata = self.build_column(class_name, column)?;

            if !logical_names.insert(metadata.name.clone()) {
                return Err(SymbiosisError::duplicated_column(class_name, &metadata.name));
            }
            if !physical_names.insert(metadata.database_name.clone()) {
                return Err(SymbiosisError::duplicated_column(class_name, &metadata.database_name));
            }
            columns.push(metadata);
        }

        let relations = declaration
            .relations
            .into_iter()
            .map(|relation| RelationMetadata {
                property_name: relation.property_name,
                target_entity: relation.target,
                kind: relation.kind,
                relation_map: relation.relation_map,
            })
            .collect();

        Ok(EntityMetadata {
            class_name: class_name.to_string(),
            database_name,
            is_name_already_formatted,
            columns,
            relations,
            is_sub_entity: declaration.is_sub_entity || embedded,
            extras: declaration.extras,
        })
    }

    fn build_column(
        &self,
        class_name: &str,
        column: &ColumnDeclaration,
    ) -> SymbiosisResult<ColumnMetadata> {
        let column_type = if column.is_primary() {
            resolve_primary_type(class_name, &column.property_name, &column.column_type)?
        } else {
            column.column_type.clone()
        };

        let (database_name, is_name_already_formatted) = resolve_database_name(
            column.options.name.as_deref(),
            &column.property_name,
            self.naming.column,
        );

        let generation = column.generation();
        let (auto_generation_type, auto_generate, auto_generate_only_on_events) =
            match generation {
                Some(_) if column.generated_by_database => {
                    (Some(AutoGenerationType::DatabaseToEntity), None, Vec::new())
                }
                Some((strategy, events)) => {
                    if !self.generators.contains(&strategy) {
                        return Err(SymbiosisError::unknown_generation_strategy(
                            class_name,
                            &column.property_name,
                            &strategy,
                        ));
                    }
                    (Some(AutoGenerationType::EntityToDatabase), Some(strategy), events)
                }
                None => (None, None, Vec::new()),
            };

        Ok(ColumnMetadata {
            name: column.property_name.clone(),
            database_name,
            column_type,
            primary: column.is_primary(),
            is_auto_generated: auto_generation_type.is_some(),
            auto_generation_type,
            auto_generate,
            auto_generate_only_on_events,
            extras: column.options.extras.clone(),
            is_name_already_formatted,
            is_delete_date: column.kind == ColumnKind::DeleteDateColumn,
            comment: column.options.comment.clone(),
            database_type: column.options.database_type.clone(),
            default_value: column.options.default_value.clone(),
            enum_values: column.options.enum_values.clone(),
            sub_entity: column.sub_entity,
        })
    }
}

/// Phase one: metadata for every entity listed in the connection options
pub(crate) fn register_entities(
    registry: &mut Registry<'_>,
    entities: &[EntityRef],
) -> SymbiosisResult<()> {
    for &entity in entities {
        if registry.contains(entity.name()) {
            return Err(SymbiosisError::duplicated_entity(entity.name()));
        }
        let metadata = registry.build(entity, false)?;
        registry.insert(metadata);
    }
    Ok(())
}

/// Phase two: register every entity reached from the listed ones, then check every relation map.
///
/// Runs after phase one so a column or relation may point at an entity declared
/// later in the list. Entities embedded as column values are flagged as sub
/// entities; relation targets are ordinary tables. Reached entities are followed
/// in turn until no new one appears.
pub(crate) fn register_sub_entities(registry: &mut Registry<'_>) -> SymbiosisResult<()> {
    let mut pending: VecDeque<(EntityRef, bool)> = registry
        .entities
        .iter()
        .flat_map(reached_entities)
        .collect();

    while let Some((target, embedded)) = pending.pop_front() {
        if let Some(existing) = registry.get(target.name()) {
            if embedded && !existing.is_sub_entity {
                log::warn!(
                    target: "symbiosis",
                    "entity {} is embedded in a column but also registered as a table",
                    target.name()
                );
            }
            continue;
        }
        let metadata = registry.build(target, embedded)?;
        pending.extend(reached_entities(&metadata));
        registry.insert(metadata);
    }

    for entity in &registry.entities {
        for relation in &entity.relations {
            if entity.column(&relation.relation_map.column_name).is_none() {
                return Err(SymbiosisError::column_not_found(
                    &entity.class_name,
                    &relation.relation_map.column_name,
                )
                .with_detail(format!("Relation: {}", relation.property_name)));
            }
            let target = registry
                .get(relation.target_entity.name())
                .ok_or_else(|| SymbiosisError::entity_not_registered(relation.target_entity.name()))?;
            if target.column(&relation.relation_map.target_column_name).is_none() {
                return Err(SymbiosisError::column_not_found(
                    &target.class_name,
                    &relation.relation_map.target_column_name,
                )
                .with_detail(format!("Relation: {}", relation.property_name)));
            }
        }
    }

    Ok(())
}

/// Entities an entity points at, paired with whether they are embedded in a column
fn reached_entities(metadata: &EntityMetadata) -> impl Iterator<Item = (EntityRef, bool)> + '_ {
    let embedded = metadata
        .columns
        .iter()
        .filter_map(|column| column.sub_entity.map(|entity| (entity, true)));
    let related = metadata
        .relations
        .iter()
        .map(|relation| (relation.target_entity, false));
    embedded.chain(related)
}
