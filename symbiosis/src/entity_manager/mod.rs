//! Per-connection owner of the entity metadata.
//!
//! The manager is built once from `ConnectionOptions` and never mutated
//! afterwards, so it is shared between repositories behind an `Arc` without
//! any locking.

mod auto_generate;
mod convert;
pub(crate) mod registry;

use std::collections::HashMap;

use crate::connection::ConnectionOptions;
use crate::entity_metadata::{ColumnMetadata, EntityMetadata, EntityRef};
use crate::generators::GeneratorRegistry;
use crate::types::{SymbiosisError, SymbiosisResult, UnknownKeyPolicy};

use registry::{register_entities, register_sub_entities, Registry};

pub struct EntityManager {
    entities: Vec<EntityMetadata>,
    index: HashMap<String, usize>,
    unknown_keys: UnknownKeyPolicy,
    generators: GeneratorRegistry,
}

impl EntityManager {
    /// Build the registry: declared entities first, then every entity only
    /// reachable through relations.
    pub fn new(options: &ConnectionOptions) -> SymbiosisResult<Self> {
        log::debug!(
            target: "symbiosis",
            "building entity registry for {} entities",
            options.entities.len()
        );

        let mut registry = Registry::new(options.naming_strategy, &options.generators);
        register_entities(&mut registry, &options.entities)?;
        register_sub_entities(&mut registry)?;

        let (entities, index) = registry.finish();
        log::debug!(
            target: "symbiosis",
            "entity registry ready: {} entities ({} sub entities)",
            entities.len(),
            entities.iter().filter(|entity| entity.is_sub_entity).count()
        );

        Ok(Self {
            entities,
            index,
            unknown_keys: options.unknown_keys,
            generators: options.generators.clone(),
        })
    }

    /// Every registered entity, in registration order
    pub fn get_all_entities_metadata(&self) -> &[EntityMetadata] {
        &self.entities
    }

    /// Only the entities that are not sub entities
    pub fn get_all_tables_metadata(&self) -> Vec<&EntityMetadata> {
        self.entities
            .iter()
            .filter(|entity| !entity.is_sub_entity)
            .collect()
    }

    pub fn get_entity_metadata(&self, entity: EntityRef) -> SymbiosisResult<&EntityMetadata> {
        self.index
            .get(entity.name())
            .map(|&position| &self.entities[position])
            .ok_or_else(|| SymbiosisError::entity_not_registered(entity.name()))
    }

    /// Lookup by class name, accepting a module path prefix (`blog::Post` -> `Post`)
    pub fn get_entity_metadata_by_name(&self, name: &str) -> SymbiosisResult<&EntityMetadata> {
        if let Some(&position) = self.index.get(name) {
            return Ok(&self.entities[position]);
        }
        name.rsplit_once("::")
            .and_then(|(_, short)| self.index.get(short))
            .map(|&position| &self.entities[position])
            .ok_or_else(|| SymbiosisError::entity_not_registered(name))
    }

    pub fn get_column_metadata(
        &self,
        entity: EntityRef,
        column_name: &str,
    ) -> SymbiosisResult<&ColumnMetadata> {
        self.get_entity_metadata(entity)?
            .column(column_name)
            .ok_or_else(|| SymbiosisError::column_not_found(entity.name(), column_name))
    }

    /// Primary columns in declaration order, possibly empty
    pub fn get_entity_primary_columns(
        &self,
        entity: EntityRef,
    ) -> SymbiosisResult<Vec<&ColumnMetadata>> {
        Ok(self.get_entity_metadata(entity)?.primary_columns())
    }

    pub fn is_registered(&self, entity: EntityRef) -> bool {
        self.index.contains_key(entity.name())
    }

    pub fn unknown_key_policy(&self) -> UnknownKeyPolicy {
        self.unknown_keys
    }

    pub fn generators(&self) -> &GeneratorRegistry {
        &self.generators
    }
}

impl core::fmt::Debug for EntityManager {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EntityManager")
            .field(
                "entities",
                &self
                    .entities
                    .iter()
                    .map(|entity| entity.class_name.as_str())
                    .collect::<Vec<_>>(),
            )
            .field("unknown_keys", &self.unknown_keys)
            .finish()
    }
}
