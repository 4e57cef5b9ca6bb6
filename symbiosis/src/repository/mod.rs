//! Repository layer: before/after hooks around each database operation.
//!
//! A `Repository` binds one entity to the shared `EntityManager`. Its hooks are
//! plain synchronous functions; database clients implement `EntityRepository`
//! and call them around their own I/O, usually through a `HookPipeline`.

mod delete;
mod find;
mod pipeline;
mod save;
mod update;
mod write;

use async_trait::async_trait;
use std::sync::Arc;

use crate::entity_manager::EntityManager;
use crate::entity_metadata::{EntityMetadata, EntityRef};
use crate::find_operators::Conditions;
use crate::types::{OneOrMany, QueryOptions, Record, SymbiosisResult};

pub use delete::{SoftDeleteOutput, WhereParams};
pub use find::{BeforeFindOneParams, BeforeFindParams, FindOneOptions, FindOptions};
pub use pipeline::{HookPipeline, Operation, PipelineState};
pub use save::{BeforeSaveOutput, BeforeSaveParams};
pub use update::{BeforeUpdateOutput, BeforeUpdateParams};
pub use write::RelationData;

#[derive(Debug, Clone)]
pub struct Repository {
    entity_manager: Arc<EntityManager>,
    entity: EntityRef,
}

impl Repository {
    /// Bind `entity` to `entity_manager`; the entity must be registered
    pub fn new(entity_manager: Arc<EntityManager>, entity: EntityRef) -> SymbiosisResult<Self> {
        entity_manager.get_entity_metadata(entity)?;
        Ok(Self {
            entity_manager,
            entity,
        })
    }

    pub fn entity(&self) -> EntityRef {
        self.entity
    }

    pub fn entity_manager(&self) -> &Arc<EntityManager> {
        &self.entity_manager
    }

    pub fn metadata(&self) -> SymbiosisResult<&EntityMetadata> {
        self.entity_manager.get_entity_metadata(self.entity)
    }

    /// Start tracking the stages of one call
    pub fn pipeline(&self, operation: Operation) -> HookPipeline<'_> {
        HookPipeline::new(self, operation)
    }

    /// Entity-shape rows from database-shape rows
    fn rows_to_entities(&self, rows: OneOrMany<Record>) -> SymbiosisResult<OneOrMany<Record>> {
        rows.try_map(|row| {
            self.entity_manager
                .convert_database_to_entity(self.entity, &row)
        })
    }
}

/// Operations a database client offers for one entity.
///
/// Inputs and outputs are entity shaped; implementations run the matching
/// hooks of their `Repository` around the actual database call.
#[async_trait]
pub trait EntityRepository: Send + Sync {
    /// Insert or replace, matching on the primary columns
    async fn save(
        &self,
        data: OneOrMany<Record>,
        options: Option<QueryOptions>,
    ) -> SymbiosisResult<OneOrMany<Record>>;

    /// Insert, failing if the record already exists
    async fn insert(
        &self,
        data: OneOrMany<Record>,
        options: Option<QueryOptions>,
    ) -> SymbiosisResult<OneOrMany<Record>>;

    /// Update the records matching `conditions`, failing if there are none
    async fn update(
        &self,
        conditions: Conditions,
        data: Record,
        options: Option<QueryOptions>,
    ) -> SymbiosisResult<OneOrMany<Record>>;

    /// Update the records matching `conditions`, inserting when there are none
    async fn upsert(
        &self,
        conditions: Conditions,
        data: Record,
        options: Option<QueryOptions>,
    ) -> SymbiosisResult<OneOrMany<Record>>;

    async fn find(
        &self,
        conditions: FindOptions,
        options: Option<QueryOptions>,
    ) -> SymbiosisResult<Vec<Record>>;

    async fn find_one(
        &self,
        conditions: FindOneOptions,
        options: Option<QueryOptions>,
    ) -> SymbiosisResult<Option<Record>>;

    async fn delete(
        &self,
        r#where: Conditions,
        options: Option<QueryOptions>,
    ) -> SymbiosisResult<u64>;

    /// Only for entities with a delete date column
    async fn soft_delete(
        &self,
        r#where: Conditions,
        options: Option<QueryOptions>,
    ) -> SymbiosisResult<u64>;

    /// Undo a soft delete, only for entities with a delete date column
    async fn recover(
        &self,
        r#where: Conditions,
        options: Option<QueryOptions>,
    ) -> SymbiosisResult<u64>;

    async fn count(
        &self,
        r#where: Conditions,
        options: Option<QueryOptions>,
    ) -> SymbiosisResult<u64>;

    /// Faster count that some databases can only estimate
    async fn performative_count(
        &self,
        r#where: Conditions,
        options: Option<QueryOptions>,
    ) -> SymbiosisResult<u64>;
}
