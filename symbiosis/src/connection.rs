//! Connection configuration and the entry point building the entity manager.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::entity_manager::EntityManager;
use crate::entity_metadata::{Entity, EntityRef};
use crate::generators::{AutoGenerator, GeneratorRegistry};
use crate::naming::NamingStrategy;
use crate::repository::Repository;
use crate::types::{SymbiosisResult, UnknownKeyPolicy};

/// Naming strategies applied to names without an explicit override
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingStrategyOptions {
    pub column: NamingStrategy,
    pub table: NamingStrategy,
}

impl NamingStrategyOptions {
    pub fn columns(strategy: NamingStrategy) -> Self {
        Self {
            column: strategy,
            ..Self::default()
        }
    }
}

/// Everything a connection needs to build its registry
#[derive(Debug, Clone, Default)]
pub struct ConnectionOptions {
    pub entities: Vec<EntityRef>,
    pub naming_strategy: NamingStrategyOptions,
    pub unknown_keys: UnknownKeyPolicy,
    pub generators: GeneratorRegistry,
}

impl ConnectionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T`; order of calls is the registration order
    pub fn entity<T: Entity>(mut self) -> Self {
        self.entities.push(EntityRef::of::<T>());
        self
    }

    pub fn naming_strategy(mut self, naming_strategy: NamingStrategyOptions) -> Self {
        self.naming_strategy = naming_strategy;
        self
    }

    pub fn column_naming(mut self, strategy: NamingStrategy) -> Self {
        self.naming_strategy.column = strategy;
        self
    }

    pub fn table_naming(mut self, strategy: NamingStrategy) -> Self {
        self.naming_strategy.table = strategy;
        self
    }

    pub fn unknown_keys(mut self, policy: UnknownKeyPolicy) -> Self {
        self.unknown_keys = policy;
        self
    }

    /// Make `strategy` usable by auto generated columns
    pub fn generator(mut self, strategy: impl Into<String>, generator: impl AutoGenerator + 'static) -> Self {
        self.generators.register(strategy, generator);
        self
    }
}

/// A configured connection: owns the entity manager shared by its repositories
#[derive(Debug, Clone)]
pub struct Connection {
    options: ConnectionOptions,
    entity_manager: Arc<EntityManager>,
}

impl Connection {
    pub fn new(options: ConnectionOptions) -> SymbiosisResult<Self> {
        let entity_manager = Arc::new(EntityManager::new(&options)?);
        Ok(Self {
            options,
            entity_manager,
        })
    }

    pub fn options(&self) -> &ConnectionOptions {
        &self.options
    }

    pub fn entity_manager(&self) -> &Arc<EntityManager> {
        &self.entity_manager
    }

    /// Hook pipeline for `T`; fails if `T` was never registered
    pub fn repository<T: Entity>(&self) -> SymbiosisResult<Repository> {
        Repository::new(self.entity_manager.clone(), EntityRef::of::<T>())
    }
}
