use serde::{Deserialize, Serialize};

use super::{RelationData, Repository};
use crate::types::{Event, OneOrMany, QueryOptions, Record, SymbiosisResult};

/// Input of `before_save` and `before_insert`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeforeSaveParams {
    pub data: OneOrMany<Record>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<QueryOptions>,
}

impl BeforeSaveParams {
    pub fn new(data: impl Into<OneOrMany<Record>>) -> Self {
        Self {
            data: data.into(),
            options: None,
        }
    }

    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = Some(options);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BeforeSaveOutput {
    pub data: OneOrMany<Record>,
    pub relations: Vec<RelationData>,
    pub options: Option<QueryOptions>,
}

impl Repository {
    fn before_write(&self, params: BeforeSaveParams, event: Event) -> SymbiosisResult<BeforeSaveOutput> {
        let mut relations = Vec::new();
        let data = params
            .data
            .try_map(|record| self.prepare_write(&record, event, None, &mut relations))?;

        Ok(BeforeSaveOutput {
            data,
            relations,
            options: params.options,
        })
    }

    /// Auto generates `save` columns, converts to database shape and extracts relations
    pub fn before_save(&self, params: BeforeSaveParams) -> SymbiosisResult<BeforeSaveOutput> {
        self.before_write(params, Event::Save)
    }

    pub fn after_save(&self, data: OneOrMany<Record>) -> SymbiosisResult<OneOrMany<Record>> {
        self.rows_to_entities(data)
    }

    /// Same as `before_save`, generating the `insert` columns
    pub fn before_insert(&self, params: BeforeSaveParams) -> SymbiosisResult<BeforeSaveOutput> {
        self.before_write(params, Event::Insert)
    }

    pub fn after_insert(&self, data: OneOrMany<Record>) -> SymbiosisResult<OneOrMany<Record>> {
        self.rows_to_entities(data)
    }
}
