use serde::{Deserialize, Serialize};

use super::{RelationData, Repository};
use crate::find_operators::Conditions;
use crate::types::{Event, OneOrMany, QueryOptions, Record, SymbiosisResult};

/// Input of `before_update` and `before_upsert`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeforeUpdateParams {
    pub conditions: Conditions,
    pub data: Record,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<QueryOptions>,
}

impl BeforeUpdateParams {
    pub fn new(conditions: impl Into<Conditions>, data: Record) -> Self {
        Self {
            conditions: conditions.into(),
            data,
            options: None,
        }
    }

    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = Some(options);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BeforeUpdateOutput {
    pub conditions: Conditions,
    pub data: Record,
    pub relations: Vec<RelationData>,
    pub options: Option<QueryOptions>,
}

impl Repository {
    fn before_conditional_write(
        &self,
        params: BeforeUpdateParams,
        event: Event,
    ) -> SymbiosisResult<BeforeUpdateOutput> {
        let single = match &params.conditions {
            OneOrMany::One(conditions) => Some(conditions),
            OneOrMany::Many(_) => None,
        };

        let mut relations = Vec::new();
        let data = self.prepare_write(&params.data, event, single, &mut relations)?;
        let conditions = self
            .entity_manager()
            .format_conditions(self.entity(), &params.conditions)?;

        Ok(BeforeUpdateOutput {
            conditions,
            data,
            relations,
            options: params.options,
        })
    }

    /// Formats the conditions and the data, extracting relations joined to the parent
    pub fn before_update(&self, params: BeforeUpdateParams) -> SymbiosisResult<BeforeUpdateOutput> {
        self.before_conditional_write(params, Event::Update)
    }

    pub fn after_update(&self, data: OneOrMany<Record>) -> SymbiosisResult<OneOrMany<Record>> {
        self.rows_to_entities(data)
    }

    pub fn before_upsert(&self, params: BeforeUpdateParams) -> SymbiosisResult<BeforeUpdateOutput> {
        self.before_conditional_write(params, Event::Upsert)
    }

    pub fn after_upsert(&self, data: OneOrMany<Record>) -> SymbiosisResult<OneOrMany<Record>> {
        self.rows_to_entities(data)
    }
}
