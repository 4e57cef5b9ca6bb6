// Hooks of the operations that only take a where clause: delete, soft delete, recover and counts

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Repository;
use crate::entity_metadata::ColumnMetadata;
use crate::find_operators::Conditions;
use crate::generators::{AutoGenerator, DateGenerator, DATE_STRATEGY};
use crate::types::{QueryOptions, SymbiosisError, SymbiosisResult};

/// Where clause plus driver options; `options` stays absent when not given
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhereParams {
    #[serde(rename = "where")]
    pub r#where: Conditions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<QueryOptions>,
}

impl WhereParams {
    pub fn new(r#where: impl Into<Conditions>) -> Self {
        Self {
            r#where: r#where.into(),
            options: None,
        }
    }

    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = Some(options);
        self
    }
}

/// Database-shape soft delete: the rows to mark and how to mark them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoftDeleteOutput {
    #[serde(rename = "where")]
    pub r#where: Conditions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<QueryOptions>,
    /// Physical name of the delete date column
    pub delete_column: String,
    pub deleted_at: Value,
}

impl Repository {
    fn before_where(&self, params: WhereParams) -> SymbiosisResult<WhereParams> {
        Ok(WhereParams {
            r#where: self
                .entity_manager()
                .format_conditions(self.entity(), &params.r#where)?,
            options: params.options,
        })
    }

    /// The column soft deletes write to, `ColumnNotFound` if the entity has none
    pub fn delete_date_column(&self) -> SymbiosisResult<&ColumnMetadata> {
        self.metadata()?.delete_date_column().ok_or_else(|| {
            SymbiosisError::column_not_found(self.entity().name(), "DeleteDateColumn")
        })
    }

    pub fn before_delete(&self, params: WhereParams) -> SymbiosisResult<WhereParams> {
        self.before_where(params)
    }

    pub fn after_delete(&self, affected: u64) -> u64 {
        affected
    }

    pub fn before_soft_delete(&self, params: WhereParams) -> SymbiosisResult<SoftDeleteOutput> {
        let delete_column = self.delete_date_column()?.database_name.clone();
        let deleted_at = match self.entity_manager().generators().get(DATE_STRATEGY) {
            Some(generator) => generator.generate(),
            None => DateGenerator.generate(),
        };
        let WhereParams { r#where, options } = self.before_where(params)?;

        Ok(SoftDeleteOutput {
            r#where,
            options,
            delete_column,
            deleted_at,
        })
    }

    pub fn after_soft_delete(&self, affected: u64) -> u64 {
        affected
    }

    /// Same as `before_delete`; clients resolve the column to clear with `delete_date_column`
    pub fn before_recover(&self, params: WhereParams) -> SymbiosisResult<WhereParams> {
        self.before_where(params)
    }

    pub fn after_recover(&self, affected: u64) -> u64 {
        affected
    }

    pub fn before_count(&self, params: WhereParams) -> SymbiosisResult<WhereParams> {
        self.before_where(params)
    }

    pub fn after_count(&self, count: u64) -> u64 {
        count
    }

    pub fn before_performative_count(&self, params: WhereParams) -> SymbiosisResult<WhereParams> {
        self.before_where(params)
    }

    pub fn after_performative_count(&self, count: u64) -> u64 {
        count
    }
}
