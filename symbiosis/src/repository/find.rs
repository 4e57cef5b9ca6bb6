use serde::{Deserialize, Serialize};

use super::Repository;
use crate::find_operators::Conditions;
use crate::types::{QueryOptions, Record, SortOrder, SymbiosisResult};

/// Query of `find`: every field is optional, absent fields are left absent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FindOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select: Option<Vec<String>>,
    #[serde(default, rename = "where", skip_serializing_if = "Option::is_none")]
    pub r#where: Option<Conditions>,
    /// Sort priority follows the order of the entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<Vec<(String, SortOrder)>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub take: Option<u64>,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.select = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn r#where(mut self, conditions: impl Into<Conditions>) -> Self {
        self.r#where = Some(conditions.into());
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, order: SortOrder) -> Self {
        self.order
            .get_or_insert_with(Vec::new)
            .push((column.into(), order));
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn take(mut self, take: u64) -> Self {
        self.take = Some(take);
        self
    }
}

/// Query of `find_one`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FindOneOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select: Option<Vec<String>>,
    #[serde(default, rename = "where", skip_serializing_if = "Option::is_none")]
    pub r#where: Option<Conditions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<Vec<(String, SortOrder)>>,
}

impl From<FindOneOptions> for FindOptions {
    fn from(options: FindOneOptions) -> Self {
        Self {
            select: options.select,
            r#where: options.r#where,
            order: options.order,
            skip: None,
            take: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BeforeFindParams {
    pub conditions: FindOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<QueryOptions>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BeforeFindOneParams {
    pub conditions: FindOneOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<QueryOptions>,
}

impl Repository {
    fn format_select(&self, select: Option<Vec<String>>) -> SymbiosisResult<Option<Vec<String>>> {
        let Some(columns) = select else {
            return Ok(None);
        };
        let entries: Vec<(String, ())> = columns.into_iter().map(|column| (column, ())).collect();
        let formatted = self
            .entity_manager()
            .format_column_names(self.entity(), entries)?;
        Ok(Some(formatted.into_iter().map(|(column, _)| column).collect()))
    }

    fn format_order(
        &self,
        order: Option<Vec<(String, SortOrder)>>,
    ) -> SymbiosisResult<Option<Vec<(String, SortOrder)>>> {
        order
            .map(|entries| {
                self.entity_manager()
                    .format_column_names(self.entity(), entries)
            })
            .transpose()
    }

    fn format_where(&self, conditions: Option<Conditions>) -> SymbiosisResult<Option<Conditions>> {
        conditions
            .map(|conditions| {
                self.entity_manager()
                    .format_conditions(self.entity(), &conditions)
            })
            .transpose()
    }

    /// Renames the fields of `where`, `select` and `order`; operators are kept as they are
    pub fn before_find(&self, params: BeforeFindParams) -> SymbiosisResult<BeforeFindParams> {
        let FindOptions {
            select,
            r#where,
            order,
            skip,
            take,
        } = params.conditions;

        Ok(BeforeFindParams {
            conditions: FindOptions {
                select: self.format_select(select)?,
                r#where: self.format_where(r#where)?,
                order: self.format_order(order)?,
                skip,
                take,
            },
            options: params.options,
        })
    }

    pub fn after_find(&self, data: Vec<Record>) -> SymbiosisResult<Vec<Record>> {
        data.iter()
            .map(|row| {
                self.entity_manager()
                    .convert_database_to_entity(self.entity(), row)
            })
            .collect()
    }

    pub fn before_find_one(&self, params: BeforeFindOneParams) -> SymbiosisResult<BeforeFindOneParams> {
        let FindOneOptions {
            select,
            r#where,
            order,
        } = params.conditions;

        Ok(BeforeFindOneParams {
            conditions: FindOneOptions {
                select: self.format_select(select)?,
                r#where: self.format_where(r#where)?,
                order: self.format_order(order)?,
            },
            options: params.options,
        })
    }

    pub fn after_find_one(&self, data: Option<Record>) -> SymbiosisResult<Option<Record>> {
        data.map(|row| {
            self.entity_manager()
                .convert_database_to_entity(self.entity(), &row)
        })
        .transpose()
    }
}
