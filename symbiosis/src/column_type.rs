//! Column type resolution.
//!
//! Every declared column carries a `ColumnType`. The derive macro resolves it from
//! the Rust field type through `ColumnTypeOf`, the explicit declaration API takes
//! it directly. Primary columns are restricted to simple types.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::types::{SymbiosisError, SymbiosisResult};

/// Logical type of a column, as seen by the conversion layer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColumnType {
    String,
    Number,
    Boolean,
    Date,
    Array(Box<ColumnType>),
    Object,
    Custom(String),
}

impl ColumnType {
    /// Resolve the column type of a Rust type
    pub fn of<T: ColumnTypeOf + ?Sized>() -> Self {
        T::column_type()
    }

    pub fn array_of(inner: ColumnType) -> Self {
        ColumnType::Array(Box::new(inner))
    }

    pub fn custom(name: impl Into<String>) -> Self {
        ColumnType::Custom(name.into())
    }

    /// Whether the type belongs to the allow-list usable by primary columns
    pub fn is_simple(&self) -> bool {
        matches!(
            self,
            ColumnType::String | ColumnType::Number | ColumnType::Boolean
        )
    }

    pub fn name(&self) -> String {
        match self {
            ColumnType::String => "String".to_string(),
            ColumnType::Number => "Number".to_string(),
            ColumnType::Boolean => "Boolean".to_string(),
            ColumnType::Date => "Date".to_string(),
            ColumnType::Array(inner) => format!("Array<{}>", inner.name()),
            ColumnType::Object => "Object".to_string(),
            ColumnType::Custom(name) => name.clone(),
        }
    }
}

impl core::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.name())
    }
}

/// Validate the type of a primary column.
///
/// Only strings, numbers and booleans can identify a record; arrays, dates,
/// objects and custom types fail with `INVALID_PARAM_TYPE`.
pub fn resolve_primary_type(
    entity: &str,
    property: &str,
    column_type: &ColumnType,
) -> SymbiosisResult<ColumnType> {
    if column_type.is_simple() {
        return Ok(column_type.clone());
    }
    log::debug!(
        target: "symbiosis",
        "rejecting primary column {}.{} of type {}",
        entity,
        property,
        column_type
    );
    Err(SymbiosisError::invalid_param_type(entity, property))
}

/// Maps a Rust type onto the `ColumnType` used in metadata.
///
/// Implement it for your own types to use them as column fields with the derive
/// macro; custom types usually answer `ColumnType::Custom`.
pub trait ColumnTypeOf {
    fn column_type() -> ColumnType;
}

macro_rules! impl_column_type_of {
    ($variant:ident => $($ty:ty),* $(,)?) => {
        $(
            impl ColumnTypeOf for $ty {
                fn column_type() -> ColumnType {
                    ColumnType::$variant
                }
            }
        )*
    };
}

impl_column_type_of!(String => String, str, char, uuid::Uuid);
impl_column_type_of!(
    Number => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    rust_decimal::Decimal
);
impl_column_type_of!(Boolean => bool);
impl_column_type_of!(
    Date => chrono::NaiveDateTime, chrono::NaiveDate, chrono::NaiveTime
);
impl_column_type_of!(Object => serde_json::Value, serde_json::Map<String, serde_json::Value>);

impl<Tz: chrono::TimeZone> ColumnTypeOf for chrono::DateTime<Tz> {
    fn column_type() -> ColumnType {
        ColumnType::Date
    }
}

// Optional fields share the type of what they wrap
impl<T: ColumnTypeOf> ColumnTypeOf for Option<T> {
    fn column_type() -> ColumnType {
        T::column_type()
    }
}

impl<T: ColumnTypeOf + ?Sized> ColumnTypeOf for &T {
    fn column_type() -> ColumnType {
        T::column_type()
    }
}

impl<T: ColumnTypeOf + ?Sized> ColumnTypeOf for Box<T> {
    fn column_type() -> ColumnType {
        T::column_type()
    }
}

impl<T: ColumnTypeOf> ColumnTypeOf for Vec<T> {
    fn column_type() -> ColumnType {
        ColumnType::array_of(T::column_type())
    }
}

impl<T: ColumnTypeOf> ColumnTypeOf for [T] {
    fn column_type() -> ColumnType {
        ColumnType::array_of(T::column_type())
    }
}

impl<T: ColumnTypeOf> ColumnTypeOf for HashSet<T> {
    fn column_type() -> ColumnType {
        ColumnType::array_of(T::column_type())
    }
}

impl<T: ColumnTypeOf> ColumnTypeOf for BTreeSet<T> {
    fn column_type() -> ColumnType {
        ColumnType::array_of(T::column_type())
    }
}

impl<K, V> ColumnTypeOf for HashMap<K, V> {
    fn column_type() -> ColumnType {
        ColumnType::Object
    }
}

impl<K, V> ColumnTypeOf for BTreeMap<K, V> {
    fn column_type() -> ColumnType {
        ColumnType::Object
    }
}
