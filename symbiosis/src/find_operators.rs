//! Find operators used inside where clauses.
//!
//! Operators are a closed set of tagged values. Key renaming never looks inside
//! them, so an operator handed to `format_conditions` comes out structurally
//! identical, only the field it is attached to gets its physical name.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::types::OneOrMany;

/// A comparison or matching operator applied to a single field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "values", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FindOperator {
    Between(Value, Value),
    EndsWith(String),
    Exist,
    In(Vec<Value>),
    Includes(Value),
    IsNull,
    LessThan(Value),
    LessThanOrEqual(Value),
    Like(String),
    MoreThan(Value),
    MoreThanOrEqual(Value),
    Not(Box<ConditionValue>),
    StartsWith(String),
}

impl FindOperator {
    pub fn name(&self) -> &'static str {
        match self {
            FindOperator::Between(..) => "BETWEEN",
            FindOperator::EndsWith(_) => "ENDS_WITH",
            FindOperator::Exist => "EXIST",
            FindOperator::In(_) => "IN",
            FindOperator::Includes(_) => "INCLUDES",
            FindOperator::IsNull => "IS_NULL",
            FindOperator::LessThan(_) => "LESS_THAN",
            FindOperator::LessThanOrEqual(_) => "LESS_THAN_OR_EQUAL",
            FindOperator::Like(_) => "LIKE",
            FindOperator::MoreThan(_) => "MORE_THAN",
            FindOperator::MoreThanOrEqual(_) => "MORE_THAN_OR_EQUAL",
            FindOperator::Not(_) => "NOT",
            FindOperator::StartsWith(_) => "STARTS_WITH",
        }
    }
}

/// Value side of a condition: either a literal to compare for equality or an operator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Operator(FindOperator),
    Value(Value),
}

impl ConditionValue {
    pub fn as_operator(&self) -> Option<&FindOperator> {
        match self {
            ConditionValue::Operator(op) => Some(op),
            ConditionValue::Value(_) => None,
        }
    }

    pub fn is_operator(&self) -> bool {
        self.as_operator().is_some()
    }
}

impl From<FindOperator> for ConditionValue {
    fn from(op: FindOperator) -> Self {
        ConditionValue::Operator(op)
    }
}

impl From<Value> for ConditionValue {
    fn from(value: Value) -> Self {
        ConditionValue::Value(value)
    }
}

macro_rules! condition_value_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ConditionValue {
                fn from(value: $ty) -> Self {
                    ConditionValue::Value(Value::from(value))
                }
            }
        )*
    };
}

condition_value_from!(bool, i32, i64, u32, u64, f64, String, &str);

/// A single where mapping: logical (or physical, once formatted) field name to value
pub type FindConditions = BTreeMap<String, ConditionValue>;

/// A where clause: one mapping, or several combined with logical OR
pub type Conditions = OneOrMany<FindConditions>;

pub fn between(from: impl Into<Value>, to: impl Into<Value>) -> FindOperator {
    FindOperator::Between(from.into(), to.into())
}

pub fn ends_with(value: impl Into<String>) -> FindOperator {
    FindOperator::EndsWith(value.into())
}

pub fn exist() -> FindOperator {
    FindOperator::Exist
}

pub fn in_values<T: Into<Value>>(values: impl IntoIterator<Item = T>) -> FindOperator {
    FindOperator::In(values.into_iter().map(Into::into).collect())
}

pub fn includes(value: impl Into<Value>) -> FindOperator {
    FindOperator::Includes(value.into())
}

pub fn is_null() -> FindOperator {
    FindOperator::IsNull
}

pub fn less_than(value: impl Into<Value>) -> FindOperator {
    FindOperator::LessThan(value.into())
}

pub fn less_than_or_equal(value: impl Into<Value>) -> FindOperator {
    FindOperator::LessThanOrEqual(value.into())
}

pub fn like(pattern: impl Into<String>) -> FindOperator {
    FindOperator::Like(pattern.into())
}

pub fn more_than(value: impl Into<Value>) -> FindOperator {
    FindOperator::MoreThan(value.into())
}

pub fn more_than_or_equal(value: impl Into<Value>) -> FindOperator {
    FindOperator::MoreThanOrEqual(value.into())
}

pub fn not(value: impl Into<ConditionValue>) -> FindOperator {
    FindOperator::Not(Box::new(value.into()))
}

pub fn starts_with(value: impl Into<String>) -> FindOperator {
    FindOperator::StartsWith(value.into())
}

/// Build a `FindConditions` mapping from `key => value` pairs.
///
/// Values go through `ConditionValue::from`, so literals, `serde_json::Value`s
/// and find operators can be mixed.
#[macro_export]
macro_rules! conditions {
    () => { $crate::FindConditions::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut __conditions = $crate::FindConditions::new();
        $( __conditions.insert(::std::string::String::from($key), $crate::ConditionValue::from($value)); )+
        __conditions
    }};
}
