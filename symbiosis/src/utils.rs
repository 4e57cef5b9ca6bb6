use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::types::{Record, SymbiosisError, SymbiosisResult};

/// Serialize a typed entity into an entity-shape record
pub fn to_record<T: Serialize>(entity: &T) -> SymbiosisResult<Record> {
    match serde_json::to_value(entity) {
        Ok(Value::Object(record)) => Ok(record),
        Ok(other) => Err(SymbiosisError::invalid_param(
            "Entity doesn't serialize to an object",
            vec![format!("Value: {}", other)],
        )),
        Err(err) => Err(SymbiosisError::invalid_param(
            "Entity can't be serialized",
            vec![err.to_string()],
        )),
    }
}

/// Deserialize an entity-shape record into a typed entity
pub fn from_record<T: DeserializeOwned>(record: Record) -> SymbiosisResult<T> {
    serde_json::from_value(Value::Object(record)).map_err(|err| {
        SymbiosisError::invalid_param("Record doesn't match the entity", vec![err.to_string()])
    })
}

/// Build a `Record` from a `serde_json::json!` object literal
#[macro_export]
macro_rules! record {
    ($($tt:tt)*) => {
        match $crate::serde_json::json!({ $($tt)* }) {
            $crate::serde_json::Value::Object(record) => record,
            _ => $crate::serde_json::Map::new(),
        }
    };
}
