//! Entity metadata registry and entity/database conversion layer.
//!
//! Entities declare their columns and relations once; a `Connection` turns the
//! declarations into an immutable registry, and `Repository` hooks translate
//! payloads between entity shape (logical names) and database shape (physical
//! names) around calls to a database client.

pub mod column_type;
pub mod connection;
pub mod entity_manager;
pub mod entity_metadata;
pub mod find_operators;
pub mod generators;
pub mod naming;
pub mod repository;
pub mod types;
pub mod utils;

pub use column_type::*;
pub use connection::*;
pub use entity_manager::EntityManager;
pub use entity_metadata::*;
pub use find_operators::{ConditionValue, Conditions, FindConditions, FindOperator};
pub use generators::*;
pub use naming::*;
pub use repository::*;
pub use types::*;
pub use utils::{from_record, to_record};

// Re-exported for the `record!` macro and for code generated by `#[derive(Entity)]`
#[doc(hidden)]
pub use serde_json;

#[cfg(feature = "derive")]
pub use symbiosis_macros::Entity;

/// Find operator constructors, `use symbiosis::operators::*` to bring them in scope
pub mod operators {
    pub use crate::find_operators::{
        between, ends_with, exist, in_values, includes, is_null, less_than, less_than_or_equal,
        like, more_than, more_than_or_equal, not, starts_with,
    };
}
