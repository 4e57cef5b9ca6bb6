//! Value generators backing auto generated columns.
//!
//! A column names its strategy by id (`"uuid"`, `"date"`, ...). The ids are
//! resolved against a `GeneratorRegistry` while entities are registered, so an
//! unknown id fails the connection build instead of the first write.

use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub const UUID_STRATEGY: &str = "uuid";
pub const DATE_STRATEGY: &str = "date";

/// Produces a fresh value for an auto generated column
pub trait AutoGenerator: Send + Sync {
    fn generate(&self) -> Value;
}

impl<F> AutoGenerator for F
where
    F: Fn() -> Value + Send + Sync,
{
    fn generate(&self) -> Value {
        self()
    }
}

/// Random v4 UUID rendered as a string
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl AutoGenerator for UuidGenerator {
    fn generate(&self) -> Value {
        Value::String(uuid::Uuid::new_v4().to_string())
    }
}

/// Current UTC time as an RFC 3339 string
#[derive(Debug, Clone, Copy, Default)]
pub struct DateGenerator;

impl AutoGenerator for DateGenerator {
    fn generate(&self) -> Value {
        Value::String(chrono::Utc::now().to_rfc3339())
    }
}

static BUILT_IN: Lazy<HashMap<String, Arc<dyn AutoGenerator>>> = Lazy::new(|| {
    let mut generators: HashMap<String, Arc<dyn AutoGenerator>> = HashMap::new();
    generators.insert(UUID_STRATEGY.to_string(), Arc::new(UuidGenerator));
    generators.insert(DATE_STRATEGY.to_string(), Arc::new(DateGenerator));
    generators
});

/// Strategy id to generator map, seeded with the built-in strategies
#[derive(Clone)]
pub struct GeneratorRegistry {
    generators: HashMap<String, Arc<dyn AutoGenerator>>,
}

impl GeneratorRegistry {
    /// Registry without any strategy, not even the built-in ones
    pub fn empty() -> Self {
        Self {
            generators: HashMap::new(),
        }
    }

    /// Add or replace the generator behind `strategy`
    pub fn register(&mut self, strategy: impl Into<String>, generator: impl AutoGenerator + 'static) {
        let strategy = strategy.into();
        log::debug!(target: "symbiosis", "registering generator for strategy {}", strategy);
        self.generators.insert(strategy, Arc::new(generator));
    }

    pub fn get(&self, strategy: &str) -> Option<&Arc<dyn AutoGenerator>> {
        self.generators.get(strategy)
    }

    pub fn contains(&self, strategy: &str) -> bool {
        self.generators.contains_key(strategy)
    }

    pub fn strategies(&self) -> Vec<&str> {
        let mut strategies: Vec<&str> = self.generators.keys().map(String::as_str).collect();
        strategies.sort_unstable();
        strategies
    }
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        Self {
            generators: BUILT_IN.clone(),
        }
    }
}

impl fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorRegistry")
            .field("strategies", &self.strategies())
            .finish()
    }
}
