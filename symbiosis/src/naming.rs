//! Naming strategies translating logical names into physical names.
//!
//! Strategies run once, while the registry is built; conversions only read the
//! cached `database_name`.

use heck::{ToLowerCamelCase, ToPascalCase, ToShoutySnakeCase, ToSnakeCase};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NamingStrategy {
    /// Keep the logical name as is
    #[default]
    Default,
    /// `testId` -> `TEST_ID`
    UpperCase,
    /// `testId` -> `test_id`
    SnakeCase,
    /// `test_id` -> `testId`
    CamelCase,
    /// `test_id` -> `TestId`
    PascalCase,
}

impl NamingStrategy {
    pub fn apply(&self, name: &str) -> String {
        match self {
            NamingStrategy::Default => name.to_string(),
            NamingStrategy::UpperCase => name.to_shouty_snake_case(),
            NamingStrategy::SnakeCase => name.to_snake_case(),
            NamingStrategy::CamelCase => name.to_lower_camel_case(),
            NamingStrategy::PascalCase => name.to_pascal_case(),
        }
    }
}

/// Resolve the physical name of a column or table.
///
/// Returns the name together with the `is_name_already_formatted` flag: an
/// explicit name is used verbatim, otherwise the strategy is applied.
pub fn resolve_database_name(
    explicit: Option<&str>,
    logical: &str,
    strategy: NamingStrategy,
) -> (String, bool) {
    match explicit {
        Some(name) => (name.to_string(), true),
        None => (strategy.apply(logical), false),
    }
}
