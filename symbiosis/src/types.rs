use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Plain mapping used for both entity-shaped and database-shaped data.
pub type Record = serde_json::Map<String, Value>;

// Crate-wide result alias for ergonomics
pub type SymbiosisResult<T> = std::result::Result<T, SymbiosisError>;

/// Machine readable error code carried by every `SymbiosisError`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    EntityError,
    ColumnError,
    InvalidParamType,
    InvalidParam,
    DuplicatedEntity,
    DuplicatedColumn,
    UnknownGenerationStrategy,
    InvalidPipelineState,
    DriverError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::EntityError => "ENTITY_ERROR",
            ErrorCode::ColumnError => "COLUMN_ERROR",
            ErrorCode::InvalidParamType => "INVALID_PARAM_TYPE",
            ErrorCode::InvalidParam => "INVALID_PARAM",
            ErrorCode::DuplicatedEntity => "DUPLICATED_ENTITY",
            ErrorCode::DuplicatedColumn => "DUPLICATED_COLUMN",
            ErrorCode::UnknownGenerationStrategy => "UNKNOWN_GENERATION_STRATEGY",
            ErrorCode::InvalidPipelineState => "INVALID_PIPELINE_STATE",
            ErrorCode::DriverError => "DRIVER_ERROR",
        }
    }
}

impl core::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which layer raised the error: this library or the database driver it delegates to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorOrigin {
    Symbiosis,
    Driver,
}

impl core::fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ErrorOrigin::Symbiosis => f.write_str("SYMBIOSIS"),
            ErrorOrigin::Driver => f.write_str("DRIVER"),
        }
    }
}

/// Coarse classification of an error, independent of its message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    EntityNotRegistered,
    ColumnNotFound,
    InvalidParamType,
    Other,
}

/// Typed errors raised by the metadata registry, the conversions and the hook pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{origin}::{code}: {message}")]
pub struct SymbiosisError {
    pub code: ErrorCode,
    pub origin: ErrorOrigin,
    pub message: String,
    pub details: Vec<String>,
}

impl SymbiosisError {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Vec<String>) -> Self {
        Self {
            code,
            origin: ErrorOrigin::Symbiosis,
            message: message.into(),
            details,
        }
    }

    /// Create an error for a lookup on an entity that was never registered
    pub fn entity_not_registered(entity: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::EntityError,
            "Entity not Registered",
            vec![format!("Entity: {}", entity.into())],
        )
    }

    /// Create an error for a lookup on a column the entity does not declare
    pub fn column_not_found(entity: impl Into<String>, column: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ColumnError,
            "Column not found",
            vec![
                format!("Entity: {}", entity.into()),
                format!("Column: {}", column.into()),
            ],
        )
    }

    /// Create an error for a primary column declared with a composite type
    pub fn invalid_param_type(entity: impl Into<String>, column: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InvalidParamType,
            "Column type isn't supported",
            vec![
                format!("Entity: {}", entity.into()),
                format!("Column: {}", column.into()),
            ],
        )
    }

    /// Create an error for invalid caller input
    pub fn invalid_param(message: impl Into<String>, details: Vec<String>) -> Self {
        Self::new(ErrorCode::InvalidParam, message, details)
    }

    pub fn duplicated_entity(entity: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::DuplicatedEntity,
            "Entity already registered",
            vec![format!("Entity: {}", entity.into())],
        )
    }

    pub fn duplicated_column(entity: impl Into<String>, column: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::DuplicatedColumn,
            "Column already declared",
            vec![
                format!("Entity: {}", entity.into()),
                format!("Column: {}", column.into()),
            ],
        )
    }

    pub fn unknown_generation_strategy(
        entity: impl Into<String>,
        column: impl Into<String>,
        strategy: impl Into<String>,
    ) -> Self {
        Self::new(
            ErrorCode::UnknownGenerationStrategy,
            "Auto generation strategy not registered",
            vec![
                format!("Entity: {}", entity.into()),
                format!("Column: {}", column.into()),
                format!("Strategy: {}", strategy.into()),
            ],
        )
    }

    pub fn invalid_pipeline_state(
        operation: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::new(
            ErrorCode::InvalidPipelineState,
            "Hook pipeline stage called out of order",
            vec![
                format!("Operation: {}", operation.into()),
                format!("Expected: {}", expected.into()),
                format!("Actual: {}", actual.into()),
            ],
        )
    }

    /// Create an error raised by the underlying database driver
    pub fn driver(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::DriverError,
            origin: ErrorOrigin::Driver,
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.details.push(detail.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        match self.code {
            ErrorCode::EntityError => ErrorKind::EntityNotRegistered,
            ErrorCode::ColumnError => ErrorKind::ColumnNotFound,
            ErrorCode::InvalidParamType => ErrorKind::InvalidParamType,
            _ => ErrorKind::Other,
        }
    }

    /// Check if this is a recoverable error
    pub fn is_recoverable(&self) -> bool {
        match self.origin {
            // Driver errors might be transient (connection drops, timeouts)
            ErrorOrigin::Driver => true,
            // Schema and lookup errors never fix themselves
            ErrorOrigin::Symbiosis => false,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        if self.details.is_empty() {
            return self.message.clone();
        }
        format!("{} ({})", self.message, self.details.join(", "))
    }
}

/// Lifecycle events that can trigger auto generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Event {
    Save,
    Insert,
    Update,
    Upsert,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::Save => "save",
            Event::Insert => "insert",
            Event::Update => "update",
            Event::Upsert => "upsert",
        }
    }
}

/// Direction in which an auto generated value is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AutoGenerationType {
    /// The library produces the value before handing data to the driver
    EntityToDatabase,
    /// The database produces the value, nothing is injected on writes
    DatabaseToEntity,
}

/// What the conversions do with keys that match no declared column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnknownKeyPolicy {
    /// Keep the key and value untouched
    #[default]
    PassThrough,
    /// Drop the key from the converted output
    Discard,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Options forwarded untouched to the driver
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,
    #[serde(flatten)]
    pub extras: Record,
}

impl QueryOptions {
    pub fn with_retries(retries: u32) -> Self {
        Self {
            retries: Some(retries),
            extras: Record::new(),
        }
    }
}

/// Either a single item or an ordered sequence of items.
///
/// Used for write payloads (`save` accepts one record or many) and for where
/// clauses, where a sequence means logical OR across its elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn len(&self) -> usize {
        match self {
            OneOrMany::One(_) => 1,
            OneOrMany::Many(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        match self {
            OneOrMany::One(item) => std::slice::from_ref(item).iter(),
            OneOrMany::Many(items) => items.iter(),
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }

    /// Apply `f` to every element, keeping the one/many shape
    pub fn try_map<U, E>(
        self,
        mut f: impl FnMut(T) -> Result<U, E>,
    ) -> Result<OneOrMany<U>, E> {
        Ok(match self {
            OneOrMany::One(item) => OneOrMany::One(f(item)?),
            OneOrMany::Many(items) => {
                OneOrMany::Many(items.into_iter().map(f).collect::<Result<Vec<_>, _>>()?)
            }
        })
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> OneOrMany<U> {
        match self {
            OneOrMany::One(item) => OneOrMany::One(f(item)),
            OneOrMany::Many(items) => OneOrMany::Many(items.into_iter().map(f).collect()),
        }
    }
}

impl<T> From<T> for OneOrMany<T> {
    fn from(item: T) -> Self {
        OneOrMany::One(item)
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(items: Vec<T>) -> Self {
        OneOrMany::Many(items)
    }
}
