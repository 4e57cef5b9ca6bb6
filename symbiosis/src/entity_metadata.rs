// Entity metadata structures and the declarations they are built from

use serde_json::Value;

use crate::column_type::ColumnType;
use crate::generators::{DATE_STRATEGY, UUID_STRATEGY};
use crate::types::{AutoGenerationType, Event, Record};

/// Implemented by every persisted type.
///
/// `declare` is the explicit counterpart of decorators: it lists the columns and
/// relations of the entity. `#[derive(Entity)]` writes it from field attributes.
pub trait Entity: 'static {
    /// Unique class name of the entity inside a connection
    const NAME: &'static str;

    fn declare() -> EntityDeclaration;
}

/// Type-erased handle to an entity, used wherever the entity "class" is passed around
#[derive(Clone, Copy)]
pub struct EntityRef {
    name: &'static str,
    declare: fn() -> EntityDeclaration,
}

impl EntityRef {
    pub fn of<T: Entity>() -> Self {
        Self {
            name: T::NAME,
            declare: T::declare,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn declare(&self) -> EntityDeclaration {
        (self.declare)()
    }
}

impl PartialEq for EntityRef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for EntityRef {}

impl core::fmt::Debug for EntityRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "EntityRef({})", self.name)
    }
}

/// Which decorator-equivalent produced a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Column,
    PrimaryColumn,
    PrimaryGeneratedColumn,
    SaveDateColumn,
    UpdateDateColumn,
    DeleteDateColumn,
}

/// Options shared by every column kind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnOptions {
    pub name: Option<String>,
    pub comment: Option<String>,
    pub database_type: Option<String>,
    pub default_value: Option<Value>,
    pub enum_values: Option<Vec<Value>>,
    pub extras: Option<Record>,
}

/// Declaration of a single column, as written by the entity author
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDeclaration {
    pub property_name: String,
    pub column_type: ColumnType,
    pub kind: ColumnKind,
    pub options: ColumnOptions,
    pub strategy: Option<String>,
    pub events: Option<Vec<Event>>,
    /// Entity embedded as the value of this column, alone or as array elements
    pub sub_entity: Option<EntityRef>,
    pub generated_by_database: bool,
}

impl ColumnDeclaration {
    fn with_kind(property_name: impl Into<String>, column_type: ColumnType, kind: ColumnKind) -> Self {
        Self {
            property_name: property_name.into(),
            column_type,
            kind,
            options: ColumnOptions::default(),
            strategy: None,
            events: None,
            sub_entity: None,
            generated_by_database: false,
        }
    }

    pub fn column(property_name: impl Into<String>, column_type: ColumnType) -> Self {
        Self::with_kind(property_name, column_type, ColumnKind::Column)
    }

    /// Column holding one embedded `T` object, registered as a sub entity
    pub fn embedded<T: Entity>(property_name: impl Into<String>) -> Self {
        let mut column = Self::column(property_name, ColumnType::custom(T::NAME));
        column.sub_entity = Some(EntityRef::of::<T>());
        column
    }

    /// Column holding an array of embedded `T` objects
    pub fn embedded_many<T: Entity>(property_name: impl Into<String>) -> Self {
        let mut column = Self::column(
            property_name,
            ColumnType::array_of(ColumnType::custom(T::NAME)),
        );
        column.sub_entity = Some(EntityRef::of::<T>());
        column
    }

    pub fn primary(property_name: impl Into<String>, column_type: ColumnType) -> Self {
        Self::with_kind(property_name, column_type, ColumnKind::PrimaryColumn)
    }

    /// Primary column filled by the library, `uuid` strategy on `save` unless overridden
    pub fn primary_generated(property_name: impl Into<String>, column_type: ColumnType) -> Self {
        Self::with_kind(property_name, column_type, ColumnKind::PrimaryGeneratedColumn)
    }

    pub fn save_date(property_name: impl Into<String>) -> Self {
        Self::with_kind(property_name, ColumnType::Date, ColumnKind::SaveDateColumn)
    }

    pub fn update_date(property_name: impl Into<String>) -> Self {
        Self::with_kind(property_name, ColumnType::Date, ColumnKind::UpdateDateColumn)
    }

    pub fn delete_date(property_name: impl Into<String>) -> Self {
        Self::with_kind(property_name, ColumnType::Date, ColumnKind::DeleteDateColumn)
    }

    /// Explicit physical name, used verbatim
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.options.name = Some(name.into());
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.options.comment = Some(comment.into());
        self
    }

    pub fn database_type(mut self, database_type: impl Into<String>) -> Self {
        self.options.database_type = Some(database_type.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.options.default_value = Some(value.into());
        self
    }

    pub fn enum_values<T: Into<Value>>(mut self, values: impl IntoIterator<Item = T>) -> Self {
        self.options.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn extras(mut self, extras: Record) -> Self {
        self.options.extras = Some(extras);
        self
    }

    /// Auto generation strategy id, only meaningful for generated columns
    pub fn strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = Some(strategy.into());
        self
    }

    /// Override the events on which a generated column is filled
    pub fn generate_on(mut self, events: impl IntoIterator<Item = Event>) -> Self {
        self.events = Some(events.into_iter().collect());
        self
    }

    /// The database fills a generated column on its own; writes never inject a value
    pub fn database_generated(mut self) -> Self {
        self.generated_by_database = true;
        self
    }

    pub fn is_primary(&self) -> bool {
        matches!(
            self.kind,
            ColumnKind::PrimaryColumn | ColumnKind::PrimaryGeneratedColumn
        )
    }

    /// Auto generation settings implied by the column kind: strategy and events
    pub(crate) fn generation(&self) -> Option<(String, Vec<Event>)> {
        let (default_strategy, default_events): (&str, &[Event]) = match self.kind {
            ColumnKind::Column | ColumnKind::PrimaryColumn | ColumnKind::DeleteDateColumn => {
                return None
            }
            ColumnKind::PrimaryGeneratedColumn => (UUID_STRATEGY, &[Event::Save]),
            ColumnKind::SaveDateColumn => (DATE_STRATEGY, &[Event::Save, Event::Insert]),
            ColumnKind::UpdateDateColumn => (
                DATE_STRATEGY,
                &[Event::Save, Event::Insert, Event::Update, Event::Upsert],
            ),
        };
        Some((
            self.strategy
                .clone()
                .unwrap_or_else(|| default_strategy.to_string()),
            self.events
                .clone()
                .unwrap_or_else(|| default_events.to_vec()),
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    OneToMany,
    ManyToOne,
    OneToOne,
}

/// Join between a source column and the foreign key column on the target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationMap {
    /// Logical column on the entity declaring the relation
    pub column_name: String,
    /// Logical column on the target entity receiving the value
    pub target_column_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelationDeclaration {
    pub property_name: String,
    pub target: EntityRef,
    pub kind: RelationKind,
    pub relation_map: RelationMap,
}

impl RelationDeclaration {
    pub fn new<T: Entity>(
        kind: RelationKind,
        property_name: impl Into<String>,
        column_name: impl Into<String>,
        target_column_name: impl Into<String>,
    ) -> Self {
        Self {
            property_name: property_name.into(),
            target: EntityRef::of::<T>(),
            kind,
            relation_map: RelationMap {
                column_name: column_name.into(),
                target_column_name: target_column_name.into(),
            },
        }
    }

    pub fn one_to_many<T: Entity>(
        property_name: impl Into<String>,
        column_name: impl Into<String>,
        target_column_name: impl Into<String>,
    ) -> Self {
        Self::new::<T>(RelationKind::OneToMany, property_name, column_name, target_column_name)
    }

    pub fn many_to_one<T: Entity>(
        property_name: impl Into<String>,
        column_name: impl Into<String>,
        target_column_name: impl Into<String>,
    ) -> Self {
        Self::new::<T>(RelationKind::ManyToOne, property_name, column_name, target_column_name)
    }

    pub fn one_to_one<T: Entity>(
        property_name: impl Into<String>,
        column_name: impl Into<String>,
        target_column_name: impl Into<String>,
    ) -> Self {
        Self::new::<T>(RelationKind::OneToOne, property_name, column_name, target_column_name)
    }
}

/// Everything an entity declares about itself
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityDeclaration {
    pub name: Option<String>,
    pub extras: Option<Record>,
    pub is_sub_entity: bool,
    pub columns: Vec<ColumnDeclaration>,
    pub relations: Vec<RelationDeclaration>,
}

impl EntityDeclaration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit table name, used verbatim
    pub fn table_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn extras(mut self, extras: Record) -> Self {
        self.extras = Some(extras);
        self
    }

    /// Mark the entity as embedded in columns of other entities rather than stored in a table
    pub fn sub_entity(mut self) -> Self {
        self.is_sub_entity = true;
        self
    }

    pub fn column(mut self, column: ColumnDeclaration) -> Self {
        self.columns.push(column);
        self
    }

    pub fn relation(mut self, relation: RelationDeclaration) -> Self {
        self.relations.push(relation);
        self
    }
}

/// Resolved metadata of a column
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMetadata {
    pub name: String,
    pub database_name: String,
    pub column_type: ColumnType,
    pub primary: bool,
    pub is_auto_generated: bool,
    pub auto_generation_type: Option<AutoGenerationType>,
    pub auto_generate: Option<String>,
    pub auto_generate_only_on_events: Vec<Event>,
    pub extras: Option<Record>,
    pub is_name_already_formatted: bool,
    pub is_delete_date: bool,
    pub comment: Option<String>,
    pub database_type: Option<String>,
    pub default_value: Option<Value>,
    pub enum_values: Option<Vec<Value>>,
    pub sub_entity: Option<EntityRef>,
}

impl ColumnMetadata {
    /// Whether the library must fill this column on `event` when the caller left it out
    pub fn generates_on(&self, event: Event) -> bool {
        self.is_auto_generated
            && self.auto_generation_type == Some(AutoGenerationType::EntityToDatabase)
            && self.auto_generate_only_on_events.contains(&event)
    }
}

/// Resolved metadata of a relation
#[derive(Debug, Clone, PartialEq)]
pub struct RelationMetadata {
    pub property_name: String,
    pub target_entity: EntityRef,
    pub kind: RelationKind,
    pub relation_map: RelationMap,
}

/// Resolved metadata of an entity
#[derive(Debug, Clone, PartialEq)]
pub struct EntityMetadata {
    pub class_name: String,
    pub database_name: String,
    pub is_name_already_formatted: bool,
    pub columns: Vec<ColumnMetadata>,
    pub relations: Vec<RelationMetadata>,
    pub is_sub_entity: bool,
    pub extras: Option<Record>,
}

impl EntityMetadata {
    pub fn column(&self, name: &str) -> Option<&ColumnMetadata> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn column_by_database_name(&self, database_name: &str) -> Option<&ColumnMetadata> {
        self.columns
            .iter()
            .find(|column| column.database_name == database_name)
    }

    pub fn primary_columns(&self) -> Vec<&ColumnMetadata> {
        self.columns.iter().filter(|column| column.primary).collect()
    }

    pub fn relation(&self, property_name: &str) -> Option<&RelationMetadata> {
        self.relations
            .iter()
            .find(|relation| relation.property_name == property_name)
    }

    /// Column written by soft deletes, if the entity declares one
    pub fn delete_date_column(&self) -> Option<&ColumnMetadata> {
        self.columns.iter().find(|column| column.is_delete_date)
    }
}
