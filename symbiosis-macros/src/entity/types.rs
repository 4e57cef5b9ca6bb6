use heck::{ToLowerCamelCase, ToPascalCase, ToShoutySnakeCase, ToSnakeCase};

/// Rule applied to field names to get the logical property names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameRule {
    CamelCase,
    SnakeCase,
    PascalCase,
    ScreamingSnakeCase,
}

impl RenameRule {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "camelCase" => Some(RenameRule::CamelCase),
            "snake_case" => Some(RenameRule::SnakeCase),
            "PascalCase" => Some(RenameRule::PascalCase),
            "SCREAMING_SNAKE_CASE" => Some(RenameRule::ScreamingSnakeCase),
            _ => None,
        }
    }

    pub fn apply(&self, name: &str) -> String {
        match self {
            RenameRule::CamelCase => name.to_lower_camel_case(),
            RenameRule::SnakeCase => name.to_snake_case(),
            RenameRule::PascalCase => name.to_pascal_case(),
            RenameRule::ScreamingSnakeCase => name.to_shouty_snake_case(),
        }
    }
}

/// Options of `#[symbiosis(...)]` on the struct
#[derive(Debug, Clone, Default)]
pub struct EntityOptions {
    pub class_name: Option<String>,
    pub table_name: Option<String>,
    pub rename_all: Option<RenameRule>,
    pub sub_entity: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Column,
    PrimaryColumn,
    PrimaryGeneratedColumn,
    SaveDateColumn,
    UpdateDateColumn,
    DeleteDateColumn,
}

impl ColumnKind {
    pub fn from_attribute(name: &str) -> Option<Self> {
        match name {
            "column" => Some(ColumnKind::Column),
            "primary_column" => Some(ColumnKind::PrimaryColumn),
            "primary_generated_column" => Some(ColumnKind::PrimaryGeneratedColumn),
            "save_date_column" => Some(ColumnKind::SaveDateColumn),
            "update_date_column" => Some(ColumnKind::UpdateDateColumn),
            "delete_date_column" => Some(ColumnKind::DeleteDateColumn),
            _ => None,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(
            self,
            ColumnKind::PrimaryGeneratedColumn
                | ColumnKind::SaveDateColumn
                | ColumnKind::UpdateDateColumn
        )
    }

    /// Date columns have a fixed type and no `type` option
    pub fn is_date(&self) -> bool {
        matches!(
            self,
            ColumnKind::SaveDateColumn | ColumnKind::UpdateDateColumn | ColumnKind::DeleteDateColumn
        )
    }
}

#[derive(Clone)]
pub struct Column {
    pub property_name: String,
    pub ty: syn::Type,
    pub kind: ColumnKind,
    pub name: Option<String>,
    pub type_override: Option<String>,
    pub comment: Option<String>,
    pub database_type: Option<String>,
    pub strategy: Option<String>,
    pub default_value: Option<syn::Expr>,
    pub enum_values: Option<Vec<syn::Expr>>,
    pub extras: Vec<(String, syn::Expr)>,
    /// Filled by the database, never by the library
    pub by_database: bool,
    /// The field holds one or many objects of another entity
    pub embedded: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    OneToMany,
    ManyToOne,
    OneToOne,
}

impl RelationKind {
    pub fn from_attribute(name: &str) -> Option<Self> {
        match name {
            "one_to_many" => Some(RelationKind::OneToMany),
            "many_to_one" => Some(RelationKind::ManyToOne),
            "one_to_one" => Some(RelationKind::OneToOne),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct Relation {
    pub property_name: String,
    pub kind: RelationKind,
    pub target: syn::Type,
    pub column: String,
    pub target_column: String,
}

/// A field is a column, a relation, or neither (not persisted)
#[derive(Clone)]
pub enum Member {
    Column(Column),
    Relation(Relation),
}
