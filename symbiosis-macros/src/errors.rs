//! Error types for macro compilation failures
//! These point at the offending item with an actionable message

use proc_macro2::Span;
use syn::Error;

/// Macro compilation errors with clear guidance
#[derive(Debug, thiserror::Error)]
pub enum SymbiosisMacroError {
    #[error("#[derive(Entity)] only supports structs with named fields.")]
    NotAStruct,

    #[error("Entity '{entity_name}' can't be generic: entities are registered by a single class name.")]
    GenericEntity { entity_name: String },

    #[error("Field '{field_name}' has more than one column or relation attribute. Pick exactly one of #[column], #[primary_column], #[primary_generated_column], #[save_date_column], #[update_date_column], #[delete_date_column], #[one_to_many], #[many_to_one], #[one_to_one].")]
    ConflictingAttributes { field_name: String },

    #[error("Missing '{attribute}' for relation '{field_name}'.\n\nExample:\n    #[one_to_many(column = \"id\", target_column = \"userId\")]\n    posts: Vec<Post>,")]
    MissingRelationAttribute {
        field_name: String,
        attribute: String,
    },

    #[error("Unsupported rename_all value '{value}'. Supported values: camelCase, snake_case, PascalCase, SCREAMING_SNAKE_CASE.")]
    UnsupportedRenameRule { value: String },

    #[error("Option '{option}' is not valid on #[{attribute}].")]
    UnsupportedOption { attribute: String, option: String },
}

impl SymbiosisMacroError {
    /// Convert to syn::Error for compilation
    pub fn into_syn(self, span: Span) -> Error {
        Error::new(span, self.to_string())
    }
}
