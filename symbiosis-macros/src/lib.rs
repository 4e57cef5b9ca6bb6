#![crate_type = "proc-macro"]

extern crate proc_macro;
mod common;
mod entity;
mod errors;

use proc_macro::TokenStream;

/// Implements `symbiosis::Entity` from field attributes.
///
/// ```ignore
/// #[derive(Entity)]
/// #[symbiosis(name = "users", rename_all = "camelCase")]
/// struct User {
///     #[primary_generated_column]
///     id: String,
///     #[column(name = "FOO")]
///     foo: i32,
///     #[column(default_value = "active", enum_values = ["active", "banned"])]
///     status: String,
///     #[column(embedded)]
///     address: Option<Address>,
///     #[one_to_many(column = "id", target_column = "userId")]
///     posts: Vec<Post>,
/// }
/// ```
///
/// `#[column(embedded)]` stores one `T: Entity` (or a `Vec<T>`) in the column and
/// registers `T` as a sub entity. Generated columns accept `by_database` when the
/// database fills them.
#[proc_macro_derive(
    Entity,
    attributes(
        symbiosis,
        column,
        primary_column,
        primary_generated_column,
        save_date_column,
        update_date_column,
        delete_date_column,
        one_to_many,
        many_to_one,
        one_to_one
    )
)]
pub fn entity_derive(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);
    entity::generate_entity(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
