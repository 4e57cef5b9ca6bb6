mod attributes;
mod code_gen;
mod types;

use proc_macro2::TokenStream;
use syn::spanned::Spanned;
use syn::DeriveInput;

use crate::errors::SymbiosisMacroError;
use attributes::{extract_entity_options, extract_members};
use code_gen::generate_entity_impl;

pub fn generate_entity(input: &DeriveInput) -> syn::Result<TokenStream> {
    let fields = match &input.data {
        syn::Data::Struct(syn::DataStruct {
            fields: syn::Fields::Named(fields),
            ..
        }) => fields,
        _ => return Err(SymbiosisMacroError::NotAStruct.into_syn(input.ident.span())),
    };

    if !input.generics.params.is_empty() {
        return Err(SymbiosisMacroError::GenericEntity {
            entity_name: input.ident.to_string(),
        }
        .into_syn(input.generics.span()));
    }

    let options = extract_entity_options(input)?;
    let members = extract_members(fields, &options)?;

    Ok(generate_entity_impl(&input.ident, &options, &members))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(source: &str) -> syn::Result<String> {
        let input: DeriveInput = syn::parse_str(source)?;
        generate_entity(&input).map(|tokens| tokens.to_string())
    }

    #[test]
    fn test_columns_and_relations_are_declared() {
        let expanded = expand(
            r#"
            #[symbiosis(name = "tests", rename_all = "camelCase")]
            struct Test {
                #[primary_column(name = "ID")]
                id: String,
                #[column]
                foo_bar: Option<i32>,
                #[one_to_many(column = "id", target_column = "testId")]
                sub_tests: Vec<SubTest>,
                cache: u8,
            }
            "#,
        )
        .unwrap();

        assert!(expanded.contains("\"Test\""));
        assert!(expanded.contains("table_name"));
        assert!(expanded.contains("\"tests\""));
        assert!(expanded.contains("\"ID\""));
        assert!(expanded.contains("\"fooBar\""));
        assert!(expanded.contains("one_to_many"));
        assert!(expanded.contains("\"subTests\""));
        assert!(expanded.contains("\"testId\""));
        assert!(!expanded.contains("cache"));
    }

    #[test]
    fn test_column_value_options() {
        let expanded = expand(
            r#"
            struct Test {
                #[primary_generated_column(strategy = "serial", by_database)]
                id: i64,
                #[column(default_value = "draft", enum_values = ["draft", "published"])]
                status: String,
                #[column(extras(indexed = true, owner = "billing"))]
                total: f64,
                #[column(embedded)]
                address: Option<Address>,
                #[column(embedded)]
                past_addresses: Vec<Address>,
            }
            "#,
        )
        .unwrap();

        assert!(expanded.contains("database_generated"));
        assert!(expanded.contains("default_value"));
        assert!(expanded.contains("enum_values"));
        assert!(expanded.contains("\"published\""));
        assert!(expanded.contains("extras"));
        assert!(expanded.contains("\"indexed\""));
        assert!(expanded.contains("\"owner\""));
        assert!(expanded.contains("embedded ::"));
        assert!(expanded.contains("embedded_many ::"));
        assert!(expanded.contains("\"past_addresses\""));
    }

    #[test]
    fn test_invalid_declarations_fail() {
        let err = expand("enum Test { A }").unwrap_err();
        assert!(err.to_string().contains("structs with named fields"));

        let err = expand("struct Test<T> { #[column] foo: T }").unwrap_err();
        assert!(err.to_string().contains("can't be generic"));

        let err = expand("struct Test { #[column] #[primary_column] foo: i32 }").unwrap_err();
        assert!(err.to_string().contains("more than one column"));

        let err = expand("struct Test { #[one_to_many(column = \"id\")] subs: Vec<Sub> }").unwrap_err();
        assert!(err.to_string().contains("target_column"));

        let err = expand("struct Test { #[save_date_column(type = \"Date\")] at: String }").unwrap_err();
        assert!(err.to_string().contains("not valid on #[save_date_column]"));

        let err = expand("struct Test { #[column(by_database)] foo: i32 }").unwrap_err();
        assert!(err.to_string().contains("not valid on #[column]"));

        let err = expand("struct Test { #[primary_column(embedded)] foo: Address }").unwrap_err();
        assert!(err.to_string().contains("not valid on #[primary_column]"));

        let err = expand("struct Test { #[column(embedded, type = \"Object\")] foo: Address }")
            .unwrap_err();
        assert!(err.to_string().contains("not valid on #[column(embedded)]"));
    }
}
