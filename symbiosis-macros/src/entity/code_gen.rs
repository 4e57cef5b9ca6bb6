use proc_macro2::TokenStream;
use quote::quote;
use syn::Ident;

use crate::common::{is_vec, relation_target_type};

use super::types::{Column, ColumnKind, EntityOptions, Member, Relation, RelationKind};

/// Tokens building the `ColumnType` of an explicit `type = "..."` override
fn column_type_from_name(name: &str) -> TokenStream {
    match name {
        "String" => quote! { ::symbiosis::ColumnType::String },
        "Number" => quote! { ::symbiosis::ColumnType::Number },
        "Boolean" => quote! { ::symbiosis::ColumnType::Boolean },
        "Date" => quote! { ::symbiosis::ColumnType::Date },
        "Object" => quote! { ::symbiosis::ColumnType::Object },
        _ => match name.strip_prefix("Array<").and_then(|rest| rest.strip_suffix('>')) {
            Some(inner) => {
                let inner = column_type_from_name(inner);
                quote! { ::symbiosis::ColumnType::array_of(#inner) }
            }
            None => quote! { ::symbiosis::ColumnType::custom(#name) },
        },
    }
}

fn generate_column(column: &Column) -> TokenStream {
    let property_name = &column.property_name;
    let ty = &column.ty;
    let column_type = match &column.type_override {
        Some(name) => column_type_from_name(name),
        None => quote! { <#ty as ::symbiosis::ColumnTypeOf>::column_type() },
    };

    let constructor = match column.kind {
        ColumnKind::Column if column.embedded => {
            let target = relation_target_type(ty);
            if is_vec(ty) {
                quote! { embedded_many::<#target>(#property_name) }
            } else {
                quote! { embedded::<#target>(#property_name) }
            }
        }
        ColumnKind::Column => quote! { column(#property_name, #column_type) },
        ColumnKind::PrimaryColumn => quote! { primary(#property_name, #column_type) },
        ColumnKind::PrimaryGeneratedColumn => {
            quote! { primary_generated(#property_name, #column_type) }
        }
        ColumnKind::SaveDateColumn => quote! { save_date(#property_name) },
        ColumnKind::UpdateDateColumn => quote! { update_date(#property_name) },
        ColumnKind::DeleteDateColumn => quote! { delete_date(#property_name) },
    };

    let name = column.name.as_ref().map(|name| quote! { .name(#name) });
    let comment = column.comment.as_ref().map(|comment| quote! { .comment(#comment) });
    let database_type = column
        .database_type
        .as_ref()
        .map(|database_type| quote! { .database_type(#database_type) });
    let strategy = column
        .strategy
        .as_ref()
        .map(|strategy| quote! { .strategy(#strategy) });
    let by_database = column.by_database.then(|| quote! { .database_generated() });
    let default_value = column
        .default_value
        .as_ref()
        .map(|value| quote! { .default_value(::symbiosis::serde_json::json!(#value)) });
    let enum_values = column.enum_values.as_ref().map(|values| {
        quote! {
            .enum_values({
                let values: ::std::vec::Vec<::symbiosis::serde_json::Value> =
                    ::std::vec![#(::symbiosis::serde_json::json!(#values)),*];
                values
            })
        }
    });
    let extras = (!column.extras.is_empty()).then(|| {
        let keys = column.extras.iter().map(|(key, _)| key);
        let values = column.extras.iter().map(|(_, value)| value);
        quote! { .extras(::symbiosis::record! { #(#keys: #values),* }) }
    });

    quote! {
        .column(
            ::symbiosis::ColumnDeclaration::#constructor
                #name
                #comment
                #database_type
                #strategy
                #by_database
                #default_value
                #enum_values
                #extras
        )
    }
}

fn generate_relation(relation: &Relation) -> TokenStream {
    let property_name = &relation.property_name;
    let target = &relation.target;
    let column = &relation.column;
    let target_column = &relation.target_column;
    let constructor = match relation.kind {
        RelationKind::OneToMany => quote! { one_to_many },
        RelationKind::ManyToOne => quote! { many_to_one },
        RelationKind::OneToOne => quote! { one_to_one },
    };

    quote! {
        .relation(::symbiosis::RelationDeclaration::#constructor::<#target>(
            #property_name,
            #column,
            #target_column,
        ))
    }
}

/// The `Entity` impl for `ident`
pub fn generate_entity_impl(ident: &Ident, options: &EntityOptions, members: &[Member]) -> TokenStream {
    let class_name = options
        .class_name
        .clone()
        .unwrap_or_else(|| ident.to_string());
    let table_name = options
        .table_name
        .as_ref()
        .map(|name| quote! { .table_name(#name) });
    let sub_entity = options.sub_entity.then(|| quote! { .sub_entity() });

    let members = members.iter().map(|member| match member {
        Member::Column(column) => generate_column(column),
        Member::Relation(relation) => generate_relation(relation),
    });

    quote! {
        impl ::symbiosis::Entity for #ident {
            const NAME: &'static str = #class_name;

            fn declare() -> ::symbiosis::EntityDeclaration {
                ::symbiosis::EntityDeclaration::new()
                    #table_name
                    #sub_entity
                    #(#members)*
            }
        }
    }
}
