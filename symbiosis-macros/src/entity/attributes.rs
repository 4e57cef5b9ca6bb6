// Parsing of the container and field attributes understood by #[derive(Entity)]

use syn::spanned::Spanned;
use syn::{DeriveInput, LitStr};

use super::types::{Column, ColumnKind, EntityOptions, Member, Relation, RelationKind, RenameRule};
use crate::common::relation_target_type;
use crate::errors::SymbiosisMacroError;

fn parse_string(meta: &syn::meta::ParseNestedMeta) -> syn::Result<String> {
    Ok(meta.value()?.parse::<LitStr>()?.value())
}

fn unsupported(attribute: &str, meta: &syn::meta::ParseNestedMeta) -> syn::Error {
    let option = meta
        .path
        .get_ident()
        .map(ToString::to_string)
        .unwrap_or_default();
    SymbiosisMacroError::UnsupportedOption {
        attribute: attribute.to_string(),
        option,
    }
    .into_syn(meta.path.span())
}

/// Options of `#[symbiosis(name = "...", class_name = "...", rename_all = "...", sub_entity)]`
pub fn extract_entity_options(input: &DeriveInput) -> syn::Result<EntityOptions> {
    let mut options = EntityOptions::default();

    for attr in input.attrs.iter().filter(|attr| attr.path().is_ident("symbiosis")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                options.table_name = Some(parse_string(&meta)?);
            } else if meta.path.is_ident("class_name") {
                options.class_name = Some(parse_string(&meta)?);
            } else if meta.path.is_ident("rename_all") {
                let value = meta.value()?.parse::<LitStr>()?;
                let rule = RenameRule::parse(&value.value()).ok_or_else(|| {
                    SymbiosisMacroError::UnsupportedRenameRule {
                        value: value.value(),
                    }
                    .into_syn(value.span())
                })?;
                options.rename_all = Some(rule);
            } else if meta.path.is_ident("sub_entity") {
                options.sub_entity = true;
            } else {
                return Err(unsupported("symbiosis", &meta));
            }
            Ok(())
        })?;
    }

    Ok(options)
}

fn parse_column(
    attr: &syn::Attribute,
    kind: ColumnKind,
    property_name: String,
    ty: &syn::Type,
) -> syn::Result<Column> {
    let attribute = attr
        .path()
        .get_ident()
        .map(ToString::to_string)
        .unwrap_or_default();
    let mut column = Column {
        property_name,
        ty: ty.clone(),
        kind,
        name: None,
        type_override: None,
        comment: None,
        database_type: None,
        strategy: None,
        default_value: None,
        enum_values: None,
        extras: Vec::new(),
        by_database: false,
        embedded: false,
    };

    // A bare `#[column]` carries no options
    if matches!(attr.meta, syn::Meta::Path(_)) {
        return Ok(column);
    }

    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("name") {
            column.name = Some(parse_string(&meta)?);
        } else if meta.path.is_ident("comment") {
            column.comment = Some(parse_string(&meta)?);
        } else if meta.path.is_ident("database_type") {
            column.database_type = Some(parse_string(&meta)?);
        } else if meta.path.is_ident("type") && !kind.is_date() {
            column.type_override = Some(parse_string(&meta)?);
        } else if meta.path.is_ident("strategy") && kind.is_generated() {
            column.strategy = Some(parse_string(&meta)?);
        } else if meta.path.is_ident("by_database") && kind.is_generated() {
            column.by_database = true;
        } else if meta.path.is_ident("embedded") && kind == ColumnKind::Column {
            column.embedded = true;
        } else if meta.path.is_ident("default_value") {
            column.default_value = Some(meta.value()?.parse::<syn::Expr>()?);
        } else if meta.path.is_ident("enum_values") {
            let values = meta.value()?.parse::<syn::ExprArray>()?;
            column.enum_values = Some(values.elems.into_iter().collect());
        } else if meta.path.is_ident("extras") {
            meta.parse_nested_meta(|extra| {
                let key = extra
                    .path
                    .get_ident()
                    .map(ToString::to_string)
                    .ok_or_else(|| extra.error("expected an identifier"))?;
                column.extras.push((key, extra.value()?.parse::<syn::Expr>()?));
                Ok(())
            })?;
        } else {
            return Err(unsupported(&attribute, &meta));
        }
        Ok(())
    })?;

    // The embedded entity decides the column type
    if column.embedded && column.type_override.is_some() {
        return Err(SymbiosisMacroError::UnsupportedOption {
            attribute: "column(embedded)".to_string(),
            option: "type".to_string(),
        }
        .into_syn(attr.span()));
    }

    Ok(column)
}

fn parse_relation(
    attr: &syn::Attribute,
    kind: RelationKind,
    property_name: String,
    ty: &syn::Type,
) -> syn::Result<Relation> {
    let attribute = attr
        .path()
        .get_ident()
        .map(ToString::to_string)
        .unwrap_or_default();
    let mut target = None;
    let mut column = None;
    let mut target_column = None;

    if !matches!(attr.meta, syn::Meta::Path(_)) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("entity") {
                target = Some(meta.value()?.parse::<syn::Type>()?);
            } else if meta.path.is_ident("column") {
                column = Some(parse_string(&meta)?);
            } else if meta.path.is_ident("target_column") {
                target_column = Some(parse_string(&meta)?);
            } else {
                return Err(unsupported(&attribute, &meta));
            }
            Ok(())
        })?;
    }

    let missing = |name: &str| {
        SymbiosisMacroError::MissingRelationAttribute {
            field_name: property_name.clone(),
            attribute: name.to_string(),
        }
        .into_syn(attr.span())
    };
    let column = column.ok_or_else(|| missing("column"))?;
    let target_column = target_column.ok_or_else(|| missing("target_column"))?;

    Ok(Relation {
        property_name,
        kind,
        target: target.unwrap_or_else(|| relation_target_type(ty).clone()),
        column,
        target_column,
    })
}

/// Columns and relations of the struct, in field order
pub fn extract_members(fields: &syn::FieldsNamed, options: &EntityOptions) -> syn::Result<Vec<Member>> {
    let mut members = Vec::new();

    for field in &fields.named {
        let Some(ident) = &field.ident else {
            continue;
        };
        let field_name = ident.to_string();
        let field_name = field_name.trim_start_matches("r#");
        let property_name = match options.rename_all {
            Some(rule) => rule.apply(field_name),
            None => field_name.to_string(),
        };

        let mut member = None;
        for attr in &field.attrs {
            let Some(attribute) = attr.path().get_ident().map(ToString::to_string) else {
                continue;
            };
            let parsed = if let Some(kind) = ColumnKind::from_attribute(&attribute) {
                Member::Column(parse_column(attr, kind, property_name.clone(), &field.ty)?)
            } else if let Some(kind) = RelationKind::from_attribute(&attribute) {
                Member::Relation(parse_relation(attr, kind, property_name.clone(), &field.ty)?)
            } else {
                continue;
            };

            if member.replace(parsed).is_some() {
                return Err(SymbiosisMacroError::ConflictingAttributes {
                    field_name: field_name.to_string(),
                }
                .into_syn(attr.span()));
            }
        }

        members.extend(member);
    }

    Ok(members)
}
