// Type helpers shared by the attribute parser and the code generator

/// Extract `T` from `Wrapper<T>` when the last path segment is `wrapper`
fn extract_generic_argument<'a>(ty: &'a syn::Type, wrapper: &str) -> Option<&'a syn::Type> {
    if let syn::Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            if segment.ident == wrapper {
                if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
                    if let Some(syn::GenericArgument::Type(inner)) = args.args.first() {
                        return Some(inner);
                    }
                }
            }
        }
    }
    None
}

/// Extract the inner type from Option<T>, or return the original type if not an Option
pub fn extract_inner_type_from_option(ty: &syn::Type) -> &syn::Type {
    extract_generic_argument(ty, "Option").unwrap_or(ty)
}

/// `Vec<T>` or `Option<Vec<T>>`
pub fn is_vec(ty: &syn::Type) -> bool {
    extract_generic_argument(extract_inner_type_from_option(ty), "Vec").is_some()
}

/// Entity type held by a relation field: `Vec<T>`, `Option<T>`, `Box<T>` and `T` all give `T`
pub fn relation_target_type(ty: &syn::Type) -> &syn::Type {
    let ty = extract_inner_type_from_option(ty);
    for wrapper in ["Vec", "Box"] {
        if let Some(inner) = extract_generic_argument(ty, wrapper) {
            return relation_target_type(inner);
        }
    }
    ty
}
