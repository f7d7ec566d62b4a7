//! `#[derive(Inject)]` expansion.

use darling::ast::Data;
use darling::{Error, FromDeriveInput, FromField};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, DeriveInput, GenericArgument, Ident, LitStr, PathArguments, Type};

#[derive(FromDeriveInput)]
#[darling(supports(struct_named))]
struct InjectInput {
    ident: Ident,
    generics: syn::Generics,
    data: Data<(), InjectField>,
}

#[derive(FromField)]
#[darling(forward_attrs(inject))]
struct InjectField {
    ident: Option<Ident>,
    ty: Type,
    attrs: Vec<Attribute>,
}

/// One annotated field, ready for code generation.
struct Wire {
    field: Ident,
    annotation: LitStr,
    /// The type looked up in the container.
    bound: Type,
    optional: bool,
}

pub(crate) fn expand(input: &DeriveInput) -> darling::Result<TokenStream> {
    let input = InjectInput::from_derive_input(input)?;
    let fields = input
        .data
        .take_struct()
        .ok_or_else(|| Error::unsupported_shape("enum"))?;

    let mut errors = Error::accumulator();
    let wires: Vec<Wire> = fields
        .fields
        .into_iter()
        .filter_map(|field| errors.handle(wire(field)).flatten())
        .collect();
    errors.finish()?;

    let InjectInput { ident, generics, .. } = input;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let bindings = wires.iter().map(|wire| {
        let name = wire.field.to_string();
        let annotation = &wire.annotation;
        let bound = &wire.bound;
        quote! {
            ::wirebox::Binding::new(#name, #annotation, ::wirebox::TypeInfo::of::<#bound>())
        }
    });

    let arms = wires.iter().enumerate().map(|(index, wire)| {
        let field = &wire.field;
        let bound = &wire.bound;
        let store = if wire.optional {
            quote! { ::std::option::Option::Some(::std::clone::Clone::clone(v)) }
        } else {
            quote! { ::std::clone::Clone::clone(v) }
        };
        quote! {
            #index => match value.downcast_ref::<#bound>() {
                ::std::option::Option::Some(v) => {
                    self.#field = #store;
                    true
                }
                ::std::option::Option::None => false,
            },
        }
    });

    // Statics cannot name generic parameters, so only concrete types are
    // recorded; generic ones are still wired through `Definition::component`.
    let record = (generics.params.is_empty() && !wires.is_empty()).then(|| {
        quote! {
            ::wirebox::inventory::submit! {
                ::wirebox::AnnotatedType::of::<#ident>()
            }
        }
    });

    Ok(quote! {
        #record

        impl #impl_generics ::wirebox::Inject for #ident #ty_generics #where_clause {
            fn bindings(&self) -> ::std::vec::Vec<::wirebox::Binding> {
                ::std::vec![#(#bindings),*]
            }

            #[allow(unused_variables)]
            fn assign(&mut self, index: usize, value: &::wirebox::Value) -> bool {
                match index {
                    #(#arms)*
                    _ => false,
                }
            }
        }
    })
}

/// Reads the `#[inject("...")]` annotation of a field, if any.
fn wire(field: InjectField) -> darling::Result<Option<Wire>> {
    let mut annotations = field.attrs.iter();
    let Some(attr) = annotations.next() else {
        return Ok(None);
    };
    if let Some(extra) = annotations.next() {
        return Err(Error::custom("duplicate #[inject] attribute").with_span(extra));
    }

    let annotation: LitStr = attr.parse_args().map_err(Error::from)?;
    if annotation.value().is_empty() {
        return Err(Error::custom("dependency name must not be empty; use \"auto\" to wire by type")
            .with_span(&annotation));
    }

    let Some(ident) = field.ident else {
        return Err(Error::unsupported_shape("tuple field").with_span(attr));
    };

    let (bound, optional) = match option_inner(&field.ty) {
        Some(inner) => (inner.clone(), true),
        None => (field.ty, false),
    };

    Ok(Some(Wire {
        field: ident,
        annotation,
        bound,
        optional,
    }))
}

/// `T` for a field typed `Option<T>`.
fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    if path.qself.is_some() {
        return None;
    }
    let segment = path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    match &segment.arguments {
        PathArguments::AngleBracketed(args) if args.args.len() == 1 => match args.args.first()? {
            GenericArgument::Type(inner) => Some(inner),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand_str(source: &str) -> darling::Result<String> {
        let input: DeriveInput = syn::parse_str(source).unwrap();
        expand(&input).map(|tokens| tokens.to_string())
    }

    #[test]
    fn option_fields_bind_their_inner_type() {
        let ty: Type = syn::parse_str("Option<Arc<dyn Cache>>").unwrap();
        let inner = option_inner(&ty).unwrap();
        assert_eq!(quote!(#inner).to_string(), quote!(Arc<dyn Cache>).to_string());

        let plain: Type = syn::parse_str("Arc<Config>").unwrap();
        assert!(option_inner(&plain).is_none());
    }

    #[test]
    fn expands_annotated_fields_only() {
        let out = expand_str(
            r#"
            struct Handler {
                #[inject("config")]
                config: Arc<Config>,
                #[inject("auto")]
                cache: Option<Arc<Cache>>,
                hits: u64,
            }
            "#,
        )
        .unwrap();

        assert!(out.contains("\"config\""));
        assert!(out.contains("\"auto\""));
        assert!(out.contains("0usize =>"));
        assert!(out.contains("1usize =>"));
        assert!(!out.contains("2usize =>"));
        assert!(!out.contains("hits"));
        assert!(out.contains("AnnotatedType :: of :: < Handler >"));
    }

    #[test]
    fn generic_and_unannotated_structs_are_not_recorded() {
        let generic = expand_str("struct S<T> { #[inject(\"a\")] a: T }").unwrap();
        assert!(!generic.contains("AnnotatedType"));

        let bare = expand_str("struct S { a: u8 }").unwrap();
        assert!(!bare.contains("AnnotatedType"));
    }

    #[test]
    fn rejects_empty_names() {
        let err = expand_str("struct S { #[inject(\"\")] a: u8 }").unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn rejects_duplicate_attributes() {
        let err = expand_str("struct S { #[inject(\"a\")] #[inject(\"b\")] a: u8 }").unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn rejects_tuple_structs() {
        assert!(expand_str("struct S(#[inject(\"a\")] u8);").is_err());
    }
}
