use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse_macro_input, parse_quote, DeriveInput, ExprPath, Field, GenericParam, Ident, LitStr,
};

/// Field level options parsed from `#[vdf(...)]`
#[derive(Default)]
struct FieldOptions {
    rename: Option<String>,
    aliases: Vec<String>,
    default: Option<ExprPath>,
    with: Option<ExprPath>,
    skip: bool,
}

impl FieldOptions {
    fn parse(field: &Field) -> syn::Result<Self> {
        let mut options = FieldOptions::default();
        for attr in field.attrs.iter().filter(|x| x.path().is_ident("vdf")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let lit: LitStr = meta.value()?.parse()?;
                    options.rename = Some(lit.value());
                } else if meta.path.is_ident("alias") {
                    let lit: LitStr = meta.value()?.parse()?;
                    options.aliases.push(lit.value());
                } else if meta.path.is_ident("default") {
                    // A bare `default` is accepted as every field falls back
                    // to `Default::default` anyways
                    if meta.input.peek(syn::Token![=]) {
                        let lit: LitStr = meta.value()?.parse()?;
                        options.default = Some(lit.parse()?);
                    }
                } else if meta.path.is_ident("with") {
                    let lit: LitStr = meta.value()?.parse()?;
                    options.with = Some(lit.parse()?);
                } else if meta.path.is_ident("skip") {
                    options.skip = true;
                } else {
                    return Err(meta.error("unsupported vdf attribute"));
                }
                Ok(())
            })?;
        }

        Ok(options)
    }
}

fn field_name(ident: &Ident) -> String {
    let name = ident.to_string();
    match name.strip_prefix("r#") {
        Some(x) => String::from(x),
        None => name,
    }
}

/// Creates a `Shape` and `FromValue` implementation for a struct with named
/// fields
///
/// ```rust,ignore
/// use appvdf::VdfShape;
///
/// #[derive(VdfShape, Default)]
/// pub struct Model {
///     name: String,
///     #[vdf(rename = "LaunchOptions")]
///     launch: String,
///     #[vdf(alias = "osarch")]
///     arch: Option<u32>,
///     #[vdf(default = "default_true")]
///     visible: bool,
/// }
///
/// fn default_true() -> bool {
///     true
/// }
/// ```
///
/// Every field is populated from the object entry whose key matches the
/// field name, ignoring ascii case and underscores. When several entries
/// match, the last one wins. Fields without a match keep their default.
///
/// Supported field attributes:
///
/// - `#[vdf(rename = "...")]`: match this name instead of the field name
/// - `#[vdf(alias = "...")]`: also match this name, may be repeated
/// - `#[vdf(default = "...")]`: function called for the initial value
/// - `#[vdf(with = "...")]`: convert with `fn(&Value, &mut Projector) -> Option<T>`
/// - `#[vdf(skip)]`: never populate this field
///
/// Type parameters are bound by `FromValue` and `Default`. The generated code
/// refers to the `appvdf` crate by name.
#[proc_macro_derive(VdfShape, attributes(vdf))]
pub fn derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(x) => x.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand(input: DeriveInput) -> syn::Result<TokenStream2> {
    let struct_ident = input.ident;

    let syn_struct = match input.data {
        syn::Data::Struct(x) => x,
        _ => {
            return Err(syn::Error::new_spanned(
                &struct_ident,
                "VdfShape can only be derived for structs",
            ))
        }
    };

    let named_fields = match syn_struct.fields {
        syn::Fields::Named(x) => x,
        _ => {
            return Err(syn::Error::new_spanned(
                &struct_ident,
                "VdfShape requires named fields",
            ))
        }
    };

    let mut generics = input.generics;
    for param in &mut generics.params {
        if let GenericParam::Type(ref mut type_param) = *param {
            type_param.bounds.push(parse_quote!(::appvdf::FromValue));
            type_param.bounds.push(parse_quote!(::std::default::Default));
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let mut initializers = Vec::new();
    let mut branches = Vec::new();
    let mut idents = Vec::new();

    for field in &named_fields.named {
        let options = FieldOptions::parse(field)?;
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
        let ty = &field.ty;

        let initial = match &options.default {
            Some(path) => quote! { #path() },
            None => quote! { ::std::default::Default::default() },
        };

        idents.push(ident.clone());
        if options.skip {
            initializers.push(quote! {
                let #ident: #ty = #initial;
            });
            continue;
        }

        initializers.push(quote! {
            let mut #ident: #ty = #initial;
        });

        let names = std::iter::once(options.rename.unwrap_or_else(|| field_name(ident)))
            .chain(options.aliases);
        let matchers = names.map(|name| {
            quote! { ::appvdf::project::field_matches(__key, #name) }
        });

        let convert = match &options.with {
            Some(path) => quote! {
                __projector.field_with(__key, __value, #path)
            },
            None => quote! {
                __projector.field::<#ty>(__key, __value)
            },
        };

        branches.push(quote! {
            if #(#matchers)||* {
                if let ::std::option::Option::Some(__converted) = #convert {
                    #ident = __converted;
                }
                continue;
            }
        });
    }

    let entries = if branches.is_empty() {
        quote! {
            let _ = (__object, __projector);
        }
    } else {
        quote! {
            for (__key, __value) in __object.iter() {
                #(#branches)*
            }
        }
    };

    let result = quote! {
        impl #impl_generics ::appvdf::Shape for #struct_ident #ty_generics #where_clause {
            fn from_object(
                __object: &::appvdf::Object,
                __projector: &mut ::appvdf::Projector,
            ) -> Self {
                #(#initializers)*
                #entries
                #struct_ident { #(#idents),* }
            }
        }

        impl #impl_generics ::appvdf::FromValue for #struct_ident #ty_generics #where_clause {
            fn from_value(
                __value: &::appvdf::Value,
                __projector: &mut ::appvdf::Projector,
            ) -> ::std::option::Option<Self> {
                __projector.shape::<Self>(__value)
            }
        }
    };

    Ok(result)
}
