use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::ext::IdentExt;
use syn::{Attribute, Data, DataEnum, DeriveInput, ExprPath, Fields, Ident, LitStr, Result};

struct StructArgs {
    no_default: bool,
    constructor: Option<ExprPath>,
}

impl StructArgs {
    fn from_attrs(attrs: &[Attribute]) -> Result<Self> {
        let mut args = StructArgs {
            no_default: false,
            constructor: None,
        };

        for attr in attrs {
            if !attr.path().is_ident("fixture") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("no_default") {
                    args.no_default = true;
                    Ok(())
                } else if meta.path.is_ident("constructor") {
                    let value: LitStr = meta.value()?.parse()?;
                    args.constructor = Some(value.parse()?);
                    Ok(())
                } else {
                    Err(meta.error("unknown fixture attribute, expected `no_default` or `constructor`"))
                }
            })?;
        }

        if args.no_default && args.constructor.is_some() {
            return Err(syn::Error::new(
                Span::call_site(),
                "fixture attributes `no_default` and `constructor` are mutually exclusive",
            ));
        }
        Ok(args)
    }
}

#[derive(Default)]
struct FieldArgs {
    skip: bool,
    extends: bool,
    mutator: Option<Ident>,
}

impl FieldArgs {
    fn from_attrs(attrs: &[Attribute]) -> Result<Self> {
        let mut args = FieldArgs::default();

        for attr in attrs {
            if !attr.path().is_ident("fixture") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    args.skip = true;
                    Ok(())
                } else if meta.path.is_ident("extends") {
                    args.extends = true;
                    Ok(())
                } else if meta.path.is_ident("mutator") {
                    let value: LitStr = meta.value()?.parse()?;
                    args.mutator = Some(value.parse()?);
                    Ok(())
                } else {
                    Err(meta.error(
                        "unknown fixture field attribute, expected `skip`, `extends` or `mutator`",
                    ))
                }
            })?;
        }

        let set = [args.skip, args.extends, args.mutator.is_some()]
            .iter()
            .filter(|flag| **flag)
            .count();
        if set > 1 {
            return Err(syn::Error::new(
                Span::call_site(),
                "fixture field attributes `skip`, `extends` and `mutator` are mutually exclusive",
            ));
        }
        Ok(args)
    }
}

pub(crate) fn expand(input: DeriveInput) -> Result<TokenStream> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Fixture derive does not support generic types; implement Fixture by hand",
        ));
    }

    let name = &input.ident;
    let describe = match &input.data {
        Data::Struct(data) => describe_struct(&input.attrs, &data.fields)?,
        Data::Enum(data) => describe_enum(&input.attrs, data)?,
        Data::Union(_) => {
            return Err(syn::Error::new(
                Span::call_site(),
                "Fixture derive only supports structs and enums",
            ))
        }
    };

    Ok(quote! {
        impl ::fixgen::Fixture for #name {
            fn describe() -> ::fixgen::TypeDescriptor {
                #describe
            }
        }
    })
}

fn describe_struct(attrs: &[Attribute], fields: &Fields) -> Result<TokenStream> {
    let args = StructArgs::from_attrs(attrs)?;
    let constructor = match (&args.constructor, args.no_default) {
        (Some(path), _) => quote! { .constructor(#path) },
        (None, true) => TokenStream::new(),
        (None, false) => quote! { .constructor(<Self as ::core::default::Default>::default) },
    };

    let mut steps = Vec::new();
    let mut ancestor = None;
    match fields {
        Fields::Named(named) => {
            for field in &named.named {
                let field_args = FieldArgs::from_attrs(&field.attrs)?;
                let Some(ident) = field.ident.as_ref() else {
                    continue;
                };
                let ty = &field.ty;

                if field_args.skip {
                    continue;
                }
                if field_args.extends {
                    if ancestor.is_some() {
                        return Err(syn::Error::new(
                            ident.span(),
                            "only one field may be marked #[fixture(extends)]",
                        ));
                    }
                    ancestor = Some(quote! { .extends::<#ty>(|this| &mut this.#ident) });
                    continue;
                }

                let member = ident.unraw().to_string();
                let mutator = match &field_args.mutator {
                    Some(method) => {
                        let method_name = method.unraw().to_string();
                        quote! { .mutator(#method_name, Self::#method) }
                    }
                    None => {
                        let setter = format!("set_{member}");
                        quote! {
                            .mutator(#setter, |this: &mut Self, value: #ty| {
                                this.#ident = value;
                            })
                        }
                    }
                };
                steps.push(quote! {
                    .member::<#ty>(#member)
                    #mutator
                });
            }
        }
        Fields::Unit => {}
        Fields::Unnamed(_) => {
            return Err(syn::Error::new(
                Span::call_site(),
                "Fixture derive does not support tuple structs",
            ))
        }
    }

    Ok(quote! {
        ::fixgen::ShapeBuilder::<Self>::new()
            #constructor
            #(#steps)*
            #ancestor
            .finish()
    })
}

fn describe_enum(attrs: &[Attribute], data: &DataEnum) -> Result<TokenStream> {
    if let Some(attr) = attrs.iter().find(|attr| attr.path().is_ident("fixture")) {
        return Err(syn::Error::new_spanned(
            attr,
            "fixture attributes are not supported on enums",
        ));
    }

    let mut constants = Vec::new();
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new(
                variant.ident.span(),
                format!(
                    "variant `{}` carries data; Fixture derive only supports unit variants",
                    variant.ident
                ),
            ));
        }
        let ident = &variant.ident;
        let constant = ident.unraw().to_string();
        constants.push(quote! {
            ::fixgen::EnumConstant::new(#constant, || Self::#ident)
        });
    }

    Ok(quote! {
        ::fixgen::TypeDescriptor::enumeration::<Self>(::std::vec![#(#constants),*])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn expand_str(input: DeriveInput) -> String {
        match expand(input) {
            Ok(tokens) => tokens.to_string(),
            Err(err) => panic!("expansion failed: {err}"),
        }
    }

    fn error_of(input: DeriveInput) -> String {
        match expand(input) {
            Ok(tokens) => panic!("expected an error, got {tokens}"),
            Err(err) => err.to_string(),
        }
    }

    #[test]
    fn test_named_struct_gets_member_and_setter_per_field() {
        let output = expand_str(parse_quote! {
            struct Point {
                x: i32,
                r#type: String,
            }
        });
        assert!(output.contains("impl :: fixgen :: Fixture for Point"));
        assert!(output.contains("member :: < i32 > (\"x\")"));
        assert!(output.contains("mutator (\"set_x\""));
        assert!(output.contains("member :: < String > (\"type\")"));
        assert!(output.contains("\"set_type\""));
        assert!(output.contains("Default > :: default"));
    }

    #[test]
    fn test_field_attributes() {
        let output = expand_str(parse_quote! {
            struct Admin {
                #[fixture(extends)]
                user: User,
                #[fixture(skip)]
                cache: Vec<u8>,
                #[fixture(mutator = "grant_level")]
                level: u8,
            }
        });
        assert!(output.contains("extends :: < User >"));
        assert!(!output.contains("cache"));
        assert!(output.contains("mutator (\"grant_level\" , Self :: grant_level)"));
        assert!(!output.contains("set_level"));
    }

    #[test]
    fn test_struct_attributes() {
        let output = expand_str(parse_quote! {
            #[fixture(constructor = "Ledger::open")]
            struct Ledger {}
        });
        assert!(output.contains("constructor (Ledger :: open)"));

        let output = expand_str(parse_quote! {
            #[fixture(no_default)]
            struct Handle;
        });
        assert!(!output.contains("constructor"));

        let err = error_of(parse_quote! {
            #[fixture(no_default, constructor = "Handle::new")]
            struct Handle;
        });
        assert!(err.contains("mutually exclusive"));
    }

    #[test]
    fn test_unit_enum_lists_constants_in_order() {
        let output = expand_str(parse_quote! {
            enum Level { Low, High }
        });
        assert!(output.contains("enumeration :: < Self >"));
        let low = output.find("\"Low\"").unwrap_or(usize::MAX);
        let high = output.find("\"High\"").unwrap_or(0);
        assert!(low < high);
    }

    #[test]
    fn test_rejected_inputs() {
        assert!(error_of(parse_quote! { struct Wrapper<T> { inner: T } }).contains("generic"));
        assert!(error_of(parse_quote! { struct Pair(i32, i32); }).contains("tuple structs"));
        assert!(error_of(parse_quote! { enum Shape { Circle(f64) } }).contains("unit variants"));
        assert!(error_of(parse_quote! {
            struct Both {
                #[fixture(extends)]
                a: A,
                #[fixture(extends)]
                b: B,
            }
        })
        .contains("only one field"));
        assert!(error_of(parse_quote! {
            struct Odd {
                #[fixture(rename = "x")]
                a: i32,
            }
        })
        .contains("unknown fixture field attribute"));
    }
}
