use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{FnArg, ItemTrait, Result, ReturnType, TraitItem, TraitItemFn, Type};

pub(crate) fn expand(attr: TokenStream, item: ItemTrait) -> Result<TokenStream> {
    if !attr.is_empty() {
        return Err(syn::Error::new_spanned(
            attr,
            "fixture_proxy takes no arguments",
        ));
    }
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &item.generics,
            "fixture_proxy does not support generic traits",
        ));
    }

    let trait_name = &item.ident;
    let vis = &item.vis;
    let proxy_name = format_ident!("{}FixtureProxy", trait_name);

    let mut methods = Vec::new();
    for trait_item in &item.items {
        match trait_item {
            TraitItem::Fn(method) => methods.push(proxy_method(method)?),
            TraitItem::Type(assoc) => {
                return Err(syn::Error::new(
                    assoc.ident.span(),
                    "fixture_proxy does not support associated types",
                ))
            }
            _ => {}
        }
    }

    let doc = format!("Synthesizing stand-in for `{trait_name}`");
    Ok(quote! {
        #item

        #[doc = #doc]
        #[derive(Debug, Clone)]
        #vis struct #proxy_name(pub ::fixgen::Proxy);

        impl #trait_name for #proxy_name {
            #(#methods)*
        }

        impl ::fixgen::Fixture for ::std::boxed::Box<dyn #trait_name> {
            fn describe() -> ::fixgen::TypeDescriptor {
                ::fixgen::TypeDescriptor::interface::<::std::boxed::Box<dyn #trait_name>>(|proxy| {
                    ::std::boxed::Box::new(#proxy_name(proxy)) as ::std::boxed::Box<dyn #trait_name>
                })
            }
        }
    })
}

fn proxy_method(method: &TraitItemFn) -> Result<TokenStream> {
    let sig = &method.sig;
    let name = &sig.ident;

    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new(
            name.span(),
            format!("method `{name}` is generic and cannot be proxied"),
        ));
    }
    if sig.asyncness.is_some() {
        return Err(syn::Error::new(
            name.span(),
            format!("method `{name}` is async and cannot be proxied"),
        ));
    }
    if !matches!(sig.inputs.first(), Some(FnArg::Receiver(_))) {
        return Err(syn::Error::new(
            name.span(),
            format!("method `{name}` has no self receiver and cannot be proxied"),
        ));
    }

    let method_name = name.to_string();
    let body = match &sig.output {
        ReturnType::Default => quote! {},
        ReturnType::Type(_, ty) if is_unit(ty) => quote! {},
        ReturnType::Type(_, ty) => quote! { self.0.call::<#ty>(#method_name) },
    };

    Ok(quote! {
        #[allow(unused_variables, unused_mut)]
        #sig {
            #body
        }
    })
}

fn is_unit(ty: &Type) -> bool {
    matches!(ty, Type::Tuple(tuple) if tuple.elems.is_empty())
}
