use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Lit, LitStr};

pub fn expand_derive(input: DeriveInput) -> TokenStream {
    let ident = &input.ident;

    if !matches!(input.data, Data::Struct(_)) {
        return syn::Error::new_spanned(ident, "Validatable can only be derived for structs")
            .to_compile_error();
    }

    if !input.generics.params.is_empty() {
        return syn::Error::new_spanned(
            &input.generics,
            "Validatable cannot be derived for generic structs; implement it by hand",
        )
        .to_compile_error();
    }

    let name = match type_name_literal(&input) {
        Ok(name) => name,
        Err(err) => return err.to_compile_error(),
    };

    quote! {
        #[automatically_derived]
        impl ::rulebook_registry::Validatable for #ident {
            #[inline]
            fn type_name(&self) -> &'static str {
                #name
            }

            #[inline]
            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }
        }
    }
}

/// Reads `#[validatable(name = "...")]`, falling back to the struct identifier.
fn type_name_literal(input: &DeriveInput) -> Result<LitStr, syn::Error> {
    let mut name: Option<LitStr> = None;

    for attr in input.attrs.iter().filter(|attr| attr.path().is_ident("validatable")) {
        attr.parse_nested_meta(|meta| {
            if !meta.path.is_ident("name") {
                return Err(meta.error("only `name = \"...\"` is supported"));
            }
            if name.is_some() {
                return Err(meta.error("duplicate `name = \"...\"` argument"));
            }

            let Lit::Str(lit) = meta.value()?.parse::<Lit>()? else {
                return Err(meta.error("expected string literal for `name = \"...\"`"));
            };
            let value = lit.value();
            if value.trim().is_empty() {
                return Err(syn::Error::new_spanned(&lit, "type name cannot be empty"));
            }
            if value.contains('#') {
                return Err(syn::Error::new_spanned(&lit, "type name cannot contain '#'"));
            }

            name = Some(lit);
            Ok(())
        })?;
    }

    Ok(name.unwrap_or_else(|| LitStr::new(&input.ident.to_string(), input.ident.span())))
}
