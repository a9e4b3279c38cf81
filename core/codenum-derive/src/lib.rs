//! codenum Derive — procedural macros for the codenum conversion layer.
//!
//! Provides `#[derive(CodeEnum)]` for registry-backed Rust enums.

use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, parse_macro_input};

/// Derive macro implementing `codenum_core::registry::CodeEnum`.
///
/// # Example
///
/// ```ignore
/// #[derive(CodeEnum)]
/// #[codenum(type_name = "OrderStatus")]
/// pub enum Status {
///     #[codenum(name = "NEW")]
///     New,
///     Shipped,
/// }
/// ```
///
/// Generates:
/// - `TYPE_NAME` (enum identifier unless overridden)
/// - `CONSTANTS` in declaration order (variant identifier unless overridden)
/// - `ordinal()` → declaration position
/// - `name()` → constant name of the variant
#[proc_macro_derive(CodeEnum, attributes(codenum))]
pub fn derive_code_enum(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let type_name = string_attr(&input.attrs, "type_name")?.unwrap_or_else(|| name.to_string());

    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            name,
            "CodeEnum can only be derived for enums",
        ));
    };

    let mut idents = Vec::with_capacity(data.variants.len());
    let mut constants = Vec::with_capacity(data.variants.len());
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "CodeEnum variants must not carry fields",
            ));
        }
        constants.push(
            string_attr(&variant.attrs, "name")?.unwrap_or_else(|| variant.ident.to_string()),
        );
        idents.push(&variant.ident);
    }

    // 선언 순서 = ordinal
    let ordinals = (0..idents.len()).map(|i| i as i32);
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::codenum_core::registry::CodeEnum for #name #ty_generics #where_clause {
            const TYPE_NAME: &'static str = #type_name;
            const CONSTANTS: &'static [&'static str] = &[#(#constants),*];

            fn ordinal(&self) -> i32 {
                match *self {
                    #(Self::#idents => #ordinals,)*
                }
            }

            fn name(&self) -> &'static str {
                match *self {
                    #(Self::#idents => #constants,)*
                }
            }
        }
    })
}

fn string_attr(attrs: &[syn::Attribute], key: &str) -> syn::Result<Option<String>> {
    for attr in attrs {
        if !attr.path().is_ident("codenum") {
            continue;
        }
        let meta = attr.parse_args::<syn::Meta>()?;
        if let syn::Meta::NameValue(nv) = &meta
            && nv.path.is_ident(key)
        {
            if let syn::Expr::Lit(lit) = &nv.value
                && let syn::Lit::Str(s) = &lit.lit
            {
                return Ok(Some(s.value()));
            }
            return Err(syn::Error::new_spanned(
                &nv.value,
                format!("`{key}` expects a string literal"),
            ));
        }
        if !meta.path().is_ident("name") && !meta.path().is_ident("type_name") {
            return Err(syn::Error::new_spanned(meta.path(), "unknown codenum attribute"));
        }
    }
    Ok(None)
}
