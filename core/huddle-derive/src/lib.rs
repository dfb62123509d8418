//! Huddle Derive: procedural macros for typed Family Huddle records.
//!
//! Provides `#[derive(Table)]`, which binds a serde struct to its backing table.

use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr, parse_macro_input};

/// Derive macro binding a struct to a record table.
///
/// # Example
///
/// ```ignore
/// #[derive(Table, Serialize, Deserialize)]
/// #[huddle(table_name = "users")]
/// pub struct User {
///     pub user_id: Option<String>,
///     pub email: String,
///     #[serde(rename = "pw")]
///     pub password_hash: String,
/// }
/// ```
///
/// Generates an `huddle_core::api::TableRow` implementation:
/// - `TABLE_NAME` constant (defaults to the lowercased struct name)
/// - `columns()` → stored field names, honoring `#[serde(rename = "...")]`
#[proc_macro_derive(Table, attributes(huddle))]
pub fn derive_table(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let table_name =
        extract_table_name(input)?.unwrap_or_else(|| name.to_string().to_lowercase());

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Table can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Table can only be derived for structs",
            ));
        }
    };

    let mut columns = Vec::with_capacity(fields.len());
    for field in fields {
        if let Some(ident) = &field.ident {
            let column = serde_rename(field)?.unwrap_or_else(|| ident.to_string());
            columns.push(column);
        }
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics huddle_core::api::TableRow for #name #ty_generics #where_clause {
            const TABLE_NAME: &'static str = #table_name;

            fn columns() -> &'static [&'static str] {
                &[#(#columns),*]
            }
        }
    })
}

/// `#[huddle(table_name = "...")]`
fn extract_table_name(input: &DeriveInput) -> syn::Result<Option<String>> {
    let mut table_name = None;
    for attr in &input.attrs {
        if !attr.path().is_ident("huddle") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table_name") {
                let value: LitStr = meta.value()?.parse()?;
                table_name = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported huddle attribute, expected `table_name`"))
            }
        })?;
    }
    Ok(table_name)
}

/// `#[serde(rename = "...")]` on a field, if present.
fn serde_rename(field: &syn::Field) -> syn::Result<Option<String>> {
    let mut rename = None;
    for attr in &field.attrs {
        if !attr.path().is_ident("serde") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename")
                && let Ok(value) = meta.value()
            {
                let lit: LitStr = value.parse()?;
                rename = Some(lit.value());
                return Ok(());
            }
            // 다른 serde 옵션은 건너뜀 (값이나 괄호 목록이 있으면 소비)
            if meta.input.peek(syn::token::Paren) {
                let content;
                syn::parenthesized!(content in meta.input);
                let _: proc_macro2::TokenStream = content.parse()?;
            } else if let Ok(value) = meta.value() {
                let _: syn::Expr = value.parse()?;
            }
            Ok(())
        })?;
    }
    Ok(rename)
}
