//! Procedural macros for Lattice Binding.
//!
//! This crate provides the `#[derive(Properties)]` macro, which publishes a
//! struct's fields as named properties so lists can sort, search and filter by
//! property name.
//!
//! # Attributes
//!
//! ## `#[property]`
//!
//! Adjusts how a single field is exposed:
//!
//! ```ignore
//! #[derive(Properties, Clone)]
//! struct Person {
//!     #[property(rename = "Name")]
//!     name: String,
//!
//!     age: Option<u32>,
//!
//!     #[property(skip)]
//!     avatar: Vec<u8>,
//! }
//! ```
//!
//! Property attributes:
//! - `rename = "Name"`: Publishes the field under a different property name
//! - `skip`: Leaves the field out of the registry
//!
//! Fields whose name starts with `_` are skipped automatically. Every other
//! field must be `Clone` and convertible into `PropertyValue`.
//!
//! ## `#[properties]`
//!
//! Struct-level configuration:
//!
//! ```ignore
//! #[derive(Properties, Clone)]
//! #[properties(rename_all = "PascalCase")]
//! struct Person {
//!     first_name: String, // published as "FirstName"
//! }
//! ```
//!
//! `rename_all` accepts `"PascalCase"`, `"camelCase"` and `"snake_case"`
//! (the default). An explicit `rename` on a field wins.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Field, Fields, Ident, LitStr};

/// Derive the `Properties` trait.
///
/// This macro generates:
/// - A lazily built, static `PropertyRegistry` with one accessor per field
/// - Implementation of the `Properties` trait returning that registry
///
/// # Example
///
/// ```ignore
/// use lattice_binding::prelude::*;
///
/// #[derive(Properties, Clone, Default)]
/// struct Person {
///     #[property(rename = "Name")]
///     name: String,
///     #[property(rename = "Age")]
///     age: u32,
/// }
///
/// let people = BindingList::new(vec![Person::default()]);
/// people.apply_sort(SortDescriptor::ascending("Age"))?;
/// ```
#[proc_macro_derive(Properties, attributes(properties, property))]
pub fn derive_properties(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match impl_derive_properties(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Parsed property information.
struct PropertyInfo {
    field_name: Ident,
    property_name: String,
}

/// Naming convention for generated property names.
#[derive(Clone, Copy)]
enum RenameRule {
    SnakeCase,
    PascalCase,
    CamelCase,
}

impl RenameRule {
    fn parse(lit: &LitStr) -> syn::Result<Self> {
        match lit.value().as_str() {
            "snake_case" => Ok(Self::SnakeCase),
            "PascalCase" => Ok(Self::PascalCase),
            "camelCase" => Ok(Self::CamelCase),
            other => Err(syn::Error::new_spanned(
                lit,
                format!(
                    "unknown rename_all rule `{other}`, expected \"PascalCase\", \"camelCase\" or \"snake_case\""
                ),
            )),
        }
    }

    fn apply(self, field: &str) -> String {
        match self {
            Self::SnakeCase => field.to_string(),
            Self::PascalCase => field
                .split('_')
                .filter(|part| !part.is_empty())
                .map(capitalize)
                .collect(),
            Self::CamelCase => {
                let pascal = Self::PascalCase.apply(field);
                let mut chars = pascal.chars();
                match chars.next() {
                    Some(first) => first.to_lowercase().chain(chars).collect(),
                    None => pascal,
                }
            }
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn impl_derive_properties(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Properties derive does not support generic structs; implement `Properties` by hand",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Properties derive only supports structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Properties derive only supports structs",
            ))
        }
    };

    let rule = parse_struct_attrs(&input.attrs)?;

    let mut properties: Vec<PropertyInfo> = Vec::new();
    for field in fields {
        if let Some(info) = parse_property_field(field, rule)? {
            if properties
                .iter()
                .any(|p| p.property_name == info.property_name)
            {
                return Err(syn::Error::new_spanned(
                    field,
                    format!("duplicate property name `{}`", info.property_name),
                ));
            }
            properties.push(info);
        }
    }

    let registrations = properties.iter().map(|info| {
        let field_name = &info.field_name;
        let property_name = &info.property_name;
        quote! {
            .property(#property_name, |item: &#struct_name| {
                ::lattice_binding::model::PropertyValue::from(
                    ::std::clone::Clone::clone(&item.#field_name),
                )
            })
        }
    });

    let expanded = quote! {
        impl ::lattice_binding::model::Properties for #struct_name {
            fn property_registry() -> &'static ::lattice_binding::model::PropertyRegistry<Self> {
                static REGISTRY: ::std::sync::OnceLock<
                    ::lattice_binding::model::PropertyRegistry<#struct_name>,
                > = ::std::sync::OnceLock::new();

                REGISTRY.get_or_init(|| {
                    ::lattice_binding::model::PropertyRegistry::<#struct_name>::builder()
                        #(#registrations)*
                        .build()
                })
            }
        }
    };

    Ok(expanded)
}

/// Parse struct-level #[properties(...)] attributes.
fn parse_struct_attrs(attrs: &[Attribute]) -> syn::Result<RenameRule> {
    let mut rule = RenameRule::SnakeCase;

    for attr in attrs {
        if !attr.path().is_ident("properties") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                let lit: LitStr = meta.value()?.parse()?;
                rule = RenameRule::parse(&lit)?;
                Ok(())
            } else {
                Err(meta.error("unknown properties attribute, expected `rename_all`"))
            }
        })?;
    }

    Ok(rule)
}

/// Parse a field and its optional #[property(...)] attribute.
fn parse_property_field(field: &Field, rule: RenameRule) -> syn::Result<Option<PropertyInfo>> {
    let Some(field_name) = field.ident.clone() else {
        return Ok(None);
    };

    let mut rename = None;
    let mut skip = false;

    for attr in &field.attrs {
        if !attr.path().is_ident("property") {
            continue;
        }

        // A bare #[property] has no arguments to parse.
        if matches!(attr.meta, syn::Meta::Path(_)) {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let lit: LitStr = meta.value()?.parse()?;
                if lit.value().is_empty() {
                    return Err(syn::Error::new_spanned(lit, "property name cannot be empty"));
                }
                rename = Some(lit.value());
                Ok(())
            } else if meta.path.is_ident("skip") {
                skip = true;
                Ok(())
            } else {
                Err(meta.error("unknown property attribute, expected `rename` or `skip`"))
            }
        })?;
    }

    // Raw identifiers publish without their `r#` prefix.
    let plain_name = field_name.to_string().trim_start_matches("r#").to_string();
    if skip || plain_name.starts_with('_') {
        return Ok(None);
    }

    let property_name = rename.unwrap_or_else(|| rule.apply(&plain_name));
    Ok(Some(PropertyInfo {
        field_name,
        property_name,
    }))
}
