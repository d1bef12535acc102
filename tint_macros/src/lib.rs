//! Procedural macros for `tint`.
//!
//! `#[derive(Record)]` implements `tint::Record` for structs with named
//! fields. Plain fields are readable by name and appear in the attribute
//! snapshot; fields marked `#[tint(association)]` are exposed through
//! `Record::related` instead.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod derive;

/// Derive macro for `tint::Record`.
///
/// Field attributes:
///
/// - `#[tint(id)]` marks the primary key. A field named `id` is used when no
///   field is marked.
/// - `#[tint(rename = "name")]` reads the field under another name.
/// - `#[tint(skip)]` hides the field.
/// - `#[tint(association)]` exposes the field as an association. The field
///   type must implement `tint::IntoRelated`.
///
/// Struct attributes:
///
/// - `#[tint(model = "Name")]` overrides the model name, which defaults to the
///   struct name.
/// - `#[tint(crate = "path")]` points generated code at a renamed dependency.
#[proc_macro_derive(Record, attributes(tint))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
