//! Expansion of `#[derive(Record)]`.

mod generate;
mod parse;

use proc_macro2::TokenStream;

pub(crate) fn expand(input: &syn::DeriveInput) -> syn::Result<TokenStream> {
    let record = parse::parse_input(input)?;
    Ok(generate::record_impl(input, &record))
}

#[cfg(test)]
mod tests;
