//! Unit tests for `#[derive(Record)]` parsing and expansion.

use anyhow::{Result, anyhow, ensure};
use rstest::rstest;
use syn::{DeriveInput, parse_quote};

use super::expand;
use super::parse::parse_input;

fn keys(input: &DeriveInput) -> Result<(Vec<String>, Vec<String>)> {
    let record = parse_input(input).map_err(|err| anyhow!(err.to_string()))?;
    Ok((
        record.plain_fields().map(|f| f.key()).collect(),
        record.association_fields().map(|f| f.key()).collect(),
    ))
}

#[rstest]
fn plain_and_association_fields_are_separated() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        struct Post {
            id: i64,
            #[tint(rename = "headline")]
            title: String,
            #[tint(skip)]
            secret: String,
            #[tint(association)]
            comments: Vec<Comment>,
        }
    };
    let (plain, related) = keys(&input)?;
    ensure!(plain == ["id", "headline"], "unexpected plain keys: {plain:?}");
    ensure!(related == ["comments"], "unexpected association keys: {related:?}");
    Ok(())
}

#[rstest]
#[case::named_id(parse_quote! { struct A { id: u32, name: String } }, Some("id"))]
#[case::marked(parse_quote! { struct B { #[tint(id)] uuid: String, id: u32 } }, Some("uuid"))]
#[case::absent(parse_quote! { struct C { name: String } }, None)]
fn primary_key_detection(#[case] input: DeriveInput, #[case] expected: Option<&str>) -> Result<()> {
    let record = parse_input(&input).map_err(|err| anyhow!(err.to_string()))?;
    let found = record.id.map(|id| id.to_string());
    ensure!(found.as_deref() == expected, "expected {expected:?}, found {found:?}");
    Ok(())
}

#[rstest]
fn struct_attributes_are_parsed() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        #[tint(model = "Article", crate = "my_tint")]
        struct Post { title: String }
    };
    let record = parse_input(&input).map_err(|err| anyhow!(err.to_string()))?;
    ensure!(record.attrs.model.as_deref() == Some("Article"), "model not parsed");
    ensure!(record.attrs.crate_path.is_some(), "crate path not parsed");
    let tokens = expand(&input).map_err(|err| anyhow!(err.to_string()))?.to_string();
    ensure!(tokens.contains("my_tint :: Record"), "crate path unused: {tokens}");
    ensure!(tokens.contains("\"Article\""), "model name unused: {tokens}");
    Ok(())
}

#[rstest]
fn generated_impl_reads_renamed_fields() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        struct Post {
            #[tint(rename = "headline")]
            title: String,
        }
    };
    let tokens = expand(&input).map_err(|err| anyhow!(err.to_string()))?.to_string();
    ensure!(tokens.contains("\"headline\" =>"), "rename not applied: {tokens}");
    ensure!(tokens.contains(":: tint :: Record for Post"), "default path not used: {tokens}");
    ensure!(!tokens.contains("fn related"), "unexpected related impl: {tokens}");
    Ok(())
}

#[rstest]
#[case::tuple_struct(parse_quote! { struct T(u32); }, "named fields")]
#[case::enumeration(parse_quote! { enum E { A } }, "only be derived for structs")]
#[case::two_ids(parse_quote! { struct D { #[tint(id)] a: u32, #[tint(id)] b: u32 } }, "only one field")]
#[case::associated_id(parse_quote! { struct D { #[tint(id, association)] a: u32 } }, "cannot be an association")]
#[case::unknown_field_key(parse_quote! { struct D { #[tint(flatten)] a: u32 } }, "unknown tint field attribute")]
#[case::unknown_struct_key(parse_quote! { #[tint(table = "x")] struct D { a: u32 } }, "unknown tint struct attribute")]
#[case::non_string_rename(parse_quote! { struct D { #[tint(rename = 3)] a: u32 } }, "rename must be a string")]
#[case::empty_model(parse_quote! { #[tint(model = " ")] struct D { a: u32 } }, "model must not be empty")]
fn invalid_input_is_rejected(#[case] input: DeriveInput, #[case] message: &str) -> Result<()> {
    let Err(err) = expand(&input) else {
        return Err(anyhow!("expansion unexpectedly succeeded"));
    };
    ensure!(
        err.to_string().contains(message),
        "expected error containing {message:?}, got {err}"
    );
    Ok(())
}
