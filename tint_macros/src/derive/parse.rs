//! Parsing of `#[tint(...)]` attributes.

use syn::meta::ParseNestedMeta;
use syn::{Attribute, Data, DeriveInput, Fields, Ident, Lit, LitStr};

/// Struct-level settings.
#[derive(Default)]
pub(crate) struct StructAttrs {
    pub model: Option<String>,
    pub crate_path: Option<syn::Path>,
}

/// Field-level settings.
#[derive(Default)]
pub(crate) struct FieldAttrs {
    pub id: bool,
    pub rename: Option<String>,
    pub skip: bool,
    pub association: bool,
}

pub(crate) struct RecordField {
    pub ident: Ident,
    pub attrs: FieldAttrs,
}

impl RecordField {
    /// Name the field is read under.
    pub(crate) fn key(&self) -> String {
        self.attrs
            .rename
            .clone()
            .unwrap_or_else(|| self.ident.to_string())
    }
}

pub(crate) struct RecordInput {
    pub attrs: StructAttrs,
    pub fields: Vec<RecordField>,
    pub id: Option<Ident>,
}

impl RecordInput {
    /// Readable plain fields.
    pub(crate) fn plain_fields(&self) -> impl Iterator<Item = &RecordField> {
        self.fields
            .iter()
            .filter(|field| !field.attrs.skip && !field.attrs.association)
    }

    /// Fields exposed as associations.
    pub(crate) fn association_fields(&self) -> impl Iterator<Item = &RecordField> {
        self.fields
            .iter()
            .filter(|field| !field.attrs.skip && field.attrs.association)
    }
}

fn for_each_tint_meta<F>(attrs: &[Attribute], mut f: F) -> syn::Result<()>
where
    F: FnMut(&ParseNestedMeta) -> syn::Result<()>,
{
    for attr in attrs.iter().filter(|a| a.path().is_ident("tint")) {
        attr.parse_nested_meta(|meta| f(&meta))?;
    }
    Ok(())
}

fn lit_str(meta: &ParseNestedMeta, key: &str) -> syn::Result<LitStr> {
    let literal = meta.value()?.parse::<Lit>()?;
    match literal {
        Lit::Str(s) => Ok(s),
        other => Err(syn::Error::new(
            other.span(),
            format!("{key} must be a string"),
        )),
    }
}

pub(crate) fn parse_struct_attrs(attrs: &[Attribute]) -> syn::Result<StructAttrs> {
    let mut out = StructAttrs::default();
    for_each_tint_meta(attrs, |meta| {
        if meta.path.is_ident("model") {
            let model = lit_str(meta, "model")?;
            if model.value().trim().is_empty() {
                return Err(syn::Error::new(model.span(), "model must not be empty"));
            }
            out.model = Some(model.value());
            Ok(())
        } else if meta.path.is_ident("crate") {
            out.crate_path = Some(lit_str(meta, "crate")?.parse()?);
            Ok(())
        } else {
            Err(meta.error("unknown tint struct attribute"))
        }
    })?;
    Ok(out)
}

pub(crate) fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    for_each_tint_meta(attrs, |meta| {
        if meta.path.is_ident("id") {
            out.id = true;
        } else if meta.path.is_ident("skip") {
            out.skip = true;
        } else if meta.path.is_ident("association") {
            out.association = true;
        } else if meta.path.is_ident("rename") {
            let renamed = lit_str(meta, "rename")?;
            if renamed.value().is_empty() {
                return Err(syn::Error::new(renamed.span(), "rename must not be empty"));
            }
            out.rename = Some(renamed.value());
        } else {
            return Err(meta.error("unknown tint field attribute"));
        }
        Ok(())
    })?;
    Ok(out)
}

/// Collect the struct's fields and settings.
pub(crate) fn parse_input(input: &DeriveInput) -> syn::Result<RecordInput> {
    let attrs = parse_struct_attrs(&input.attrs)?;
    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    data.struct_token,
                    "Record requires named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Record can only be derived for structs",
            ));
        }
    };

    let mut fields = Vec::with_capacity(named.len());
    for field in named {
        let Some(ident) = field.ident.clone() else {
            return Err(syn::Error::new_spanned(field, "Record requires named fields"));
        };
        let field_attrs = parse_field_attrs(&field.attrs)?;
        if field_attrs.id && field_attrs.association {
            return Err(syn::Error::new_spanned(
                field,
                "a primary key cannot be an association",
            ));
        }
        fields.push(RecordField {
            ident,
            attrs: field_attrs,
        });
    }

    let id = primary_key(&fields)?;
    Ok(RecordInput { attrs, fields, id })
}

fn primary_key(fields: &[RecordField]) -> syn::Result<Option<Ident>> {
    let mut marked = fields.iter().filter(|field| field.attrs.id);
    match (marked.next(), marked.next()) {
        (Some(_), Some(second)) => Err(syn::Error::new(
            second.ident.span(),
            "only one field can be marked #[tint(id)]",
        )),
        (Some(field), None) => Ok(Some(field.ident.clone())),
        (None, _) => Ok(fields
            .iter()
            .find(|field| field.ident == "id" && !field.attrs.association)
            .map(|field| field.ident.clone())),
    }
}
