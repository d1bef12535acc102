//! Code generation for `#[derive(Record)]`.

use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;

use super::parse::RecordInput;

fn crate_path(record: &RecordInput) -> TokenStream {
    record
        .attrs
        .crate_path
        .as_ref()
        .map_or_else(|| quote! { ::tint }, |path| quote! { #path })
}

pub(crate) fn record_impl(input: &DeriveInput, record: &RecordInput) -> TokenStream {
    let krate = crate_path(record);
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let model = record
        .attrs
        .model
        .clone()
        .unwrap_or_else(|| ident.to_string());

    let plain_keys: Vec<String> = record.plain_fields().map(|f| f.key()).collect();
    let plain_idents: Vec<_> = record.plain_fields().map(|f| &f.ident).collect();
    let count = plain_keys.len();
    let related_keys: Vec<String> = record.association_fields().map(|f| f.key()).collect();
    let related_idents: Vec<_> = record.association_fields().map(|f| &f.ident).collect();

    let id_fn = record.id.as_ref().map(|id| {
        quote! {
            fn id(&self) -> ::core::option::Option<#krate::RecordId> {
                #krate::IntoRecordId::to_record_id(&self.#id)
            }
        }
    });

    let related_fn = (!related_idents.is_empty()).then(|| {
        quote! {
            fn related(&self, name: &str) -> ::core::option::Option<#krate::Related> {
                match name {
                    #( #related_keys => #krate::IntoRelated::to_related(&self.#related_idents), )*
                    _ => ::core::option::Option::None,
                }
            }
        }
    });

    quote! {
        #[automatically_derived]
        impl #impl_generics #krate::Record for #ident #ty_generics #where_clause {
            fn model_name(&self) -> &str {
                #model
            }

            #id_fn

            fn field(
                &self,
                name: &str,
            ) -> ::core::option::Option<#krate::__private::serde_json::Value> {
                match name {
                    #( #plain_keys => #krate::field_value(&self.#plain_idents), )*
                    _ => ::core::option::Option::None,
                }
            }

            #related_fn

            fn attributes(
                &self,
            ) -> ::core::option::Option<
                #krate::__private::serde_json::Map<
                    ::std::string::String,
                    #krate::__private::serde_json::Value,
                >,
            > {
                let entries: [(
                    &str,
                    ::core::option::Option<#krate::__private::serde_json::Value>,
                ); #count] = [
                    #( (#plain_keys, #krate::field_value(&self.#plain_idents)), )*
                ];
                ::core::option::Option::Some(
                    entries
                        .into_iter()
                        .filter_map(|(key, value)| {
                            value.map(|present| (::std::string::String::from(key), present))
                        })
                        .collect(),
                )
            }
        }
    }
}
