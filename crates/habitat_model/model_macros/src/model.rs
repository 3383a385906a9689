//! Derive macro for the `Model` trait.

use darling::FromDeriveInput;
use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

/// Parsed `#[model(...)]` attributes.
#[derive(FromDeriveInput)]
#[darling(attributes(model), supports(struct_any, enum_any))]
struct ModelArgs {
    ident: syn::Ident,
    generics: syn::Generics,

    /// The stable model name. Falls back to the type name.
    #[darling(default)]
    name: Option<String>,

    /// The schema version. Defaults to `"1.0.0"` if omitted.
    #[darling(default = "default_version")]
    schema_version: String,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

/// Implementation of the `#[derive(Model)]` macro.
pub(crate) fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let args = match ModelArgs::from_derive_input(&input) {
        Ok(args) => args,
        Err(err) => return err.write_errors().into(),
    };

    let ident = &args.ident;
    let (impl_generics, ty_generics, where_clause) = args.generics.split_for_impl();

    let name = args.name.unwrap_or_else(|| ident.to_string());
    let schema_version = &args.schema_version;

    let model_crate =
        habitat_macro_utils::resolve_crate_path(habitat_macro_utils::HabitatCrate::Model);

    let expanded = quote! {
        impl #impl_generics #model_crate::Model for #ident #ty_generics #where_clause {
            fn model_name() -> &'static str {
                #name
            }

            fn schema_version() -> &'static str {
                #schema_version
            }
        }
    };

    expanded.into()
}
