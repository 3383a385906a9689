//! Shared utilities for Habitat procedural macro crates.
//!
//! Generated code has to name the crate that owns the implemented trait. A
//! consumer may depend on that crate directly, under a renamed key, or only
//! through the `habitat` umbrella crate; [`resolve_crate_path`] picks the path
//! that works for the crate being compiled.

use proc_macro_crate::{FoundCrate, crate_name};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

/// A Habitat crate that macro-generated code may reference.
pub enum HabitatCrate {
    /// `habitat_model`
    Model,
}

impl HabitatCrate {
    /// Returns the `Cargo.toml` package name for this crate.
    fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "habitat_model",
        }
    }
}

/// Returns a [`TokenStream`] path for the given Habitat crate.
///
/// Resolution order:
/// 1. Direct dependency (possibly renamed in `Cargo.toml`).
/// 2. Indirect access via the `habitat` umbrella crate (`habitat::<name>`).
/// 3. Fallback to the literal crate name, so a missing dependency surfaces as
///    an unresolved path at the use site.
pub fn resolve_crate_path(krate: HabitatCrate) -> TokenStream {
    let name = krate.as_str();

    match crate_name(name) {
        Ok(FoundCrate::Itself) => {
            // The owning crate declares `extern crate self as <name>;`.
            let ident = format_ident!("{}", name);
            quote!(#ident)
        }
        Ok(FoundCrate::Name(found)) => {
            let ident = format_ident!("{}", found);
            quote!(#ident)
        }
        Err(_) => match crate_name("habitat") {
            Ok(FoundCrate::Name(found)) => {
                let habitat = format_ident!("{}", found);
                let ident = format_ident!("{}", name);
                quote!(#habitat::#ident)
            }
            _ => {
                let ident = format_ident!("{}", name);
                quote!(#ident)
            }
        },
    }
}
