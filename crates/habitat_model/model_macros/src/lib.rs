//! Procedural macros for `habitat_model`.
//!
//! This crate provides `#[derive(Model)]` for declaring a type as a persisted
//! model that can take part in a composed schema.

mod model;

use proc_macro::TokenStream;

/// Derive macro for the `Model` trait.
///
/// Generates an implementation of [`habitat_model::Model`] for the annotated
/// struct, providing a stable model name and schema version.
///
/// # Attributes
///
/// - `name` (optional): The stable model name. Defaults to the type name.
/// - `schema_version` (optional): The schema version. Defaults to `"1.0.0"`.
///
/// # Example
///
/// ```ignore
/// use habitat_model::Model;
///
/// #[derive(Model)]
/// #[model(name = "HabitNote", schema_version = "2.0.0")]
/// struct HabitNote {
///     text: String,
/// }
/// ```
#[proc_macro_derive(Model, attributes(model))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    model::derive_model(input)
}
