//! `#[derive(Unmarshal)]` for darknut.
//!
//! Use it through the `darknut` crate, which re-exports the derive next to the
//! trait it implements.

mod emit;
mod parse;

use proc_macro2::TokenStream;

/// Derives `darknut::Unmarshal` for a struct with named fields.
///
/// Fields annotated with `#[newsdoc("name,option,...")]` are listed in the
/// generated shape, in declaration order. Unannotated fields are left alone.
///
/// ```ignore
/// #[derive(Default, darknut::Unmarshal)]
/// struct Item {
///     #[newsdoc("uuid")]
///     uuid: String,
///     #[newsdoc("meta,type=core/description,role=public")]
///     description: Option<Description>,
/// }
/// ```
#[proc_macro_derive(Unmarshal, attributes(newsdoc))]
pub fn unmarshal(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    derive_unmarshal(input.into()).into()
}

fn derive_unmarshal(input: TokenStream) -> TokenStream {
    match parse::parse_struct(input) {
        Ok(parsed) => emit::emit(&parsed),
        Err(err) => err.to_compile_error(),
    }
}
