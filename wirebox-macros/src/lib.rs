//! Procedural macros for wirebox.
//!
//! Use them through the `wirebox` crate, which re-exports them; the
//! generated code refers to `::wirebox::*` paths.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod inject;

/// Derives `wirebox::Inject` from `#[inject("...")]` field annotations.
///
/// ```ignore
/// #[derive(Inject)]
/// struct Handler {
///     #[inject("config")]
///     config: Arc<Config>,
///     #[inject("auto")]
///     cache: Option<Arc<dyn Cache>>,
///     hits: u64,
/// }
/// ```
///
/// - `#[inject("name")]` looks the dependency up by name.
/// - `#[inject("auto")]` resolves it by the field's type.
/// - An `Option<T>` field binds against `T` and receives `Some(value)`.
/// - Fields without the attribute are left alone.
///
/// Annotated field types must be `Clone + 'static`.
#[proc_macro_derive(Inject, attributes(inject))]
pub fn derive_inject(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    inject::expand(&input).unwrap_or_else(|err| err.write_errors()).into()
}
