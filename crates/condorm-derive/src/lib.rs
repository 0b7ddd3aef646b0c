//! Derive macros for condorm
//!
//! Provides `#[derive(Record)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod record;

/// Derive the `Record` trait for a struct with named fields.
///
/// # Example
///
/// ```ignore
/// use condorm::Record;
///
/// #[derive(Default, Record)]
/// struct TestModel {
///     id: i64,
///     name: String,
///     #[orm(column = "address")]
///     addr: String,
///     #[orm(skip)]
///     cached: Option<String>,
/// }
/// ```
///
/// The table name is the snake_case type name (`TestModel` → `test_model`).
///
/// # Attributes
///
/// - `#[orm(column = "name")]` - Map field to a different column name
/// - `#[orm(skip)]` - Never select or fill this field
#[proc_macro_derive(Record, attributes(orm))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
