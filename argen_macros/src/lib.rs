use proc_macro::TokenStream;
use quote::quote_spanned;
use syn::{Data, DeriveInput, Fields, parse_macro_input};

/// Registers `#[ar(...)]` as a helper attribute on model fields.
///
/// The derive itself generates nothing. Models are opted into generation by
/// their marker doc comment; the persistence layer is written by the `argen`
/// generator into a sibling module. Without this derive the compiler would
/// reject the field tags the generator reads.
///
/// # Examples
///
/// ```ignore
/// use argen_runtime::ActiveRecord;
///
/// /// +AR
/// /// +AR has_many Posts
/// #[derive(ActiveRecord, Debug, Clone, Default, PartialEq)]
/// pub struct User {
///     #[ar(primary_key)]
///     pub id: i64,
///     #[ar(presence, length(maximum = 3))]
///     pub name: String,
/// }
/// ```
///
/// # Errors
///
/// Emits a compile error when applied to anything other than a struct with
/// named fields, since the generator would silently skip such a declaration.
#[proc_macro_derive(ActiveRecord, attributes(ar))]
pub fn active_record_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match &input.data {
        Data::Struct(data) if matches!(data.fields, Fields::Named(_)) => TokenStream::new(),
        _ => quote_spanned! {input.ident.span()=>
            compile_error!("`ActiveRecord` can only be derived for structs with named fields");
        }
        .into(),
    }
}
