//! Procedural macros for reqbind.
//!
//! `#[derive(Bind)]` generates the `Bind` implementation for a destination
//! record: a schema listing each annotated field, where it reads from and a
//! typed accessor to write it.
//!
//! # Example
//!
//! ```rust,ignore
//! use reqbind::Bind;
//!
//! #[derive(Debug, Default, Bind)]
//! struct UpdateUser {
//!     #[bind(path = "id")]
//!     id: i64,
//!     #[bind(query = "firstName")]
//!     first_name: String,
//!     #[bind(json = "lastName")]
//!     last_name: String,
//! }
//! ```
//!
//! # Attributes
//!
//! Field attributes, any combination of:
//!
//! - `path = "key"`: named path parameter
//! - `query = "key"`: query string parameter
//! - `json = "key"`: top-level key of the JSON body
//!
//! When several are present the first usable one in the order path, query,
//! json wins. `""` and `"-"` mean "not bound by this source". Fields without a
//! usable key are not bound.
//!
//! Container attribute `#[bind(crate = "path")]` changes the path used to
//! reach the runtime (default `::reqbind`), for code that depends on
//! `reqbind-core` directly.
//!
//! Every bound field type must implement `Bindable`; other types are rejected
//! at compile time.

mod derive;
mod parse;

use proc_macro::TokenStream;

/// Derives `Bind` for a struct with named fields.
///
/// # Generated Code
///
/// ```rust,ignore
/// impl ::reqbind::Bind for UpdateUser {
///     fn schema() -> ::reqbind::StructSchema<Self> {
///         ::reqbind::SchemaBuilder::<Self>::new()
///             .field("id", ::reqbind::Annotations::new().path("id"), |dest| &mut dest.id)
///             .field("first_name", ::reqbind::Annotations::new().query("firstName"), |dest| &mut dest.first_name)
///             .field("last_name", ::reqbind::Annotations::new().json("lastName"), |dest| &mut dest.last_name)
///             .build()
///     }
/// }
/// ```
#[proc_macro_derive(Bind, attributes(bind))]
pub fn derive_bind(input: TokenStream) -> TokenStream {
    derive::expand_derive(input.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
